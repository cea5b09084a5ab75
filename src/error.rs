use thiserror::Error;

use crate::tile::Edge;

/// Construction-time failures. Everything here is reported before the first
/// tick; the per-tick path never returns errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tile size must be positive")]
    ZeroTileSize,

    #[error("slope is missing its {0:?} edge height")]
    MissingSlopeHeight(Edge),

    #[error("slope {edge:?} height {height} exceeds tile size {tile_size}")]
    HeightOutOfRange { edge: Edge, height: u32, tile_size: u32 },

    #[error("slope with equal edge heights ({0}) is a flat tile")]
    FlatSlope(u32),

    #[error("slope part count must be a positive number, got {0}")]
    InvalidPartCount(f32),

    #[error("tileset `{name}` entry {index}: {source}")]
    TilesetEntry {
        name: String,
        index: usize,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("tileset `{name}` uses tile size {found}, grid expects {expected}")]
    TileSizeMismatch { name: String, expected: u32, found: u32 },

    #[error("grid has no rows or no columns")]
    EmptyGrid,

    #[error("grid row {row} has {found} columns, expected {expected}")]
    RaggedGrid { row: usize, expected: usize, found: usize },

    #[error("grid cell ({x}, {y}) references unknown tile index {index}")]
    UnknownTile { x: usize, y: usize, index: usize },

    #[error("invalid physics config: {0}")]
    Physics(&'static str),
}
