use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Left or right edge of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
}

impl Edge {
    /// Edge a body crosses when entering a tile while travelling in `dir` (+1 right, -1 left).
    pub fn entered_moving(dir: i32) -> Self {
        if dir > 0 { Edge::Left } else { Edge::Right }
    }

    pub fn opposite(self) -> Self {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
        }
    }
}

/// Sloped surface inside one tile.
///
/// Heights are pixels measured up from the tile's bottom edge. For a floor
/// slope the solid part lies below the line between the two edge heights;
/// for a ceiling slope it lies above.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slope {
    pub left_height: u32,
    pub right_height: u32,
    pub is_ceiling: bool,
    /// Number of tiles the full ramp spans (1.0 for 45°, 2.0 for a half-pitch pair).
    pub part_count: f32,
}

impl Slope {
    /// Negative / left-facing slope: tall side on the left.
    pub fn is_left_slope(&self) -> bool {
        self.left_height > self.right_height
    }

    /// Positive / right-facing slope: surface rises left to right.
    pub fn is_right_slope(&self) -> bool {
        self.right_height > self.left_height
    }

    pub fn is_upper_slope(&self) -> bool {
        self.is_ceiling
    }

    pub fn edge_height(&self, edge: Edge) -> u32 {
        match edge {
            Edge::Left => self.left_height,
            Edge::Right => self.right_height,
        }
    }

    /// Same kind (floor/ceiling) and same facing.
    pub fn same_run(&self, other: &Slope) -> bool {
        self.is_ceiling == other.is_ceiling && self.is_left_slope() == other.is_left_slope()
    }

    /// Surface height above the tile's bottom edge at `position_on_tile`
    /// (0 = left edge, 1 = right edge). Outside `[0, 1]` the nearer edge
    /// height is used; inside, the interpolated height is rounded up.
    pub fn surface_offset(&self, position_on_tile: f32) -> f32 {
        let left = self.left_height as f32;
        let right = self.right_height as f32;
        if position_on_tile < 0.0 {
            left
        } else if position_on_tile > 1.0 {
            right
        } else {
            // Shave float noise so exact pixel heights don't round up a whole pixel.
            (left + (right - left) * position_on_tile - 1e-4).ceil()
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TileKind {
    Normal,
    Slope(Slope),
}

/// One grid cell. Immutable once built.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    pub is_collidable: bool,
    pub kind: TileKind,
}

impl Tile {
    /// Full solid block.
    pub const fn solid() -> Self {
        Self { is_collidable: true, kind: TileKind::Normal }
    }

    /// Non-collidable cell (scenery); occupies the grid but never blocks.
    pub const fn decoration() -> Self {
        Self { is_collidable: false, kind: TileKind::Normal }
    }

    /// Validated slope tile.
    pub fn slope(
        left_height: u32,
        right_height: u32,
        is_ceiling: bool,
        part_count: f32,
        tile_size: u32,
    ) -> Result<Self, ConfigError> {
        if tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        for (edge, height) in [(Edge::Left, left_height), (Edge::Right, right_height)] {
            if height > tile_size {
                return Err(ConfigError::HeightOutOfRange { edge, height, tile_size });
            }
        }
        if left_height == right_height {
            return Err(ConfigError::FlatSlope(left_height));
        }
        if !part_count.is_finite() || part_count <= 0.0 {
            return Err(ConfigError::InvalidPartCount(part_count));
        }
        Ok(Self {
            is_collidable: true,
            kind: TileKind::Slope(Slope { left_height, right_height, is_ceiling, part_count }),
        })
    }

    pub fn as_slope(&self) -> Option<&Slope> {
        match &self.kind {
            TileKind::Slope(s) => Some(s),
            TileKind::Normal => None,
        }
    }

    pub fn is_slope(&self) -> bool {
        self.as_slope().is_some()
    }
}

/// Serialized shape of one tileset entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileDesc {
    pub collidable: bool,
    pub slope: bool,
    pub left_height: Option<u32>,
    pub right_height: Option<u32>,
    pub ceiling: bool,
    pub slope_parts: Option<f32>,
}

impl TileDesc {
    pub fn solid() -> Self {
        Self { collidable: true, ..Default::default() }
    }

    pub fn slope(left_height: u32, right_height: u32) -> Self {
        Self {
            collidable: true,
            slope: true,
            left_height: Some(left_height),
            right_height: Some(right_height),
            ..Default::default()
        }
    }

    pub fn into_tile(&self, tile_size: u32) -> Result<Tile, ConfigError> {
        if !self.slope {
            return Ok(Tile { is_collidable: self.collidable, kind: TileKind::Normal });
        }
        let left = self.left_height.ok_or(ConfigError::MissingSlopeHeight(Edge::Left))?;
        let right = self.right_height.ok_or(ConfigError::MissingSlopeHeight(Edge::Right))?;
        let mut tile = Tile::slope(left, right, self.ceiling, self.slope_parts.unwrap_or(1.0), tile_size)?;
        tile.is_collidable = self.collidable;
        Ok(tile)
    }
}
