use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::tile::{Tile, TileDesc};

/// Validated tiles for one tileset, indexed by tile id.
#[derive(Clone, Debug, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub tile_size: u32,
    tiles: Vec<Tile>,
}

impl Tileset {
    pub fn from_descs(name: &str, tile_size: u32, descs: &[TileDesc]) -> Result<Self, ConfigError> {
        if tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        let tiles = descs
            .iter()
            .enumerate()
            .map(|(index, d)| {
                d.into_tile(tile_size).map_err(|e| ConfigError::TilesetEntry {
                    name: name.to_owned(),
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name: name.to_owned(), tile_size, tiles })
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Tilesets loaded so far, keyed by name. Owned by whoever loads stages and
/// handed to grid construction by reference.
#[derive(Default, Debug)]
pub struct TilesetCache {
    sets: HashMap<String, Arc<Tileset>>,
}

impl TilesetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and cache `descs` under `name`. A name that is already cached
    /// returns the existing snapshot without re-reading `descs`.
    pub fn load(&mut self, name: &str, tile_size: u32, descs: &[TileDesc]) -> Result<Arc<Tileset>, ConfigError> {
        if let Some(set) = self.sets.get(name) {
            if set.tile_size != tile_size {
                return Err(ConfigError::TileSizeMismatch {
                    name: name.to_owned(),
                    expected: tile_size,
                    found: set.tile_size,
                });
            }
            return Ok(Arc::clone(set));
        }
        let set = Arc::new(Tileset::from_descs(name, tile_size, descs)?);
        tracing::debug!(tileset = name, tiles = set.len(), "tileset cached");
        self.sets.insert(name.to_owned(), Arc::clone(&set));
        Ok(set)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Tileset>> {
        self.sets.get(name).cloned()
    }

    /// Drop a cached tileset so the next `load` re-validates it.
    pub fn evict(&mut self, name: &str) -> bool {
        self.sets.remove(name).is_some()
    }
}
