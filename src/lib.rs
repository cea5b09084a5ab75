//! slopebonk: tile-grid platformer collision (axis-separated, slopes, fixed step)

pub mod types;
pub mod api;
pub mod error;
pub mod config;
pub mod tile;
pub mod tileset;
pub mod grid;
pub mod body;
pub mod sweep;
pub mod resolver;
pub mod controller;
pub mod world;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::ConfigError;
pub use crate::config::PhysicsConfig;
pub use crate::tile::{Edge, Slope, Tile, TileDesc, TileKind};
pub use crate::tileset::{Tileset, TilesetCache};
pub use crate::grid::TileGrid;
pub use crate::body::{KinematicBody, TileSpan};
pub use crate::sweep::AxisSweep;
pub use crate::resolver::{CollisionResolver, Resolution};
pub use crate::controller::{InputState, PlayerController, SimpleAi};
pub use crate::world::World;
