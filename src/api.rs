use std::any::Any;

use crate::body::KinematicBody;
use crate::tile::Tile;
use crate::types::*;

/// Read-only tile lookup the resolver runs against. Bottom-left origin.
pub trait TileSource {
    /// Tile at integer tile coordinates; `None` for empty or out-of-range cells.
    fn tile_at(&self, x: i32, y: i32) -> Option<&Tile>;

    fn cols(&self) -> usize;

    fn rows(&self) -> usize;

    /// Edge length of one tile in pixels.
    fn tile_size(&self) -> u32;

    /// Collidable tile at the given coordinates.
    fn solid_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.tile_at(x, y).filter(|t| t.is_collidable)
    }

    /// Last valid column index (0 for an empty grid).
    fn last_col(&self) -> i32 {
        self.cols().saturating_sub(1) as i32
    }

    /// Last valid row index (0 for an empty grid).
    fn last_row(&self) -> i32 {
        self.rows().saturating_sub(1) as i32
    }
}

/// Per-entity source of movement intent (player input, AI, scripts).
///
/// `Any` lets the world hand a controller back as its concrete type.
pub trait Controller: Any {
    /// Decide this tick's intent from the body's current state.
    fn tick_intent(&mut self, body: &KinematicBody, dt: f32) -> Intent;
}

/// Hooks invoked synchronously by the resolver after the body's default
/// reaction has been applied. All methods default to no-ops.
#[allow(unused_variables)]
pub trait CollisionObserver {
    fn on_left_collision(&mut self, body: &KinematicBody, tile: Option<TileHit>) {}

    fn on_right_collision(&mut self, body: &KinematicBody, tile: Option<TileHit>) {}

    fn on_top_collision(&mut self, body: &KinematicBody, tile: Option<TileHit>) {}

    fn on_bottom_collision(&mut self, body: &KinematicBody, tile: Option<TileHit>) {}

    /// Fired once when an airborne body touches down.
    fn on_land(&mut self, body: &KinematicBody) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl CollisionObserver for NoopObserver {}
