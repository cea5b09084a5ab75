use crate::tile::Tile;

/// Stable handle for a body spawned into a [`World`](crate::World).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

/// Integer tile coordinates, bottom-left origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Side of the body that touched something.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Tile a body was resolved against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileHit {
    pub pos: TilePos,
    pub tile: Tile,
}

/// Event discriminator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Any side contact (fires every tick the contact persists).
    Collision,
    /// Airborne → grounded transition; fires once per landing.
    Landed,
}

/// Collision event recorded during a step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionEvent {
    pub kind: EventKind,
    pub tick: u64,
    pub body: BodyId,
    pub side: Side,
    pub tile: Option<TileHit>,
}

/// What a controller wants its body to do this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Intent {
    /// Horizontal speed to blend towards (px/s, signed).
    pub target_speed: f32,
    pub jump: bool,
    /// Pixel x the body should stop at exactly, if any.
    pub seek_x: Option<f32>,
}

/// Debug statistics for the current world.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WorldStats {
    pub tick: u64,
    pub bodies: usize,
    pub airborne: usize,
    pub pending_events: usize,
}

/// Timing breakdown for the last completed step.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepTiming {
    pub step_ms: f64,
    pub intent_ms: f64,
    pub resolve_ms: f64,
    pub events_emitted: usize,
}
