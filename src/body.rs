use std::ops::RangeInclusive;

use glam::Vec2;

/// Inclusive range of tile indices along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct TileSpan {
    pub first: i32,
    pub last: i32,
}

impl TileSpan {
    /// Tiles overlapped by the half-open pixel interval `[min, min + size)`.
    pub fn covering(min: f32, size: f32, tile_size: f32) -> Self {
        let first = (min / tile_size).floor() as i32;
        let last = ((min + size) / tile_size).ceil() as i32 - 1;
        Self { first, last: last.max(first) }
    }

    pub fn len(&self) -> i32 {
        self.last - self.first + 1
    }

    pub fn contains(&self, index: i32) -> bool {
        (self.first..=self.last).contains(&index)
    }

    /// Intersection with `[0, boundary]`, or `None` when the span lies
    /// entirely outside the grid.
    pub fn clamped(&self, boundary: i32) -> Option<TileSpan> {
        let first = self.first.max(0);
        let last = self.last.min(boundary);
        (first <= last).then_some(TileSpan { first, last })
    }

    pub fn iter(&self) -> RangeInclusive<i32> {
        self.first..=self.last
    }
}

/// Axis-aligned rectangular body moved by the collision resolver.
///
/// Position is the bottom-left corner in pixels (y-up). The tile-space
/// fields are derived from it and refreshed by [`set_position`], the only
/// way the position changes.
///
/// [`set_position`]: KinematicBody::set_position
#[derive(Clone, Debug)]
pub struct KinematicBody {
    pos: Vec2,
    size: Vec2,
    tile_size: f32,

    // Derived from `pos`; never written anywhere but `refresh_tile_space`.
    tile_x: i32,
    tile_y: i32,
    sub_tile_x: f32,
    sub_tile_y: f32,
    width_span: TileSpan,
    height_span: TileSpan,

    /// Pixels per second.
    pub velocity: Vec2,
    /// `x`: horizontal acceleration towards `target_speed` (px/s²).
    /// `y`: gravity (px/s², negative pulls down).
    pub acceleration: Vec2,
    pub target_speed: f32,
    pub facing_right: bool,
    pub in_air: bool,
    pub is_jumping: bool,

    seek_x: Option<f32>,
}

impl KinematicBody {
    /// Body at pixel position `pos` with the given pixel `size`. Starts
    /// airborne so the first tick settles it onto whatever is below.
    pub fn new(pos: Vec2, size: Vec2, tile_size: u32) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "degenerate body size {size}");
        debug_assert!(tile_size > 0, "tile size must be positive");
        let mut body = Self {
            pos,
            size,
            tile_size: tile_size as f32,
            tile_x: 0,
            tile_y: 0,
            sub_tile_x: 0.0,
            sub_tile_y: 0.0,
            width_span: TileSpan::default(),
            height_span: TileSpan::default(),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            target_speed: 0.0,
            facing_right: true,
            in_air: true,
            is_jumping: false,
            seek_x: None,
        };
        body.refresh_tile_space();
        body
    }

    /// Body whose bottom-left corner sits at the origin of tile `(tx, ty)`.
    pub fn at_tile(tx: i32, ty: i32, size: Vec2, tile_size: u32) -> Self {
        let ts = tile_size as f32;
        Self::new(Vec2::new(tx as f32 * ts, ty as f32 * ts), size, tile_size)
    }

    /// Builder: horizontal acceleration and gravity.
    pub fn with_acceleration(mut self, horizontal: f32, gravity: f32) -> Self {
        self.acceleration = Vec2::new(horizontal, gravity);
        self
    }

    // --- Pixel space -------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x * 0.5
    }

    /// Move the body. Every position change goes through here.
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.refresh_tile_space();
    }

    pub fn set_x(&mut self, x: f32) {
        self.set_position(Vec2::new(x, self.pos.y));
    }

    pub fn set_y(&mut self, y: f32) {
        self.set_position(Vec2::new(self.pos.x, y));
    }

    // --- Tile space --------------------------------------------------------

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn tile_x(&self) -> i32 {
        self.tile_x
    }

    pub fn tile_y(&self) -> i32 {
        self.tile_y
    }

    /// Fractional offset inside the current tile column, in `[0, 1)`.
    pub fn sub_tile_x(&self) -> f32 {
        self.sub_tile_x
    }

    /// Fractional offset inside the current tile row, in `[0, 1)`.
    pub fn sub_tile_y(&self) -> f32 {
        self.sub_tile_y
    }

    /// Columns the box currently overlaps.
    pub fn tile_width_span(&self) -> TileSpan {
        self.width_span
    }

    /// Rows the box currently overlaps.
    pub fn tile_height_span(&self) -> TileSpan {
        self.height_span
    }

    /// Body width in whole tiles, rounded up.
    pub fn tiles_wide(&self) -> i32 {
        (self.size.x / self.tile_size).ceil() as i32
    }

    /// Body height in whole tiles, rounded up.
    pub fn tiles_tall(&self) -> i32 {
        (self.size.y / self.tile_size).ceil() as i32
    }

    /// Re-derive tile space against a different tile size (stage reload).
    pub fn retile(&mut self, tile_size: u32) {
        debug_assert!(tile_size > 0, "tile size must be positive");
        self.tile_size = tile_size as f32;
        self.refresh_tile_space();
    }

    fn refresh_tile_space(&mut self) {
        let ts = self.tile_size;
        let fx = self.pos.x / ts;
        let fy = self.pos.y / ts;
        self.tile_x = fx.floor() as i32;
        self.tile_y = fy.floor() as i32;
        self.sub_tile_x = fx - fx.floor();
        self.sub_tile_y = fy - fy.floor();
        self.width_span = TileSpan::covering(self.pos.x, self.size.x, ts);
        self.height_span = TileSpan::covering(self.pos.y, self.size.y, ts);
    }

    // --- Intent ------------------------------------------------------------

    /// Teleport: zero velocity and drop the body from `(x, y)`.
    pub fn reset_to(&mut self, x: f32, y: f32) {
        self.velocity = Vec2::ZERO;
        self.target_speed = 0.0;
        self.seek_x = None;
        self.in_air = true;
        self.is_jumping = false;
        self.set_position(Vec2::new(x, y));
    }

    /// Launch upwards with `vy = -gravity * impulse_ratio`.
    pub fn jump(&mut self, impulse_ratio: f32) {
        self.in_air = true;
        self.is_jumping = true;
        self.velocity.y = -self.acceleration.y * impulse_ratio;
    }

    /// Seek pixel x: integration stops the body exactly on `x`.
    pub fn go_to_x(&mut self, x: f32) {
        self.seek_x = Some(x);
    }

    pub fn seek_x(&self) -> Option<f32> {
        self.seek_x
    }

    pub fn cancel_seek(&mut self) {
        self.seek_x = None;
    }

    /// Clear a reached seek goal. Returns true when the body just arrived.
    pub fn settle_seek(&mut self) -> bool {
        match self.seek_x {
            Some(goal) if self.pos.x == goal => {
                self.velocity.x = 0.0;
                self.target_speed = 0.0;
                self.seek_x = None;
                true
            }
            _ => false,
        }
    }

    /// Advance velocity by one tick and return the proposed position.
    ///
    /// Horizontal velocity approaches `target_speed` at `acceleration.x`
    /// (scaled by `air_control` while airborne) and snaps once within one
    /// unit. Gravity is applied unconditionally; grounded bodies get pushed
    /// back by the floor.
    pub fn integrate(&mut self, dt: f32, air_control: f32) -> Vec2 {
        debug_assert!(dt > 0.0, "non-positive timestep {dt}");
        let accel = if self.in_air { self.acceleration.x * air_control } else { self.acceleration.x };
        let max_change = accel * dt;
        let diff = self.target_speed - self.velocity.x;
        self.velocity.x += diff.clamp(-max_change, max_change);
        if (self.target_speed - self.velocity.x).abs() < 1.0 {
            self.velocity.x = self.target_speed;
        }
        self.velocity.y += self.acceleration.y * dt;

        let mut proposed = self.pos + self.velocity * dt;
        if let Some(goal) = self.seek_x {
            let before = self.pos.x - goal;
            let after = proposed.x - goal;
            if before == 0.0 || after == 0.0 || before.signum() != after.signum() {
                proposed.x = goal;
            }
        }
        proposed
    }

    /// Update facing from a net horizontal displacement.
    pub fn face(&mut self, dx: f32) {
        if dx > 0.0 {
            self.facing_right = true;
        } else if dx < 0.0 {
            self.facing_right = false;
        }
    }

    // --- Default collision reactions ---------------------------------------

    pub fn on_left_collision(&mut self) {
        self.velocity.x = 0.0;
    }

    pub fn on_right_collision(&mut self) {
        self.velocity.x = 0.0;
    }

    pub fn on_top_collision(&mut self) {
        self.velocity.y = 0.0;
    }

    /// Zero vertical velocity; returns true only on the call that lands an
    /// airborne body.
    pub fn on_bottom_collision(&mut self) -> bool {
        self.velocity.y = 0.0;
        if self.in_air {
            self.in_air = false;
            self.is_jumping = false;
            true
        } else {
            false
        }
    }
}
