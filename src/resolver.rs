//! Per-axis collision resolution against a tile grid.
//!
//! X is resolved before Y so a body walking up a ramp first moves onto the
//! slope column and is then lifted by the vertical pass. Slopes are sampled
//! at the body's horizontal center.

use glam::Vec2;

use crate::api::{CollisionObserver, TileSource};
use crate::body::KinematicBody;
use crate::sweep::AxisSweep;
use crate::tile::{Edge, Slope, Tile, TileKind};
use crate::types::{Side, TileHit, TilePos};

/// Contact tolerance in pixels.
const EPS: f32 = 1e-3;

/// Outcome of one `resolve` call.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub horizontal: Option<(Side, TileHit)>,
    pub vertical: Option<(Side, TileHit)>,
    /// The body went from airborne to grounded during this call.
    pub landed: bool,
}

enum VerticalContact {
    Floor { y: f32, hit: TileHit },
    Ceiling { y: f32, hit: TileHit },
}

/// What a slope interaction resolves against once seams are crossed.
enum Support {
    Slope { pos: TilePos, tile: Tile, slope: Slope },
    Wall { pos: TilePos, tile: Tile },
}

/// Moves a body to its proposed position, stopping at tiles.
///
/// Borrows the grid for the duration of the call; holds no state between
/// calls.
pub struct CollisionResolver<'g, G: TileSource + ?Sized> {
    grid: &'g G,
    tick_rate: f32,
    ts: f32,
}

impl<'g, G: TileSource + ?Sized> CollisionResolver<'g, G> {
    pub fn new(grid: &'g G, tick_rate: f32) -> Self {
        debug_assert!(tick_rate > 0.0, "non-positive tick rate");
        Self { grid, tick_rate, ts: grid.tile_size() as f32 }
    }

    /// Resolve X, then Y, then report. The body is fully updated on return.
    pub fn resolve(
        &self,
        body: &mut KinematicBody,
        proposed: Vec2,
        observer: &mut dyn CollisionObserver,
    ) -> Resolution {
        let horizontal = self.resolve_x(body, proposed.x, observer);
        let (vertical, landed) = self.resolve_y(body, proposed.y, observer);
        Resolution { horizontal, vertical, landed }
    }

    // --- Horizontal --------------------------------------------------------

    fn resolve_x(
        &self,
        body: &mut KinematicBody,
        proposed_x: f32,
        observer: &mut dyn CollisionObserver,
    ) -> Option<(Side, TileHit)> {
        let cur = body.x();
        if proposed_x == cur {
            return None;
        }
        let dir = if proposed_x > cur { 1 } else { -1 };

        let mut new_x = proposed_x;
        let mut contact = None;
        if let Some(rows) = body.tile_height_span().clamped(self.grid.last_row()) {
            let cols = AxisSweep::new(cur, proposed_x, body.tiles_wide(), self.grid.last_col(), self.ts);
            // Nearest column first; within a column any blocking row stops the body.
            'sweep: for col in cols {
                let Some(stop_x) = self.column_reached(body, col, proposed_x, dir) else {
                    continue;
                };
                for row in rows.iter() {
                    let Some(tile) = self.grid.solid_at(col, row) else {
                        continue;
                    };
                    if self.blocks_horizontally(body, col, row, tile, dir) {
                        new_x = stop_x;
                        contact = Some(TileHit { pos: TilePos::new(col, row), tile: *tile });
                        break 'sweep;
                    }
                }
            }
        }
        if let Some((x, hit)) = self.ceiling_wedge_stop(body, new_x, dir) {
            new_x = x;
            contact = Some(hit);
        }

        body.face(new_x - cur);
        body.set_x(new_x);

        let hit = contact?;
        if dir > 0 {
            body.on_right_collision();
            observer.on_right_collision(body, Some(hit));
            Some((Side::Right, hit))
        } else {
            body.on_left_collision();
            observer.on_left_collision(body, Some(hit));
            Some((Side::Left, hit))
        }
    }

    /// If the leading edge crosses into `col` this tick, the x that stops it
    /// at the column's near edge.
    fn column_reached(&self, body: &KinematicBody, col: i32, proposed_x: f32, dir: i32) -> Option<f32> {
        if dir > 0 {
            let left = col as f32 * self.ts;
            (body.right() <= left + EPS && proposed_x + body.width() > left).then(|| left - body.width())
        } else {
            let right = (col + 1) as f32 * self.ts;
            (body.x() >= right - EPS && proposed_x < right).then_some(right)
        }
    }

    /// Stop the body where its top meets a ceiling slope lowering over its
    /// center. Columns are walked in travel order from the center's current
    /// column to the one it is proposed to reach.
    fn ceiling_wedge_stop(&self, body: &KinematicBody, proposed_x: f32, dir: i32) -> Option<(f32, TileHit)> {
        let rows = body.tile_height_span().clamped(self.grid.last_row())?;
        let half = body.width() * 0.5;
        let from = body.center_x();
        let to = proposed_x + half;
        let last_col = self.grid.last_col();
        let first = ((from / self.ts).floor() as i32).clamp(0, last_col);
        let last = ((to / self.ts).floor() as i32).clamp(0, last_col);
        let mut col = first;
        loop {
            for row in rows.iter() {
                let Some(tile) = self.grid.solid_at(col, row) else {
                    continue;
                };
                let Some(slope) = tile.as_slope().filter(|s| s.is_ceiling) else {
                    continue;
                };
                if let Some(center) = self.wedge_stop(body, col, row, slope, to, dir) {
                    return Some((center - half, TileHit { pos: TilePos::new(col, row), tile: *tile }));
                }
            }
            if col == last {
                return None;
            }
            col += dir;
        }
    }

    /// Center x at which the ceiling slope in `(col, row)` comes down to the
    /// body's top while the center travels toward `to`.
    fn wedge_stop(&self, body: &KinematicBody, col: i32, row: i32, slope: &Slope, to: f32, dir: i32) -> Option<f32> {
        let left = col as f32 * self.ts;
        let right = left + self.ts;
        let from = body.center_x();
        let (entry, exit) = if dir > 0 { (from.max(left), to.min(right)) } else { (from.min(right), to.max(left)) };
        if (exit - entry) * dir as f32 <= 0.0 && entry != from {
            return None;
        }

        let base = row as f32 * self.ts + slope.left_height as f32;
        let rise = slope.right_height as f32 - slope.left_height as f32;
        let line = |x: f32| base + rise * (x - left) / self.ts;
        let top = body.top();
        if line(entry) >= top - EPS && line(exit) >= top - EPS {
            return None;
        }
        if line(entry) < top - EPS {
            // Already under the line: only moving further in is refused.
            if entry == from {
                return (line(exit) < line(entry)).then_some(from);
            }
            return Some(entry);
        }
        let meet = left + (top - base) / rise * self.ts;
        Some(if dir > 0 { meet.clamp(entry, exit) } else { meet.clamp(exit, entry) })
    }

    fn blocks_horizontally(&self, body: &KinematicBody, col: i32, row: i32, tile: &Tile, dir: i32) -> bool {
        match &tile.kind {
            TileKind::Normal => !self.ramps_onto(body, col, row, dir),
            TileKind::Slope(slope) => self.slope_blocks(body, col, row, slope, dir),
        }
    }

    /// A block sitting flush against the top of the ramp the body is on is
    /// walked onto, not into; the vertical pass lifts the body.
    fn ramps_onto(&self, body: &KinematicBody, col: i32, row: i32, dir: i32) -> bool {
        let behind = col - dir;
        let Some(ramp) = self.grid.solid_at(behind, row).and_then(Tile::as_slope) else {
            return false;
        };
        if ramp.is_ceiling || ramp.edge_height(Edge::entered_moving(dir).opposite()) != self.grid.tile_size() {
            return false;
        }
        let ramp_left = behind as f32 * self.ts;
        let on_ramp = (ramp_left..=ramp_left + self.ts).contains(&body.center_x());
        let low = ramp.left_height.min(ramp.right_height) as f32;
        on_ramp && body.y() + EPS >= row as f32 * self.ts + low
    }

    /// A slope only blocks through the solid part of the edge being entered.
    fn slope_blocks(&self, body: &KinematicBody, col: i32, row: i32, slope: &Slope, dir: i32) -> bool {
        let entered = Edge::entered_moving(dir);
        let edge = slope.edge_height(entered);
        let row_y = row as f32 * self.ts;
        let (lo, hi) = if slope.is_ceiling {
            (row_y + edge as f32, row_y + self.ts)
        } else {
            (row_y, row_y + edge as f32)
        };
        if body.top().min(hi) - body.y().max(lo) <= EPS {
            return false;
        }
        // Seam: the tile behind continues the same surface at this edge.
        if let Some(behind) = self.grid.solid_at(col - dir, row).and_then(Tile::as_slope) {
            if behind.is_ceiling == slope.is_ceiling && behind.edge_height(entered.opposite()) == edge {
                return false;
            }
        }
        // Multi-row ramp continuing diagonally below and beyond.
        if !slope.is_ceiling {
            if let Some(next) = self.grid.solid_at(col + dir, row - 1).and_then(Tile::as_slope) {
                if next.same_run(slope) {
                    return false;
                }
            }
        }
        true
    }

    // --- Vertical ----------------------------------------------------------

    fn resolve_y(
        &self,
        body: &mut KinematicBody,
        proposed_y: f32,
        observer: &mut dyn CollisionObserver,
    ) -> (Option<(Side, TileHit)>, bool) {
        match self.find_vertical_contact(body, proposed_y) {
            Some(VerticalContact::Floor { y, hit }) => {
                body.set_y(y);
                let landed = body.on_bottom_collision();
                observer.on_bottom_collision(body, Some(hit));
                if landed {
                    observer.on_land(body);
                }
                (Some((Side::Bottom, hit)), landed)
            }
            Some(VerticalContact::Ceiling { y, hit }) => {
                body.set_y(y);
                body.on_top_collision();
                observer.on_top_collision(body, Some(hit));
                (Some((Side::Top, hit)), false)
            }
            None => {
                body.set_y(proposed_y);
                body.in_air = true;
                (None, false)
            }
        }
    }

    fn find_vertical_contact(&self, body: &KinematicBody, proposed_y: f32) -> Option<VerticalContact> {
        let cols = body.tile_width_span().clamped(self.grid.last_col())?;
        let moving_up = proposed_y > body.y();
        let rows = AxisSweep::new(body.y(), proposed_y, body.tiles_tall(), self.grid.last_row(), self.ts);

        // The slope under the body's center wins over anything its edges touch.
        let center_col = (body.center_x() / self.ts).floor() as i32;
        if cols.contains(center_col) {
            for row in rows {
                let Some(tile) = self.grid.solid_at(center_col, row) else {
                    continue;
                };
                let pos = TilePos::new(center_col, row);
                match tile.kind {
                    TileKind::Slope(slope) => {
                        if let Some(contact) = self.slope_contact(body, pos, *tile, slope, proposed_y, moving_up) {
                            return Some(contact);
                        }
                    }
                    TileKind::Normal => {
                        if self.normal_blocks_vertically(body, row, proposed_y, moving_up) {
                            break;
                        }
                    }
                }
            }
        }

        for row in rows {
            for col in cols.iter() {
                let Some(tile) = self.grid.solid_at(col, row) else {
                    continue;
                };
                let pos = TilePos::new(col, row);
                match tile.kind {
                    TileKind::Slope(slope) => {
                        if let Some(contact) = self.slope_contact(body, pos, *tile, slope, proposed_y, moving_up) {
                            return Some(contact);
                        }
                    }
                    TileKind::Normal => {
                        if !self.normal_blocks_vertically(body, row, proposed_y, moving_up) {
                            continue;
                        }
                        let hit = TileHit { pos, tile: *tile };
                        if moving_up {
                            return Some(VerticalContact::Ceiling { y: row as f32 * self.ts - body.height(), hit });
                        }
                        if let Some(contact) = self.descent_handoff(body, pos, proposed_y) {
                            return Some(contact);
                        }
                        return Some(VerticalContact::Floor { y: (row + 1) as f32 * self.ts, hit });
                    }
                }
            }
        }
        None
    }

    fn normal_blocks_vertically(&self, body: &KinematicBody, row: i32, proposed_y: f32, moving_up: bool) -> bool {
        if moving_up {
            let bottom = row as f32 * self.ts;
            bottom >= body.top() - EPS && bottom < proposed_y + body.height()
        } else {
            let top = (row + 1) as f32 * self.ts;
            top <= body.y() + EPS && top >= proposed_y
        }
    }

    /// Landing on a block whose right neighbour is a slope descending from
    /// the block's top: the slope decides.
    fn descent_handoff(&self, body: &KinematicBody, block: TilePos, proposed_y: f32) -> Option<VerticalContact> {
        let pos = TilePos::new(block.x + 1, block.y);
        let tile = self.grid.solid_at(pos.x, pos.y)?;
        let slope = *tile.as_slope()?;
        if slope.is_ceiling || !slope.is_left_slope() || slope.left_height != self.grid.tile_size() {
            return None;
        }
        self.slope_contact(body, pos, *tile, slope, proposed_y, false)
    }

    // --- Slopes ------------------------------------------------------------

    fn slope_contact(
        &self,
        body: &KinematicBody,
        pos: TilePos,
        tile: Tile,
        slope: Slope,
        proposed_y: f32,
        moving_up: bool,
    ) -> Option<VerticalContact> {
        if moving_up && !slope.is_ceiling {
            // The underside of a floor slope is flat and fully solid.
            let hit = TileHit { pos, tile };
            return self
                .normal_blocks_vertically(body, pos.y, proposed_y, true)
                .then(|| VerticalContact::Ceiling { y: pos.y as f32 * self.ts - body.height(), hit });
        }
        match self.support_under(body, pos, tile, slope) {
            Support::Wall { pos, tile } => {
                if moving_up {
                    return None;
                }
                let top = (pos.y + 1) as f32 * self.ts;
                let y = self.floor_contact(body, top, slope.part_count, proposed_y)?;
                Some(VerticalContact::Floor { y, hit: TileHit { pos, tile } })
            }
            Support::Slope { pos, tile, slope } => {
                let position_on_tile = (body.center_x() - pos.x as f32 * self.ts) / self.ts;
                let surface = pos.y as f32 * self.ts + slope.surface_offset(position_on_tile);
                let hit = TileHit { pos, tile };
                match (slope.is_ceiling, moving_up) {
                    (false, false) => {
                        let y = self.floor_contact(body, surface, slope.part_count, proposed_y)?;
                        Some(VerticalContact::Floor { y, hit })
                    }
                    (true, true) => {
                        let y = self.ceiling_contact(body, surface, slope.part_count, proposed_y)?;
                        Some(VerticalContact::Ceiling { y, hit })
                    }
                    _ => None,
                }
            }
        }
    }

    /// Follow the run across a seam when the body's center has left `pos`.
    fn support_under(&self, body: &KinematicBody, pos: TilePos, tile: Tile, slope: Slope) -> Support {
        let stay = Support::Slope { pos, tile, slope };
        let position_on_tile = (body.center_x() - pos.x as f32 * self.ts) / self.ts;
        let (dir, edge) = if position_on_tile < 0.0 {
            (-1, Edge::Left)
        } else if position_on_tile > 1.0 {
            (1, Edge::Right)
        } else {
            return stay;
        };

        let side = TilePos::new(pos.x + dir, pos.y);
        if let Some(next) = self.grid.solid_at(side.x, side.y) {
            return match next.kind {
                TileKind::Slope(next_slope) if next_slope.is_ceiling == slope.is_ceiling => {
                    tracing::trace!(from = ?pos, to = ?side, "slope seam");
                    Support::Slope { pos: side, tile: *next, slope: next_slope }
                }
                TileKind::Normal if !slope.is_ceiling => Support::Wall { pos: side, tile: *next },
                _ => stay,
            };
        }

        // Nothing beside: a full-height edge continues one row up, a zero edge one row down.
        let ts = self.grid.tile_size();
        let height = slope.edge_height(edge);
        let drow = match height {
            h if h == ts => 1,
            0 => -1,
            _ => return stay,
        };
        let diag = TilePos::new(side.x, pos.y + drow);
        match self.grid.solid_at(diag.x, diag.y).map(|t| (t, t.kind)) {
            Some((next, TileKind::Slope(next_slope)))
                if next_slope.is_ceiling == slope.is_ceiling
                    && next_slope.edge_height(edge.opposite()) == ts - height =>
            {
                tracing::trace!(from = ?pos, to = ?diag, "slope seam (diagonal)");
                Support::Slope { pos: diag, tile: *next, slope: next_slope }
            }
            _ => stay,
        }
    }

    /// How far a grounded body may be lifted or dropped onto a slope surface
    /// in one tick at horizontal speed `vx`.
    fn reach(&self, vx: f32, part_count: f32) -> f32 {
        (vx.abs() / (part_count * self.tick_rate * 0.5)).ceil().max(1.0)
    }

    fn floor_contact(&self, body: &KinematicBody, surface: f32, part_count: f32, proposed_y: f32) -> Option<f32> {
        let reach = self.reach(body.velocity.x, part_count);
        let y = body.y();
        if surface > y + reach {
            return None;
        }
        if proposed_y <= surface {
            return Some(surface);
        }
        // Above the surface: grounded bodies stick to it unless it fell away
        // faster than they could have followed.
        (!body.in_air && surface >= y - reach).then_some(surface)
    }

    fn ceiling_contact(&self, body: &KinematicBody, surface: f32, part_count: f32, proposed_y: f32) -> Option<f32> {
        let reach = self.reach(body.velocity.x, part_count);
        if surface < body.top() - reach {
            return None;
        }
        (proposed_y + body.height() >= surface).then(|| surface - body.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NoopObserver;
    use crate::config::PhysicsConfig;
    use crate::grid::TileGrid;

    const TS: u32 = 32;

    fn slope(left: u32, right: u32) -> Tile {
        Tile::slope(left, right, false, 1.0, TS).unwrap()
    }

    fn half_slope(left: u32, right: u32) -> Tile {
        Tile::slope(left, right, false, 2.0, TS).unwrap()
    }

    fn floor_grid(cols: usize, rows: usize, floor_row: usize) -> TileGrid {
        let mut g = TileGrid::new(TS, cols, rows);
        g.fill(0, 0, cols - 1, floor_row, Tile::solid());
        g
    }

    fn body_at(x: f32, y: f32, cfg: &PhysicsConfig) -> KinematicBody {
        KinematicBody::new(Vec2::new(x, y), Vec2::new(32.0, 64.0), TS)
            .with_acceleration(cfg.ground_acceleration, cfg.gravity)
    }

    fn tick(grid: &TileGrid, body: &mut KinematicBody, cfg: &PhysicsConfig) -> Resolution {
        let proposed = body.integrate(cfg.dt(), cfg.air_control);
        CollisionResolver::new(grid, cfg.tick_rate).resolve(body, proposed, &mut NoopObserver)
    }

    fn settle(grid: &TileGrid, body: &mut KinematicBody, cfg: &PhysicsConfig, ticks: usize) {
        for _ in 0..ticks {
            tick(grid, body, cfg);
        }
    }

    #[derive(Default)]
    struct Counter {
        left: usize,
        right: usize,
        top: usize,
        bottom: usize,
        lands: usize,
    }

    impl CollisionObserver for Counter {
        fn on_left_collision(&mut self, _: &KinematicBody, _: Option<TileHit>) {
            self.left += 1;
        }
        fn on_right_collision(&mut self, _: &KinematicBody, _: Option<TileHit>) {
            self.right += 1;
        }
        fn on_top_collision(&mut self, _: &KinematicBody, _: Option<TileHit>) {
            self.top += 1;
        }
        fn on_bottom_collision(&mut self, _: &KinematicBody, _: Option<TileHit>) {
            self.bottom += 1;
        }
        fn on_land(&mut self, _: &KinematicBody) {
            self.lands += 1;
        }
    }

    #[test]
    fn test_grounded_rest_is_idempotent() {
        let cfg = PhysicsConfig::default();
        for floor_row in [0usize, 3, 7] {
            let g = floor_grid(10, 12, floor_row);
            let top = (floor_row as f32 + 1.0) * TS as f32;
            let mut b = body_at(96.0, top, &cfg);
            b.in_air = false;
            for _ in 0..5 {
                let r = tick(&g, &mut b, &cfg);
                assert_eq!(b.y(), top);
                assert!(!b.in_air);
                assert_eq!(r.vertical.map(|(s, _)| s), Some(Side::Bottom));
            }
        }
    }

    #[test]
    fn test_fall_lands_on_floor() {
        let cfg = PhysicsConfig::default();
        let g = floor_grid(20, 20, 0);
        let mut b = body_at(64.0, 500.0, &cfg);
        let mut obs = Counter::default();
        for _ in 0..240 {
            let p = b.integrate(cfg.dt(), cfg.air_control);
            CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
        }
        assert_eq!(b.y(), 32.0);
        assert!(!b.in_air);
        assert_eq!(obs.lands, 1);
        assert!(obs.bottom > 1);
    }

    #[test]
    fn test_vertical_tunneling_prevented() {
        let cfg = PhysicsConfig::default();
        let mut g = TileGrid::new(TS, 10, 40);
        g.fill(0, 5, 9, 5, Tile::solid());
        let mut b = body_at(64.0, 1000.0, &cfg);
        // 5000 px/s at 120 Hz is ~42 px per tick, more than a tile.
        b.velocity.y = -5000.0;
        for _ in 0..60 {
            tick(&g, &mut b, &cfg);
        }
        assert_eq!(b.y(), 192.0);
        assert!(!b.in_air);
    }

    #[test]
    fn test_horizontal_tunneling_prevented() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(40, 10, 0);
        g.set(20, 1, Some(Tile::solid()));
        g.set(20, 2, Some(Tile::solid()));
        let mut b = body_at(64.0, 32.0, &cfg);
        b.in_air = false;
        let mut obs = Counter::default();
        let p = Vec2::new(64.0 + 900.0, 32.0);
        let r = CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
        assert_eq!(b.x(), 20.0 * 32.0 - 32.0);
        assert_eq!(obs.right, 1);
        assert_eq!(r.horizontal.map(|(s, h)| (s, h.pos)), Some((Side::Right, TilePos::new(20, 1))));
        assert!(b.facing_right);
    }

    #[test]
    fn test_left_wall_stops_and_faces_left() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(20, 10, 0);
        g.fill(3, 1, 3, 4, Tile::solid());
        let mut b = body_at(200.0, 32.0, &cfg);
        b.in_air = false;
        let mut obs = Counter::default();
        b.velocity.x = -300.0;
        CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, Vec2::new(20.0, 32.0), &mut obs);
        assert_eq!(b.x(), 128.0);
        assert_eq!(b.velocity.x, 0.0);
        assert!(!b.facing_right);
        assert_eq!(obs.left, 1);
    }

    #[test]
    fn test_corner_resolves_x_before_y() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(20, 10, 0);
        g.fill(10, 1, 10, 5, Tile::solid());
        let mut b = body_at(280.0, 40.0, &cfg);
        let mut obs = Counter::default();
        CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, Vec2::new(300.0, 20.0), &mut obs);
        assert_eq!(b.position(), Vec2::new(288.0, 32.0));
        assert_eq!((obs.right, obs.bottom, obs.lands), (1, 1, 1));
    }

    #[test]
    fn test_centered_slope_settles_mid_height() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(12, 10, 2);
        g.set(6, 3, Some(slope(0, 32)));
        let mut b = body_at(192.0, 300.0, &cfg);
        settle(&g, &mut b, &cfg, 240);
        assert_eq!(b.y(), 112.0);
        assert!(!b.in_air);
    }

    #[test]
    fn test_slope_continuity_across_tile() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(12, 10, 2);
        g.set(6, 3, Some(slope(0, 32)));
        for step in 0..=32 {
            let p = step as f32 / 32.0;
            let center = 192.0 + p * 32.0;
            let mut b = body_at(center - 16.0, 200.0, &cfg);
            settle(&g, &mut b, &cfg, 180);
            let expected = 96.0 + (32.0 * p).ceil();
            assert_eq!(b.y(), expected, "position_on_tile {p}");
        }
    }

    #[test]
    fn test_seam_between_half_slopes_is_stable() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(14, 10, 2);
        g.set(6, 3, Some(half_slope(0, 16)));
        g.set(7, 3, Some(half_slope(16, 32)));
        g.fill(8, 3, 13, 3, Tile::solid());

        // Center one pixel past the seam onto the upper half.
        let mut b = body_at(224.0 + 1.0 - 16.0, 200.0, &cfg);
        settle(&g, &mut b, &cfg, 180);
        let rest = b.y();
        assert_eq!(rest, 96.0 + 17.0);
        for _ in 0..30 {
            tick(&g, &mut b, &cfg);
            assert_eq!(b.y(), rest);
        }

        // Center one pixel past the top of the run: stands on the block level.
        let mut b = body_at(256.0 + 1.0 - 16.0, 200.0, &cfg);
        settle(&g, &mut b, &cfg, 180);
        for _ in 0..30 {
            tick(&g, &mut b, &cfg);
            assert_eq!(b.y(), 128.0);
        }

        // Center one pixel before the foot of the run: floor level.
        let mut b = body_at(192.0 - 1.0 - 16.0, 200.0, &cfg);
        settle(&g, &mut b, &cfg, 180);
        for _ in 0..30 {
            tick(&g, &mut b, &cfg);
            assert_eq!(b.y(), 96.0);
        }
    }

    /// Floor at row 2, 45° ramp (6,3)-(7,4)-(8,5) with fill, plateau from column 9.
    fn ramp_grid() -> TileGrid {
        let mut g = floor_grid(16, 12, 2);
        g.set(6, 3, Some(slope(0, 32)));
        g.set(7, 4, Some(slope(0, 32)));
        g.set(8, 5, Some(slope(0, 32)));
        g.set(7, 3, Some(Tile::solid()));
        g.fill(8, 3, 8, 4, Tile::solid());
        g.fill(9, 3, 15, 5, Tile::solid());
        g
    }

    #[test]
    fn test_walk_up_ramp_onto_plateau() {
        let cfg = PhysicsConfig::default();
        let g = ramp_grid();
        let mut b = body_at(100.0, 96.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        let mut obs = Counter::default();
        for _ in 0..360 {
            b.target_speed = cfg.walk_speed;
            let p = b.integrate(cfg.dt(), cfg.air_control);
            CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
            assert!(!b.in_air, "left the ramp at x={} y={}", b.x(), b.y());
            if b.x() > 330.0 {
                break;
            }
        }
        assert!(b.x() > 330.0);
        assert_eq!(b.y(), 192.0);
        assert_eq!(obs.right, 0);
    }

    #[test]
    fn test_walk_up_left_facing_ramp_onto_plateau() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(16, 12, 2);
        g.set(9, 3, Some(slope(32, 0)));
        g.set(8, 4, Some(slope(32, 0)));
        g.set(7, 5, Some(slope(32, 0)));
        g.set(8, 3, Some(Tile::solid()));
        g.fill(7, 3, 7, 4, Tile::solid());
        g.fill(0, 3, 6, 5, Tile::solid());
        let mut b = body_at(400.0, 96.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        let mut obs = Counter::default();
        for _ in 0..360 {
            b.target_speed = -cfg.walk_speed;
            let p = b.integrate(cfg.dt(), cfg.air_control);
            CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
            assert!(!b.in_air, "left the ramp at x={} y={}", b.x(), b.y());
            if b.x() < 150.0 {
                break;
            }
        }
        assert!(b.x() < 150.0);
        assert_eq!(b.y(), 192.0);
        assert_eq!(obs.left, 0);
    }

    #[test]
    fn test_dash_up_half_slope_run_onto_block() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(14, 10, 2);
        g.set(6, 3, Some(half_slope(0, 16)));
        g.set(7, 3, Some(half_slope(16, 32)));
        g.fill(8, 3, 13, 3, Tile::solid());
        let mut b = body_at(100.0, 96.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        let mut obs = Counter::default();
        for _ in 0..360 {
            b.target_speed = cfg.dash_speed;
            let p = b.integrate(cfg.dt(), cfg.air_control);
            CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
            assert!(!b.in_air, "left the run at x={} y={}", b.x(), b.y());
            if b.x() > 300.0 {
                break;
            }
        }
        assert!(b.x() > 300.0);
        assert_eq!(b.y(), 128.0);
        assert_eq!(obs.right, 0);
    }

    #[test]
    fn test_walk_down_ramp_stays_grounded() {
        let cfg = PhysicsConfig::default();
        let g = ramp_grid();
        let mut b = body_at(330.0, 192.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        assert!(!b.in_air);
        for _ in 0..360 {
            b.target_speed = -cfg.walk_speed;
            tick(&g, &mut b, &cfg);
            assert!(!b.in_air, "left the ramp at x={} y={}", b.x(), b.y());
            if b.x() < 120.0 {
                break;
            }
        }
        assert!(b.x() < 120.0);
        assert_eq!(b.y(), 96.0);
    }

    #[test]
    fn test_slope_tall_side_is_a_wall() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(16, 10, 2);
        // Ramp rising to the right with a cliff after it.
        g.set(6, 3, Some(slope(0, 32)));
        let mut b = body_at(260.0, 96.0, &cfg);
        b.in_air = false;
        let mut obs = Counter::default();
        CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, Vec2::new(200.0, 96.0), &mut obs);
        assert_eq!(b.x(), 224.0);
        assert_eq!(obs.left, 1);
    }

    #[test]
    fn test_walk_off_ledge_goes_airborne() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(16, 10, 0);
        g.fill(0, 1, 5, 3, Tile::solid());
        let mut b = body_at(150.0, 128.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        assert!(!b.in_air);
        let mut left_ground_at = None;
        for i in 0..200 {
            b.target_speed = cfg.walk_speed;
            tick(&g, &mut b, &cfg);
            if b.in_air && left_ground_at.is_none() {
                left_ground_at = Some(i);
                assert!(b.x() >= 192.0);
            }
        }
        assert!(left_ground_at.is_some());
        assert_eq!(b.y(), 32.0);
        assert!(!b.in_air);
    }

    #[test]
    fn test_walk_off_block_down_descending_slope() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(16, 10, 2);
        g.fill(0, 3, 6, 3, Tile::solid());
        g.set(7, 3, Some(slope(32, 0)));

        // Center still over the block: block top.
        let mut b = body_at(200.0, 130.0, &cfg);
        settle(&g, &mut b, &cfg, 60);
        assert_eq!(b.y(), 128.0);

        let mut b = body_at(150.0, 128.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        for _ in 0..360 {
            b.target_speed = cfg.walk_speed;
            tick(&g, &mut b, &cfg);
            assert!(!b.in_air, "left the slope at x={} y={}", b.x(), b.y());
            if b.x() > 280.0 {
                break;
            }
        }
        assert!(b.x() > 280.0);
        assert_eq!(b.y(), 96.0);
    }

    #[test]
    fn test_ceiling_slope_stops_jump() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(12, 12, 2);
        g.set(6, 6, Some(Tile::slope(0, 32, true, 1.0, TS).unwrap()));
        g.fill(0, 7, 11, 7, Tile::solid());
        let mut b = body_at(192.0, 96.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        b.jump(cfg.jump_impulse_ratio);
        let mut obs = Counter::default();
        let mut peak = b.y();
        for _ in 0..240 {
            let p = b.integrate(cfg.dt(), cfg.air_control);
            CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
            peak = peak.max(b.y());
        }
        assert_eq!(obs.top, 1);
        // Ceiling line at the center is 192 + 16; head stops there.
        assert_eq!(peak, 208.0 - 64.0);
        assert_eq!(b.y(), 96.0);
        assert!(!b.in_air);
    }

    #[test]
    fn test_walking_under_ceiling_slope_stops_at_head_height() {
        let cfg = PhysicsConfig::default();

        // Ceiling line falls from 96 at x=224 to 64 at x=192.
        let mut g = floor_grid(16, 10, 0);
        g.set(6, 2, Some(Tile::slope(0, 32, true, 1.0, TS).unwrap()));
        let mut b = body_at(260.0, 32.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        let mut obs = Counter::default();
        for _ in 0..120 {
            b.target_speed = -cfg.walk_speed;
            let p = b.integrate(cfg.dt(), cfg.air_control);
            let r = CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
            let surface = 64.0 + (b.center_x() - 192.0).clamp(0.0, 32.0);
            assert!(b.top() <= surface + EPS, "head inside the slope at x={}", b.x());
            if obs.left > 0 {
                assert_eq!(r.horizontal.map(|(s, h)| (s, h.pos)), Some((Side::Left, TilePos::new(6, 2))));
            }
        }
        assert_eq!(b.x(), 208.0);
        assert_eq!(b.velocity.x, 0.0);
        assert!(obs.left > 0);
        assert!(!b.in_air);

        // Backing out is free.
        for _ in 0..30 {
            b.target_speed = cfg.walk_speed;
            tick(&g, &mut b, &cfg);
        }
        assert!(b.x() > 208.0);

        // Mirrored: line falls from 96 at x=192 to 64 at x=224.
        let mut g = floor_grid(16, 10, 0);
        g.set(6, 2, Some(Tile::slope(32, 0, true, 1.0, TS).unwrap()));
        let mut b = body_at(100.0, 32.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        let mut obs = Counter::default();
        for _ in 0..120 {
            b.target_speed = cfg.walk_speed;
            let p = b.integrate(cfg.dt(), cfg.air_control);
            CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
        }
        assert_eq!(b.x(), 176.0);
        assert!(obs.right > 0);
    }

    #[test]
    fn test_floor_slope_underside_stops_jump() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(12, 12, 0);
        g.set(5, 4, Some(slope(0, 32)));
        let mut b = body_at(160.0, 32.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        b.jump(cfg.jump_impulse_ratio);
        let mut obs = Counter::default();
        let mut peak = b.y();
        for _ in 0..240 {
            let p = b.integrate(cfg.dt(), cfg.air_control);
            let r = CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
            if r.vertical.map(|(s, _)| s) == Some(Side::Top) {
                assert_eq!(r.vertical.map(|(_, h)| h.pos), Some(TilePos::new(5, 4)));
            }
            peak = peak.max(b.y());
        }
        assert_eq!(obs.top, 1);
        assert_eq!(peak, 128.0 - 64.0);
        assert_eq!(b.y(), 32.0);
        assert_eq!(obs.lands, 1);
    }

    #[test]
    fn test_block_ceiling_stops_jump() {
        let cfg = PhysicsConfig::default();
        let mut g = floor_grid(12, 12, 0);
        g.fill(0, 4, 11, 4, Tile::solid());
        let mut b = body_at(64.0, 32.0, &cfg);
        settle(&g, &mut b, &cfg, 2);
        b.jump(cfg.jump_impulse_ratio);
        let mut obs = Counter::default();
        let mut peak = b.y();
        for _ in 0..240 {
            let p = b.integrate(cfg.dt(), cfg.air_control);
            CollisionResolver::new(&g, cfg.tick_rate).resolve(&mut b, p, &mut obs);
            peak = peak.max(b.y());
        }
        assert_eq!(obs.top, 1);
        assert_eq!(peak, 128.0 - 64.0);
        assert_eq!(b.y(), 32.0);
    }

    #[test]
    fn test_body_outside_grid_falls_freely() {
        let cfg = PhysicsConfig::default();
        let g = floor_grid(4, 4, 0);
        let mut b = body_at(-500.0, 50.0, &cfg);
        tick(&g, &mut b, &cfg);
        assert!(b.y() < 50.0);
        assert!(b.in_air);
    }
}
