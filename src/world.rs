use glam::Vec2;

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{CollisionObserver, Controller, TileSource};
use crate::body::KinematicBody;
use crate::config::PhysicsConfig;
use crate::error::ConfigError;
use crate::grid::TileGrid;
use crate::resolver::CollisionResolver;
use crate::types::*;

/// Fixed-timestep simulation over one tile grid.
///
/// Bodies are stepped one after another in spawn order; each body sees the
/// grid only, never other bodies.
pub struct World {
    cfg: PhysicsConfig,
    grid: Arc<TileGrid>,
    tick: u64,
    next_id: u32,
    accumulator: f32,

    // Ascending by id; ids are never reused.
    slots: Vec<Slot>,

    // Events recorded since the last drain
    events: Vec<CollisionEvent>,

    // Timing for the last step (optional)
    last_timing: Option<StepTiming>,
}

struct Slot {
    id: BodyId,
    body: KinematicBody,
    controller: Option<Box<dyn Controller>>,
    observer: Option<Box<dyn CollisionObserver>>,
}

/// Records world events, then forwards to the body's own observer.
struct Recorder<'a> {
    tick: u64,
    body: BodyId,
    events: &'a mut Vec<CollisionEvent>,
    inner: Option<&'a mut (dyn CollisionObserver + 'static)>,
}

impl Recorder<'_> {
    fn push(&mut self, kind: EventKind, side: Side, tile: Option<TileHit>) {
        self.events.push(CollisionEvent { kind, tick: self.tick, body: self.body, side, tile });
    }
}

impl CollisionObserver for Recorder<'_> {
    fn on_left_collision(&mut self, body: &KinematicBody, tile: Option<TileHit>) {
        self.push(EventKind::Collision, Side::Left, tile);
        if let Some(inner) = self.inner.as_deref_mut() {
            inner.on_left_collision(body, tile);
        }
    }

    fn on_right_collision(&mut self, body: &KinematicBody, tile: Option<TileHit>) {
        self.push(EventKind::Collision, Side::Right, tile);
        if let Some(inner) = self.inner.as_deref_mut() {
            inner.on_right_collision(body, tile);
        }
    }

    fn on_top_collision(&mut self, body: &KinematicBody, tile: Option<TileHit>) {
        self.push(EventKind::Collision, Side::Top, tile);
        if let Some(inner) = self.inner.as_deref_mut() {
            inner.on_top_collision(body, tile);
        }
    }

    fn on_bottom_collision(&mut self, body: &KinematicBody, tile: Option<TileHit>) {
        self.push(EventKind::Collision, Side::Bottom, tile);
        if let Some(inner) = self.inner.as_deref_mut() {
            inner.on_bottom_collision(body, tile);
        }
    }

    fn on_land(&mut self, body: &KinematicBody) {
        tracing::debug!(body = self.body.0, x = body.x(), y = body.y(), tick = self.tick, "landed");
        let tile = self.events.last().filter(|e| e.body == self.body && e.side == Side::Bottom).and_then(|e| e.tile);
        self.push(EventKind::Landed, Side::Bottom, tile);
        if let Some(inner) = self.inner.as_deref_mut() {
            inner.on_land(body);
        }
    }
}

impl World {
    pub fn new(cfg: PhysicsConfig, grid: Arc<TileGrid>) -> Result<Self, ConfigError> {
        cfg.validate()?;
        if grid.tile_size() == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        Ok(Self {
            cfg,
            grid,
            tick: 0,
            next_id: 0,
            accumulator: 0.0,
            slots: Vec::new(),
            events: Vec::new(),
            last_timing: None,
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.cfg
    }

    pub fn grid(&self) -> &Arc<TileGrid> {
        &self.grid
    }

    /// Ticks stepped so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Body of `size` at `pos`, using this world's tile size, acceleration and gravity.
    pub fn new_body(&self, pos: Vec2, size: Vec2) -> KinematicBody {
        KinematicBody::new(pos, size, self.grid.tile_size())
            .with_acceleration(self.cfg.ground_acceleration, self.cfg.gravity)
    }

    /// Add a body with no controller; drive it through `body_mut`.
    pub fn spawn(&mut self, body: KinematicBody) -> BodyId {
        self.insert(body, None)
    }

    pub fn spawn_controlled(&mut self, body: KinematicBody, controller: Box<dyn Controller>) -> BodyId {
        self.insert(body, Some(controller))
    }

    fn insert(&mut self, mut body: KinematicBody, controller: Option<Box<dyn Controller>>) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.retile(self.grid.tile_size());
        tracing::debug!(body = id.0, x = body.x(), y = body.y(), "spawned");
        self.slots.push(Slot { id, body, controller, observer: None });
        id
    }

    /// Remove a body. Returns it if it existed.
    pub fn despawn(&mut self, id: BodyId) -> Option<KinematicBody> {
        let index = self.index_of(id)?;
        let slot = self.slots.remove(index);
        tracing::debug!(body = id.0, "despawned");
        Some(slot.body)
    }

    /// Install the observer that receives this body's collision callbacks.
    pub fn set_observer(&mut self, id: BodyId, observer: Box<dyn CollisionObserver>) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.observer = Some(observer);
                true
            }
            None => false,
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&KinematicBody> {
        self.index_of(id).map(|i| &self.slots[i].body)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut KinematicBody> {
        self.slot_mut(id).map(|s| &mut s.body)
    }

    /// The body's controller as its concrete type.
    pub fn controller_mut<C: Controller>(&mut self, id: BodyId) -> Option<&mut C> {
        let controller: &mut dyn Controller = self.slot_mut(id)?.controller.as_deref_mut()?;
        (controller as &mut dyn Any).downcast_mut::<C>()
    }

    /// Bodies in step order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &KinematicBody)> {
        self.slots.iter().map(|s| (s.id, &s.body))
    }

    /// Swap in a new grid between ticks. Bodies keep their pixel positions.
    pub fn replace_grid(&mut self, grid: Arc<TileGrid>) {
        tracing::info!(cols = grid.cols(), rows = grid.rows(), tile_size = grid.tile_size(), "grid replaced");
        let tile_size = grid.tile_size();
        self.grid = grid;
        for slot in &mut self.slots {
            slot.body.retile(tile_size);
        }
    }

    /// Run exactly one tick.
    pub fn step(&mut self) {
        let timing = self.cfg.enable_timing;
        let t_all = if timing { Some(Instant::now()) } else { None };
        let mut intent_ms = 0.0;
        let mut resolve_ms = 0.0;
        let events_before = self.events.len();

        self.tick += 1;
        let tick = self.tick;
        let dt = self.cfg.dt();
        let resolver = CollisionResolver::new(&*self.grid, self.cfg.tick_rate);

        for slot in &mut self.slots {
            let t0 = if timing { Some(Instant::now()) } else { None };
            if let Some(controller) = slot.controller.as_deref_mut() {
                let intent = controller.tick_intent(&slot.body, dt);
                apply_intent(&mut slot.body, intent, self.cfg.jump_impulse_ratio);
            }
            intent_ms += t0.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);

            let t1 = if timing { Some(Instant::now()) } else { None };
            let proposed = slot.body.integrate(dt, self.cfg.air_control);
            let mut recorder = Recorder {
                tick,
                body: slot.id,
                events: &mut self.events,
                inner: slot.observer.as_deref_mut(),
            };
            resolver.resolve(&mut slot.body, proposed, &mut recorder);
            slot.body.settle_seek();
            resolve_ms += t1.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);
        }

        if let Some(t_all) = t_all {
            self.last_timing = Some(StepTiming {
                step_ms: t_all.elapsed().as_secs_f64() * 1000.0,
                intent_ms,
                resolve_ms,
                events_emitted: self.events.len() - events_before,
            });
        }
    }

    /// Feed wall-clock time; runs as many whole ticks as fit, up to
    /// `max_catchup_ticks`. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let dt = self.cfg.dt();
        self.accumulator += elapsed.max(0.0);
        let mut ran = 0;
        while self.accumulator >= dt && ran < self.cfg.max_catchup_ticks {
            self.step();
            self.accumulator -= dt;
            ran += 1;
        }
        if self.accumulator >= dt {
            let dropped = (self.accumulator / dt) as u64;
            tracing::warn!(dropped, ran, "simulation behind; dropping ticks");
            self.accumulator %= dt;
        }
        ran
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Return debug stats for the current state.
    pub fn debug_stats(&self) -> WorldStats {
        WorldStats {
            tick: self.tick,
            bodies: self.slots.len(),
            airborne: self.slots.iter().filter(|s| s.body.in_air).count(),
            pending_events: self.events.len(),
        }
    }

    /// Return timing breakdown for the last `step`.
    pub fn timing(&self) -> Option<StepTiming> {
        self.last_timing
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |s| s.id).ok()
    }

    fn slot_mut(&mut self, id: BodyId) -> Option<&mut Slot> {
        let index = self.index_of(id)?;
        Some(&mut self.slots[index])
    }
}

fn apply_intent(body: &mut KinematicBody, intent: Intent, jump_ratio: f32) {
    body.target_speed = intent.target_speed;
    match intent.seek_x {
        Some(x) => body.go_to_x(x),
        None => body.cancel_seek(),
    }
    if intent.jump && !body.in_air {
        body.jump(jump_ratio);
    }
}
