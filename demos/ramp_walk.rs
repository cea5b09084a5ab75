use std::sync::Arc;

use glam::Vec2;
use slopebonk::*;

/// Floor at row 2, 45° ramp (6,3)-(7,4)-(8,5) with fill, plateau from column 9.
fn ramp_grid() -> Result<TileGrid, ConfigError> {
    let mut grid = TileGrid::new(32, 16, 12);
    grid.fill(0, 0, 15, 2, Tile::solid());
    for (x, y) in [(6, 3), (7, 4), (8, 5)] {
        grid.set(x, y, Some(Tile::slope(0, 32, false, 1.0, 32)?));
    }
    grid.set(7, 3, Some(Tile::solid()));
    grid.fill(8, 3, 8, 4, Tile::solid());
    grid.fill(9, 3, 15, 5, Tile::solid());
    Ok(grid)
}

fn main() -> Result<(), ConfigError> {
    let cfg = PhysicsConfig { enable_timing: true, ..Default::default() };
    let mut world = World::new(cfg, Arc::new(ramp_grid()?))?;

    let player = world.spawn_controlled(
        world.new_body(Vec2::new(100.0, 96.0), Vec2::new(32.0, 64.0)),
        Box::new(PlayerController::new(world.config())),
    );
    let mut ai = SimpleAi::new(world.config().walk_speed);
    ai.go_to_x(60.0);
    let walker = world.spawn_controlled(world.new_body(Vec2::new(400.0, 192.0), Vec2::new(32.0, 64.0)), Box::new(ai));

    if let Some(p) = world.controller_mut::<PlayerController>(player) {
        p.set_input(InputState { right: true, ..Default::default() });
    }

    for _ in 0..360 {
        world.step();
        if world.tick() % 30 == 0 {
            for (id, body) in world.bodies() {
                println!(
                    "tick {:>3} body {} x={:>7.2} y={:>7.2} in_air={}",
                    world.tick(),
                    id.0,
                    body.x(),
                    body.y(),
                    body.in_air
                );
            }
        }
        for ev in world.drain_events() {
            if ev.kind == EventKind::Landed {
                println!("tick {:>3} body {} landed", ev.tick, ev.body.0);
            }
        }
    }

    if let Some(t) = world.timing() {
        println!("timing: step={:.3}ms events={}", t.step_ms, t.events_emitted);
    }
    let arrived = world.controller_mut::<SimpleAi>(walker).map(|ai| ai.arrivals());
    println!("walker arrivals={:?} stats={:?}", arrived, world.debug_stats());
    Ok(())
}
