use std::collections::VecDeque;

use crate::api::Controller;
use crate::body::KinematicBody;
use crate::config::PhysicsConfig;
use crate::types::Intent;

/// Buttons held this tick. Filled by whatever reads the keyboard or pad.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
}

impl InputState {
    /// -1, 0 or 1. Opposing directions cancel.
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Turns a held-button snapshot into movement intent.
///
/// Jump triggers on the press edge only; holding the button through a
/// landing does not bounce the body again.
#[derive(Clone, Debug)]
pub struct PlayerController {
    walk_speed: f32,
    dash_speed: f32,
    input: InputState,
    jump_held: bool,
}

impl PlayerController {
    pub fn new(cfg: &PhysicsConfig) -> Self {
        Self { walk_speed: cfg.walk_speed, dash_speed: cfg.dash_speed, input: InputState::default(), jump_held: false }
    }

    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    pub fn input(&self) -> InputState {
        self.input
    }
}

impl Controller for PlayerController {
    fn tick_intent(&mut self, body: &KinematicBody, _dt: f32) -> Intent {
        let speed = if self.input.dash { self.dash_speed } else { self.walk_speed };
        let pressed = self.input.jump && !self.jump_held;
        self.jump_held = self.input.jump;
        Intent { target_speed: self.input.direction() * speed, jump: pressed && !body.in_air, seek_x: None }
    }
}

/// Walks to a queue of x positions at walk speed, stopping exactly on each.
#[derive(Clone, Debug)]
pub struct SimpleAi {
    walk_speed: f32,
    waypoints: VecDeque<f32>,
    current: Option<f32>,
    /// Re-queue each reached waypoint at the back.
    pub patrol: bool,
    arrivals: u32,
}

impl SimpleAi {
    pub fn new(walk_speed: f32) -> Self {
        Self { walk_speed, waypoints: VecDeque::new(), current: None, patrol: false, arrivals: 0 }
    }

    /// Drop any pending route and head for `x`.
    pub fn go_to_x(&mut self, x: f32) {
        self.waypoints.clear();
        self.current = Some(x);
    }

    /// Append a waypoint after the current route.
    pub fn push_waypoint(&mut self, x: f32) {
        self.waypoints.push_back(x);
    }

    /// Walk back and forth between `a` and `b` forever.
    pub fn patrol_between(&mut self, a: f32, b: f32) {
        self.waypoints.clear();
        self.waypoints.push_back(b);
        self.current = Some(a);
        self.patrol = true;
    }

    pub fn target(&self) -> Option<f32> {
        self.current
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.waypoints.is_empty()
    }

    /// Waypoints reached so far.
    pub fn arrivals(&self) -> u32 {
        self.arrivals
    }
}

impl Controller for SimpleAi {
    fn tick_intent(&mut self, body: &KinematicBody, _dt: f32) -> Intent {
        if let Some(goal) = self.current {
            if body.x() == goal {
                self.arrivals += 1;
                tracing::debug!(x = goal, arrivals = self.arrivals, "waypoint reached");
                if self.patrol {
                    self.waypoints.push_back(goal);
                }
                self.current = None;
            }
        }
        if self.current.is_none() {
            self.current = self.waypoints.pop_front();
        }
        match self.current {
            Some(goal) => Intent {
                target_speed: self.walk_speed * (goal - body.x()).signum(),
                jump: false,
                seek_x: Some(goal),
            },
            None => Intent::default(),
        }
    }
}
