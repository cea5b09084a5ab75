//! Simulation tuning.
//!
//! All values are pixels and seconds. Gravity is negative (y-up world).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for body integration and the fixed-step world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // ========================================================================
    // Timestep
    // ========================================================================
    /// Fixed simulation rate (ticks per second).
    pub tick_rate: f32,

    /// Maximum ticks `World::advance` runs per call before dropping time.
    pub max_catchup_ticks: u32,

    // ========================================================================
    // Vertical
    // ========================================================================
    /// Gravity acceleration (px/s², negative).
    pub gravity: f32,

    /// Jump launch speed as a fraction of |gravity| (`vy = -gravity * ratio`).
    pub jump_impulse_ratio: f32,

    // ========================================================================
    // Horizontal
    // ========================================================================
    /// Acceleration towards the target speed on the ground (px/s²).
    pub ground_acceleration: f32,

    /// Fraction of ground acceleration available while airborne.
    pub air_control: f32,

    /// Walking speed (px/s).
    pub walk_speed: f32,

    /// Dash speed (px/s).
    pub dash_speed: f32,

    // ========================================================================
    // Diagnostics
    // ========================================================================
    /// Record per-step timing (small overhead when true).
    pub enable_timing: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tick_rate: 120.0,
            max_catchup_ticks: 8,

            gravity: -1000.0,
            jump_impulse_ratio: 0.5, // 500 px/s launch, ~4 tiles of height

            ground_acceleration: 1200.0,
            air_control: 0.2,
            walk_speed: 150.0,
            dash_speed: 320.0,

            enable_timing: false,
        }
    }
}

impl PhysicsConfig {
    /// Low gravity, generous air control.
    pub fn floaty() -> Self {
        Self {
            gravity: -600.0,
            jump_impulse_ratio: 0.6,
            air_control: 0.5,
            ..Default::default()
        }
    }

    /// Heavy and responsive.
    pub fn snappy() -> Self {
        Self {
            gravity: -1800.0,
            jump_impulse_ratio: 0.4,
            ground_acceleration: 3000.0,
            walk_speed: 180.0,
            dash_speed: 400.0,
            ..Default::default()
        }
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Reject values the integrator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::Physics("tick_rate must be positive"));
        }
        if !(self.gravity.is_finite() && self.gravity < 0.0) {
            return Err(ConfigError::Physics("gravity must be negative"));
        }
        if !(0.0..=1.0).contains(&self.air_control) {
            return Err(ConfigError::Physics("air_control must be within [0, 1]"));
        }
        // NaN fails every comparison, so test for the accepted range.
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        if !(non_negative(self.ground_acceleration) && non_negative(self.jump_impulse_ratio)) {
            return Err(ConfigError::Physics("accelerations and jump ratio must be finite and non-negative"));
        }
        if !(non_negative(self.walk_speed) && non_negative(self.dash_speed)) {
            return Err(ConfigError::Physics("walk and dash speeds must be finite and non-negative"));
        }
        if self.max_catchup_ticks == 0 {
            return Err(ConfigError::Physics("max_catchup_ticks must be at least 1"));
        }
        Ok(())
    }
}
