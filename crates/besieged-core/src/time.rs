//! Time system for Besieged
//!
//! Turns raw frame deltas into the elapsed-time values handed to the system
//! scheduler, either one variable step per frame or a number of fixed steps.

use serde::{Deserialize, Serialize};

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for simulation ticks (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 30.0,
            max_delta_time: 0.25,
        }
    }
}

impl TimeConfig {
    /// Reject configurations the clock cannot run with.
    pub fn validate(&self) -> Result<(), TimeConfigError> {
        if !(self.fixed_timestep > 0.0) {
            return Err(TimeConfigError::NonPositiveTimestep(self.fixed_timestep));
        }
        if !(self.max_delta_time > 0.0) {
            return Err(TimeConfigError::NonPositiveMaxDelta(self.max_delta_time));
        }
        if self.time_scale < 0.0 {
            return Err(TimeConfigError::NegativeTimeScale(self.time_scale));
        }
        Ok(())
    }
}

/// Errors for invalid time configuration
#[derive(Debug, Clone, thiserror::Error)]
pub enum TimeConfigError {
    #[error("fixed timestep must be positive, got {0}")]
    NonPositiveTimestep(f32),

    #[error("max delta time must be positive, got {0}")]
    NonPositiveMaxDelta(f32),

    #[error("time scale must not be negative, got {0}")]
    NegativeTimeScale(f32),
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since game start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(TimeConfig::default())
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            fixed_accumulator: 0.0,
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;
        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Drain the accumulator and return how many fixed ticks are due
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }
}
