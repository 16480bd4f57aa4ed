//! # Armada Core
//!
//! Core runtime library for the Armada combat simulation.
//!
//! This crate provides the engine-agnostic building blocks every other crate
//! sits on:
//! - **Math**: Vector helpers, angle wrapping, easing and seeded random sampling
//! - **Time**: Clamped frame deltas, frame statistics and simulation-time cooldowns
//! - **Schedule**: Phase-ordered fixed-timestep loop with prioritized handlers

pub mod math;
pub mod schedule;
pub mod time;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use math::{Circle, Rect, Vec2};
pub use schedule::{
    FnHandler, HandlerId, LoopState, Phase, PhaseRegistry, Scheduler, TickReport, UpdateHandler,
};
pub use time::{Cooldown, DeltaTime, FIXED_TIMESTEP, FrameClock, FrameStats, MAX_DELTA_TIME};

/// Core runtime errors
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Unknown update phase: {0}")]
    UnknownPhase(String),
    #[error("Invalid loop configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Simulation loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Fixed simulation timestep in seconds
    pub fixed_timestep: f64,
    /// Largest delta a single tick may observe
    pub max_delta: f64,
    /// Maximum physics steps per tick
    pub max_updates_per_frame: u32,
    /// Accumulator-driven stepping instead of one step per tick
    pub use_fixed_timestep: bool,
    /// Seconds of simulation time per fps sample
    pub stats_window: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: FIXED_TIMESTEP,
            max_delta: MAX_DELTA_TIME,
            max_updates_per_frame: 5,
            use_fixed_timestep: false,
            stats_window: 1.0,
        }
    }
}

impl LoopConfig {
    /// Check the configuration for values the loop cannot run with
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if !(self.max_delta.is_finite() && self.max_delta > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "max_delta must be positive, got {}",
                self.max_delta
            )));
        }
        if self.max_updates_per_frame == 0 {
            return Err(CoreError::InvalidConfig(
                "max_updates_per_frame must be at least 1".to_string(),
            ));
        }
        if !(self.stats_window.is_finite() && self.stats_window > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "stats_window must be positive, got {}",
                self.stats_window
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_config_defaults() {
        let config = LoopConfig::default();
        assert!((config.fixed_timestep - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(config.max_delta, 0.25);
        assert_eq!(config.max_updates_per_frame, 5);
        assert!(!config.use_fixed_timestep);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_loop_config_validation() {
        let config = LoopConfig {
            max_updates_per_frame: 0,
            ..LoopConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));

        let config = LoopConfig {
            max_delta: f64::NAN,
            ..LoopConfig::default()
        };
        assert!(config.validate().is_err());

        for stats_window in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = LoopConfig {
                stats_window,
                ..LoopConfig::default()
            };
            assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
        }
    }
}
