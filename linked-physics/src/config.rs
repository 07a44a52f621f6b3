use crate::error::{Result, WorldError};
use glam::Vec3;
use std::time::Duration;

pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    pub gravity: Vec3,
    /// Fixed step length in seconds, also the Δt of a default forced step.
    pub timestep: f32,
    /// Upper bound on substeps a single auto-step may run.
    pub max_substeps: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            gravity: DEFAULT_GRAVITY,
            timestep: DEFAULT_TIMESTEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
        }
    }
}

impl WorldConfig {
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    /// The timestep as a clock duration. Fails for timesteps that are not
    /// positive or do not fit a nonzero `Duration`.
    pub fn step_duration(&self) -> Result<Duration> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "timestep must be finite and positive, got {}",
                self.timestep
            )));
        }
        match Duration::try_from_secs_f32(self.timestep) {
            Ok(step) if !step.is_zero() => Ok(step),
            Ok(_) => Err(WorldError::InvalidConfig(format!(
                "timestep {} is shorter than a nanosecond",
                self.timestep
            ))),
            Err(err) => Err(WorldError::InvalidConfig(format!(
                "timestep {} is not a valid duration: {err}",
                self.timestep
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.step_duration()?;
        if self.max_substeps == 0 {
            return Err(WorldError::InvalidConfig(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        if !self.gravity.is_finite() {
            return Err(WorldError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        Ok(())
    }
}
