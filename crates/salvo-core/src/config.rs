//! Tunable configuration for solvers and missiles.
//!
//! Every struct has a `Default` built from `constants`, and every field is
//! optional in JSON so partial configs override only what they name.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::RetargetPolicy;
use crate::error::ConfigError;

/// Root finder settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum Halley/Newton iterations per solve.
    pub max_iterations: u32,
    /// Residual threshold for convergence.
    pub epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: ROOT_FINDER_MAX_ITERATIONS,
            epsilon: ROOT_FINDER_EPSILON,
        }
    }
}

impl SolverConfig {
    /// Parse from JSON and validate.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "max_iterations",
                reason: "must be at least 1",
            });
        }
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "epsilon",
                reason: "must be positive and finite",
            });
        }
        Ok(())
    }
}

/// Gains for the steering PID loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Absolute bound on the accumulated integral.
    pub integral_limit: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: STEERING_KP,
            ki: STEERING_KI,
            kd: STEERING_KD,
            integral_limit: STEERING_INTEGRAL_LIMIT,
        }
    }
}

/// Per-missile-type performance and guidance settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileSpec {
    /// Maximum thrust acceleration (m/s²).
    pub max_acceleration: f64,
    /// Maximum angular acceleration (rad/s²).
    pub max_angular_acceleration: f64,
    /// Seconds after launch before the motor produces thrust.
    pub thrust_activation_delay: f64,
    /// Seconds after launch before steering starts.
    pub guidance_activation_delay: f64,
    /// Proximity fuse radius (m).
    pub fuse_radius: f64,
    /// Seconds after launch before self-destruct.
    pub lifetime: f64,
    pub retarget_policy: RetargetPolicy,
    pub pid: PidGains,
    pub solver: SolverConfig,
}

impl Default for MissileSpec {
    fn default() -> Self {
        Self {
            max_acceleration: MISSILE_MAX_ACCELERATION,
            max_angular_acceleration: MISSILE_MAX_ANGULAR_ACCELERATION,
            thrust_activation_delay: MISSILE_THRUST_ACTIVATION_DELAY,
            guidance_activation_delay: MISSILE_GUIDANCE_ACTIVATION_DELAY,
            fuse_radius: MISSILE_FUSE_RADIUS,
            lifetime: MISSILE_LIFETIME,
            retarget_policy: RetargetPolicy::default(),
            pid: PidGains::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl MissileSpec {
    /// Parse from JSON and validate.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let spec: Self = serde_json::from_str(text)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_acceleration > 0.0 && self.max_acceleration.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "max_acceleration",
                reason: "must be positive and finite",
            });
        }
        if !(self.max_angular_acceleration > 0.0 && self.max_angular_acceleration.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "max_angular_acceleration",
                reason: "must be positive and finite",
            });
        }
        if !(self.thrust_activation_delay >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "thrust_activation_delay",
                reason: "must not be negative",
            });
        }
        if !(self.guidance_activation_delay >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "guidance_activation_delay",
                reason: "must not be negative",
            });
        }
        if !(self.fuse_radius >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "fuse_radius",
                reason: "must not be negative",
            });
        }
        if !(self.lifetime > 0.0) {
            return Err(ConfigError::Invalid {
                field: "lifetime",
                reason: "must be positive",
            });
        }
        if !(self.pid.integral_limit >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "pid.integral_limit",
                reason: "must not be negative",
            });
        }
        self.solver.validate()
    }
}
