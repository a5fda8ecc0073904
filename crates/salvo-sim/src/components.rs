//! ECS components for hecs entities.
//!
//! `Kinematics` and `Attitude` from the core crate are used as components
//! directly. Components here are plain data; logic lives in systems.

use hecs::Entity;

use salvo_core::config::MissileSpec;
use salvo_core::enums::{FlightPhase, RetargetPolicy};
use salvo_core::types::Vec2;
use salvo_solver::intercept::ProjectileSolution;

use crate::pid::PidController;
use crate::tracking::TrackState;

/// Marks an entity that missiles and turrets may aim at.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target;

/// Missiles currently homing on this target. Observer list only: the target
/// never owns the missiles, and each missile removes itself on retarget or
/// destruction.
#[derive(Debug, Clone, Default)]
pub struct IncomingMissiles {
    pub missiles: Vec<Entity>,
}

/// Static performance data of a homing missile.
#[derive(Debug, Clone, Copy)]
pub struct Missile {
    pub spec: MissileSpec,
}

/// Per-missile guidance state, mutated once per fixed tick.
#[derive(Debug, Clone, Copy)]
pub struct Guidance {
    pub track: TrackState,
    pub policy: RetargetPolicy,
    pub phase: FlightPhase,
    /// Seconds since launch.
    pub elapsed: f64,
    /// Last converged intercept acceleration.
    pub desired_acceleration: Option<Vec2>,
    pub time_to_intercept: Option<f64>,
    pub throttle: f64,
    pub pid: PidController,
}

impl Guidance {
    pub fn new(spec: &MissileSpec, target: Option<Entity>) -> Self {
        Self {
            track: target.map_or(TrackState::Idle, TrackState::Tracking),
            policy: spec.retarget_policy,
            phase: FlightPhase::default(),
            elapsed: 0.0,
            desired_acceleration: None,
            time_to_intercept: None,
            throttle: 0.0,
            pid: PidController::new(spec.pid),
        }
    }
}

/// World-frame acceleration applied by the motor this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thrust {
    pub acceleration: Vec2,
}

/// Direct-fire weapon. Aimed once per firing decision, not every tick.
#[derive(Debug, Clone, Copy)]
pub struct Turret {
    pub projectile_speed: f64,
    pub target: Option<Entity>,
    /// Current aim velocity; kept when no intercept is found.
    pub aim: Option<Vec2>,
    pub last_solution: Option<ProjectileSolution>,
}

impl Turret {
    pub fn new(projectile_speed: f64) -> Self {
        Self {
            projectile_speed,
            target: None,
            aim: None,
            last_solution: None,
        }
    }
}
