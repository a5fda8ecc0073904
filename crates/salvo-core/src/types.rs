//! Fundamental geometric and simulation types.
//!
//! All vectors are 2D (`glam::DVec2`). Solver inputs are expected to be in a
//! relative frame: the shooter's or missile's own position and velocity
//! already subtracted out.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D vector used throughout the subsystem.
pub type Vec2 = DVec2;

/// Position and velocity of a body (meters, m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Orientation of a steerable body.
/// `heading` is measured counter-clockwise from +X, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub heading: f64,
    /// Angular velocity in rad/s (positive = counter-clockwise).
    pub angular_velocity: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Kinematics {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    /// State of `other` expressed relative to this body.
    pub fn relative(&self, other: &Kinematics) -> Kinematics {
        Kinematics {
            position: other.position - self.position,
            velocity: other.velocity - self.velocity,
        }
    }

    /// Distance to another body in meters.
    pub fn range_to(&self, other: &Kinematics) -> f64 {
        self.position.distance(other.position)
    }
}

impl Attitude {
    pub fn new(heading: f64) -> Self {
        Self {
            heading,
            angular_velocity: 0.0,
        }
    }

    /// Unit vector along the body's forward axis.
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }
}

impl SimTime {
    /// Advance by one tick of length `dt`.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Signed angle in radians that rotates `from` onto `to`, in `[-PI, PI]`.
/// Positive is counter-clockwise. Zero if either vector is zero.
pub fn signed_angle(from: Vec2, to: Vec2) -> f64 {
    if from == Vec2::ZERO || to == Vec2::ZERO {
        return 0.0;
    }
    from.perp_dot(to).atan2(from.dot(to))
}

/// Normalize `v`, mapping the zero vector (or a non-finite result) to zero.
pub fn direction(v: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(Vec2::ZERO)
}
