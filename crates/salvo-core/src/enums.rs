//! Enumeration types used throughout the subsystem.

use serde::{Deserialize, Serialize};

/// When a homing missile re-queries the target selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetargetPolicy {
    /// Keep the target assigned at launch; never re-query.
    Never,
    /// Re-query only when the current target is dead or unset.
    #[default]
    IfInvalid,
    /// Re-query every tick.
    Always,
}

/// Which intercept model produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolutionKind {
    /// Constant-speed projectile (quadratic).
    Projectile,
    /// Bounded-acceleration missile (quartic).
    Missile,
}

/// Iteration scheme used by the root finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootMethod {
    /// Third-order, needs a second derivative.
    Halley,
    /// Second-order fallback.
    Newton,
}

/// Flight phase of a homing missile, derived from its activation timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    /// Motor not yet lit, no steering.
    #[default]
    Coast,
    /// Raw forward thrust, no steering.
    Boost,
    /// Seeker active, steering toward the intercept solution.
    Guided,
}
