//! Error types for configuration, solving and command handling.
//!
//! Missing or infeasible intercepts are not errors; they are reported through
//! the `found` / `converged` flags on solutions.

use thiserror::Error;

/// Programming errors raised by the numerical solver.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverError {
    /// A derivative was requested from an expression that has none.
    #[error("expression is not differentiable")]
    NotDifferentiable,
}

/// Errors that can occur while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value outside its allowed range.
    #[error("invalid configuration field `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Errors from commands that address entities by handle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The handle does not name a live entity.
    #[error("unknown or destroyed entity {0}")]
    UnknownEntity(u64),

    /// The entity exists but is not a guided missile.
    #[error("entity {0} is not a missile")]
    NotAMissile(u64),

    /// The entity exists but is not a turret.
    #[error("entity {0} is not a turret")]
    NotATurret(u64),

    /// The entity exists but cannot be targeted.
    #[error("entity {0} is not a target")]
    NotATarget(u64),
}
