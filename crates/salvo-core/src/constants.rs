//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Root finder ---

/// Iteration budget for Halley/Newton refinement.
pub const ROOT_FINDER_MAX_ITERATIONS: u32 = 10;

/// Residual below which a root is considered found.
pub const ROOT_FINDER_EPSILON: f64 = 1e-5;

// --- Intercept solver ---

/// Tolerance for degenerate quadratic coefficients and "future" roots.
pub const INTERCEPT_EPSILON: f64 = 1e-5;

// --- Missiles ---

/// Default maximum linear acceleration (m/s²).
pub const MISSILE_MAX_ACCELERATION: f64 = 100.0;

/// Default maximum angular acceleration (rad/s²).
pub const MISSILE_MAX_ANGULAR_ACCELERATION: f64 = 20.0;

/// Seconds after launch before the motor lights.
pub const MISSILE_THRUST_ACTIVATION_DELAY: f64 = 0.0;

/// Seconds after launch before the seeker starts steering.
pub const MISSILE_GUIDANCE_ACTIVATION_DELAY: f64 = 0.25;

/// Proximity fuse radius (m).
pub const MISSILE_FUSE_RADIUS: f64 = 5.0;

/// Self-destruct time after launch (s).
pub const MISSILE_LIFETIME: f64 = 30.0;

// --- Steering PID ---

pub const STEERING_KP: f64 = 1.0;
pub const STEERING_KI: f64 = 0.0;
pub const STEERING_KD: f64 = 0.3;

/// Clamp on the accumulated integral term (rad·s).
pub const STEERING_INTEGRAL_LIMIT: f64 = 1.0;

// --- Engine ---

/// Default RNG seed for scenario setup.
pub const DEFAULT_SEED: u64 = 42;
