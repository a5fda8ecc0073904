//! Per-missile guidance controller.
//!
//! Pure functions that turn one missile's state and its target's kinematics
//! into a steering and throttle command for a single fixed tick. No ECS
//! dependency; the guidance system feeds this from the world.

use salvo_core::config::MissileSpec;
use salvo_core::enums::FlightPhase;
use salvo_core::types::{signed_angle, Attitude, Kinematics, Vec2};
use salvo_solver::intercept::{solve_missile_intercept_with, MissileSolution};
use salvo_solver::root_finder::RootFinder;

use crate::pid::PidController;

/// Input to the controller for a single missile.
pub struct GuidanceContext<'a> {
    pub spec: &'a MissileSpec,
    /// Seconds since launch at the start of this tick.
    pub elapsed: f64,
    pub body: Kinematics,
    pub attitude: Attitude,
    /// Absolute kinematics of the tracked target, if one is alive.
    pub target: Option<Kinematics>,
    pub dt: f64,
}

/// Output from the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceOutput {
    pub phase: FlightPhase,
    /// Converged intercept acceleration, `None` when holding the current heading.
    pub desired_acceleration: Option<Vec2>,
    pub time_to_intercept: Option<f64>,
    /// Signed angle from forward to the desired acceleration (radians).
    pub steering_error: f64,
    /// Change to apply to the angular velocity this tick (rad/s).
    pub angular_velocity_delta: f64,
    /// 0..=1
    pub throttle: f64,
    /// Thrust acceleration in world frame (m/s²).
    pub thrust: Vec2,
}

/// Flight phase implied by the activation delays.
pub fn flight_phase(spec: &MissileSpec, elapsed: f64) -> FlightPhase {
    if elapsed >= spec.guidance_activation_delay {
        FlightPhase::Guided
    } else if elapsed >= spec.thrust_activation_delay {
        FlightPhase::Boost
    } else {
        FlightPhase::Coast
    }
}

/// Throttle for a given misalignment: full when aligned, none at or past 90°.
pub fn alignment_throttle(angle: f64) -> f64 {
    let c = angle.cos().max(0.0);
    c * c
}

/// Solve the intercept against `target` from the missile's own frame.
/// Returns `None` when the root finder did not converge on a future time.
pub fn intercept(
    spec: &MissileSpec,
    body: &Kinematics,
    target: &Kinematics,
) -> Option<MissileSolution> {
    let relative = body.relative(target);
    let finder = RootFinder::from(spec.solver);
    let solution = solve_missile_intercept_with(
        relative.position,
        relative.velocity,
        spec.max_acceleration,
        &finder,
    );
    solution.converged.then_some(solution)
}

/// Run the controller for one tick.
pub fn update(ctx: &GuidanceContext, pid: &mut PidController) -> GuidanceOutput {
    let spec = ctx.spec;
    let phase = flight_phase(spec, ctx.elapsed);
    let thrust_on = ctx.elapsed >= spec.thrust_activation_delay;
    let forward = ctx.attitude.forward();

    if phase != FlightPhase::Guided {
        let throttle = if thrust_on { 1.0 } else { 0.0 };
        return GuidanceOutput {
            phase,
            desired_acceleration: None,
            time_to_intercept: None,
            steering_error: 0.0,
            angular_velocity_delta: 0.0,
            throttle,
            thrust: forward * throttle * spec.max_acceleration,
        };
    }

    let solution = ctx
        .target
        .as_ref()
        .and_then(|target| intercept(spec, &ctx.body, target));
    let desired_acceleration = solution.map(|s| s.acceleration);
    let max_turn = spec.max_angular_acceleration * ctx.dt;

    let (steering_error, command) = match desired_acceleration {
        Some(aim) => {
            let error = signed_angle(forward, aim);
            (error, pid.update(error, ctx.dt))
        }
        None => {
            // Hold the current heading: cancel any leftover turn rate.
            pid.reset();
            let hold = if max_turn > 0.0 {
                -ctx.attitude.angular_velocity / max_turn
            } else {
                0.0
            };
            (0.0, hold)
        }
    };
    let angular_velocity_delta = command.clamp(-1.0, 1.0) * max_turn;

    let throttle = if thrust_on {
        alignment_throttle(steering_error)
    } else {
        0.0
    };

    GuidanceOutput {
        phase,
        desired_acceleration,
        time_to_intercept: solution.map(|s| s.hit_time),
        steering_error,
        angular_velocity_delta,
        throttle,
        thrust: forward * throttle * spec.max_acceleration,
    }
}
