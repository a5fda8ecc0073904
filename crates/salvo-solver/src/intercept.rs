//! Intercept solvers: turn relative target kinematics into an aim or
//! acceleration vector plus a time-to-intercept.
//!
//! All inputs are in the shooter's (or missile's) relative frame. Neither
//! solver ever fails: when no exact intercept exists they return a
//! best-effort vector with `found` / `converged` cleared.

use serde::{Deserialize, Serialize};

use salvo_core::constants::INTERCEPT_EPSILON;
use salvo_core::enums::SolutionKind;
use salvo_core::types::{direction, Vec2};

use crate::expression::Polynomial;
use crate::root_finder::RootFinder;

/// Launch velocity for a constant-speed projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSolution {
    /// Launch velocity; magnitude equals the projectile speed when `found`.
    pub velocity: Vec2,
    /// Seconds until impact (or closest approach when not `found`).
    /// `+inf` when the target can never be reached.
    #[serde(with = "salvo_core::wire::seconds_or_never")]
    pub hit_time: f64,
    /// Whether this is an exact intercept.
    pub found: bool,
}

/// Acceleration command for a bounded-thrust missile starting at rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissileSolution {
    /// Acceleration with magnitude equal to the missile's maximum.
    pub acceleration: Vec2,
    #[serde(with = "salvo_core::wire::seconds_or_never")]
    pub hit_time: f64,
    /// Root finder converged on a future intercept time.
    pub converged: bool,
}

/// Either kind of intercept solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InterceptSolution {
    Projectile(ProjectileSolution),
    Missile(MissileSolution),
}

impl InterceptSolution {
    pub fn kind(&self) -> SolutionKind {
        match self {
            InterceptSolution::Projectile(_) => SolutionKind::Projectile,
            InterceptSolution::Missile(_) => SolutionKind::Missile,
        }
    }

    pub fn hit_time(&self) -> f64 {
        match self {
            InterceptSolution::Projectile(s) => s.hit_time,
            InterceptSolution::Missile(s) => s.hit_time,
        }
    }

    /// Aim velocity or acceleration vector.
    pub fn vector(&self) -> Vec2 {
        match self {
            InterceptSolution::Projectile(s) => s.velocity,
            InterceptSolution::Missile(s) => s.acceleration,
        }
    }

    /// True for an exact intercept, false for a best-effort fallback.
    pub fn is_exact(&self) -> bool {
        match self {
            InterceptSolution::Projectile(s) => s.found,
            InterceptSolution::Missile(s) => s.converged,
        }
    }
}

impl From<ProjectileSolution> for InterceptSolution {
    fn from(solution: ProjectileSolution) -> Self {
        InterceptSolution::Projectile(solution)
    }
}

impl From<MissileSolution> for InterceptSolution {
    fn from(solution: MissileSolution) -> Self {
        InterceptSolution::Missile(solution)
    }
}

/// Solve for the launch velocity of a projectile with speed `speed` that hits a
/// target at relative position `r` moving with relative velocity `v`.
///
/// Solves `(|v|² - s²)·t² + 2(r·v)·t + |r|² = 0` for the earliest future `t`.
pub fn solve_projectile_intercept(r: Vec2, v: Vec2, speed: f64) -> ProjectileSolution {
    let eps = INTERCEPT_EPSILON;
    let a = v.length_squared() - speed * speed;
    let b = 2.0 * r.dot(v);
    let c = r.length_squared();

    if a.abs() < eps {
        // Target as fast as the projectile: the quadratic is linear.
        if b >= 0.0 {
            return ProjectileSolution {
                velocity: direction(v) * speed,
                hit_time: f64::INFINITY,
                found: false,
            };
        }
        let t = -c / b;
        return exact_hit(r, v, t);
    }

    let half_b = 0.5 * b;
    let discriminant = half_b * half_b - a * c;
    if discriminant < eps {
        return closest_approach(r, v, speed, a, b);
    }

    // Cancellation-free pair of roots.
    let q = -(half_b + half_b.signum() * discriminant.sqrt());
    let t1 = q / a;
    let t2 = if q != 0.0 { c / q } else { t1 };
    let (early, late) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

    if early >= eps {
        exact_hit(r, v, early)
    } else if late >= eps {
        exact_hit(r, v, late)
    } else {
        closest_approach(r, v, speed, a, b)
    }
}

fn exact_hit(r: Vec2, v: Vec2, t: f64) -> ProjectileSolution {
    ProjectileSolution {
        velocity: (r + v * t) / t,
        hit_time: t,
        found: true,
    }
}

/// Best-effort aim when no future intercept exists: fire at the predicted
/// position at the time the miss margin `a·t² + b·t + c` is smallest.
fn closest_approach(r: Vec2, v: Vec2, speed: f64, a: f64, b: f64) -> ProjectileSolution {
    let t = if a > INTERCEPT_EPSILON {
        (-b / (2.0 * a)).max(0.0)
    } else {
        0.0
    };
    let predicted = r + v * t;
    let aim = if predicted == Vec2::ZERO {
        direction(v)
    } else {
        direction(predicted)
    };
    ProjectileSolution {
        velocity: aim * speed,
        hit_time: t,
        found: false,
    }
}

/// Quartic whose positive root is the intercept time of a missile starting at
/// rest and accelerating at `max_acceleration`: `4|r + v·t|² - a²·t⁴`.
pub fn margin_polynomial(r: Vec2, v: Vec2, max_acceleration: f64) -> Polynomial {
    Polynomial::new([
        4.0 * r.length_squared(),
        8.0 * r.dot(v),
        4.0 * v.length_squared(),
        0.0,
        -max_acceleration * max_acceleration,
    ])
}

/// Initial guess for the intercept time, blending the stationary-target time
/// with the target's own closing time.
pub fn seed_time(r: Vec2, v: Vec2, max_acceleration: f64) -> f64 {
    let acceleration_time = (2.0 * r.length() / max_acceleration).sqrt();
    let velocity_time = -r.length_squared() / r.dot(v);

    if velocity_time > 0.0 {
        1.0 / (1.0 / velocity_time + 1.0 / acceleration_time)
    } else {
        // Receding (or not closing): extrapolate once and retime.
        let corrected = r + v * acceleration_time;
        (2.0 * corrected.length() / max_acceleration).sqrt()
    }
}

/// Solve for the acceleration a missile at rest should apply to hit a target at
/// relative position `r` with relative velocity `v`, using default solver settings.
pub fn solve_missile_intercept(r: Vec2, v: Vec2, max_acceleration: f64) -> MissileSolution {
    solve_missile_intercept_with(r, v, max_acceleration, &RootFinder::default())
}

/// As `solve_missile_intercept`, with an explicit root finder.
pub fn solve_missile_intercept_with(
    r: Vec2,
    v: Vec2,
    max_acceleration: f64,
    finder: &RootFinder,
) -> MissileSolution {
    let margin = margin_polynomial(r, v, max_acceleration);
    let seed = seed_time(r, v, max_acceleration);

    let (hit_time, converged) = match finder.find_root(&margin, seed) {
        Ok(result) => (result.root, result.converged),
        Err(err) => {
            log::error!("missile intercept root search failed: {err}");
            (seed, false)
        }
    };

    let intercept = r + v * hit_time;
    MissileSolution {
        acceleration: direction(intercept) * max_acceleration,
        hit_time,
        converged: converged && hit_time > 0.0,
    }
}
