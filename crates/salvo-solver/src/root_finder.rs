//! Generic root finder over the `Expression` abstraction.
//!
//! Uses Halley's method when a second derivative is available and falls back
//! to Newton's method otherwise. Iteration is bounded, so worst-case cost per
//! call is constant. Running out of iterations is not an error: the last
//! estimate is returned with `converged = false` and the caller decides
//! whether it is still usable.

use salvo_core::config::SolverConfig;
use salvo_core::enums::RootMethod;
use salvo_core::error::SolverError;

use crate::expression::Expression;

/// Outcome of a root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFindResult {
    /// Final estimate (always finite for a finite seed).
    pub root: f64,
    /// Whether `|f(root)| < epsilon`.
    pub converged: bool,
    /// Update steps taken.
    pub iterations: u32,
    pub method: RootMethod,
}

/// Bounded Halley/Newton iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFinder {
    pub max_iterations: u32,
    pub epsilon: f64,
}

impl Default for RootFinder {
    fn default() -> Self {
        SolverConfig::default().into()
    }
}

impl From<SolverConfig> for RootFinder {
    fn from(config: SolverConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            epsilon: config.epsilon,
        }
    }
}

impl RootFinder {
    pub fn new(max_iterations: u32, epsilon: f64) -> Self {
        Self {
            max_iterations,
            epsilon,
        }
    }

    /// Refine `seed` toward a root of `expression`.
    ///
    /// Fails only if `expression` has no derivative, which is a programming
    /// error rather than a runtime condition.
    pub fn find_root(
        &self,
        expression: &dyn Expression,
        seed: f64,
    ) -> Result<RootFindResult, SolverError> {
        let first = expression
            .derivative()
            .ok_or(SolverError::NotDifferentiable)?;
        let second = first.derivative();
        let method = if second.is_some() {
            RootMethod::Halley
        } else {
            RootMethod::Newton
        };

        let mut x = seed;
        for iteration in 0..self.max_iterations {
            let fx = expression.evaluate(x);
            if fx.abs() < self.epsilon {
                return Ok(RootFindResult {
                    root: x,
                    converged: true,
                    iterations: iteration,
                    method,
                });
            }

            let dfx = first.evaluate(x);
            let step = match second {
                Some(second) => {
                    let ddfx = second.evaluate(x);
                    (2.0 * fx * dfx) / (2.0 * dfx * dfx - fx * ddfx)
                }
                None => fx / dfx,
            };

            let next = x - step;
            if !next.is_finite() {
                // Flat derivative (or overflow): no meaningful step from here.
                log::warn!(
                    "{method:?} step diverged at x={x}, f(x)={fx}, f'(x)={dfx} \
                     after {iteration} iterations"
                );
                return Ok(RootFindResult {
                    root: x,
                    converged: false,
                    iterations: iteration,
                    method,
                });
            }
            x = next;
        }

        let residual = expression.evaluate(x);
        let converged = residual.abs() < self.epsilon;
        if !converged {
            log::warn!(
                "{method:?} did not converge in {} iterations: x={x}, residual={residual}",
                self.max_iterations
            );
        }
        Ok(RootFindResult {
            root: x,
            converged,
            iterations: self.max_iterations,
            method,
        })
    }
}

/// `RootFinder::default().find_root(expression, seed)`.
pub fn find_root(expression: &dyn Expression, seed: f64) -> Result<RootFindResult, SolverError> {
    RootFinder::default().find_root(expression, seed)
}
