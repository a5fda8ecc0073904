//! Single-variable real expressions.
//!
//! An `Expression` can be evaluated anywhere and may expose a derivative,
//! which is itself an expression. Callers must check `is_differentiable`
//! (or handle `None`) before asking for higher derivatives.

use std::fmt;
use std::sync::OnceLock;

/// A pure real function of one real variable.
pub trait Expression: Send + Sync {
    /// Value at `x`.
    fn evaluate(&self, x: f64) -> f64;

    /// First derivative, if this expression has one.
    fn derivative(&self) -> Option<&dyn Expression>;

    fn is_differentiable(&self) -> bool {
        self.derivative().is_some()
    }
}

/// Polynomial with coefficients in ascending degree:
/// `c0 + c1·x + c2·x² + …`.
///
/// The derivative is built on first access and cached, so repeated calls are
/// free and always return the same polynomial.
#[derive(Clone, Default)]
pub struct Polynomial {
    coefficients: Vec<f64>,
    derivative: OnceLock<Box<Polynomial>>,
}

impl Polynomial {
    pub fn new(coefficients: impl Into<Vec<f64>>) -> Self {
        Self {
            coefficients: coefficients.into(),
            derivative: OnceLock::new(),
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Index of the highest stored coefficient, or `None` for the empty polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    /// The derivative polynomial `(c1·1, c2·2, c3·3, …)`.
    pub fn derive(&self) -> &Polynomial {
        self.derivative.get_or_init(|| {
            let coefficients = self
                .coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(power, c)| c * power as f64)
                .collect::<Vec<_>>();
            Box::new(Polynomial::new(coefficients))
        })
    }
}

impl Expression for Polynomial {
    fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c)
    }

    fn derivative(&self) -> Option<&dyn Expression> {
        Some(self.derive())
    }

    fn is_differentiable(&self) -> bool {
        true
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.coefficients == other.coefficients
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Polynomial").field(&self.coefficients).finish()
    }
}

/// An expression backed by a closure, with an optional derivative.
///
/// Without a derivative it is not differentiable; with a derivative that has
/// none of its own, root finding falls back to Newton's method.
pub struct FnExpression<F> {
    function: F,
    derivative: Option<Box<dyn Expression>>,
}

impl<F> FnExpression<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(function: F) -> Self {
        Self {
            function,
            derivative: None,
        }
    }

    pub fn with_derivative(mut self, derivative: impl Expression + 'static) -> Self {
        self.derivative = Some(Box::new(derivative));
        self
    }
}

impl<F> Expression for FnExpression<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    fn derivative(&self) -> Option<&dyn Expression> {
        self.derivative.as_deref()
    }
}
