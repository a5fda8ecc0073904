//! Numerical fire-control solvers for SALVO.
//!
//! Pure functions over plain data: a single-variable expression abstraction
//! with polynomials, a Halley/Newton root finder, and the projectile and
//! missile intercept solvers built on them. No ECS dependency.

pub mod expression;
pub mod intercept;
pub mod root_finder;

pub use salvo_core as core;

pub use expression::{Expression, FnExpression, Polynomial};
pub use intercept::{
    solve_missile_intercept, solve_missile_intercept_with, solve_projectile_intercept,
    InterceptSolution, MissileSolution, ProjectileSolution,
};
pub use root_finder::{find_root, RootFindResult, RootFinder};
