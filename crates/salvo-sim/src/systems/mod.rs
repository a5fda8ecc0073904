//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only work). They do not own state; all state lives in components.

pub mod fire_control;
pub mod fuse;
pub mod guidance;
pub mod movement;
pub mod snapshot;
