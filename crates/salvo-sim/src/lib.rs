//! Fixed-tick guidance simulation for SALVO.
//!
//! Owns the hecs ECS world, runs the guidance controller for every homing
//! missile each tick, aims direct-fire turrets on demand, and produces
//! `SimSnapshot`s for collaborators.

pub mod components;
pub mod dispatch;
pub mod engine;
pub mod guidance;
pub mod lifecycle;
pub mod pid;
pub mod systems;
pub mod targeting;
pub mod tracking;
pub mod world_setup;

pub use salvo_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
