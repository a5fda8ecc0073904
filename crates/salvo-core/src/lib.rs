//! Core types and definitions for the SALVO fire-control subsystem.
//!
//! This crate defines the vocabulary shared across all other crates:
//! kinematic types, tuning constants, configuration, errors, commands,
//! events, and snapshot views. It has no dependency on the ECS or the solver.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
pub mod wire;
