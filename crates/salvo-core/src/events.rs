//! Events emitted by the simulation for warning UI and effects.
//!
//! Entities are referred to by their `u64` handle bits.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A homing missile entered the world.
    MissileLaunched { missile: u64, target: Option<u64> },
    /// Guidance delay elapsed; the missile is now steering.
    GuidanceActivated { missile: u64 },
    /// A missile started tracking a target.
    TargetAcquired { missile: u64, target: u64 },
    /// A missile stopped tracking a target (destroyed or replaced).
    TargetLost { missile: u64, target: u64 },
    /// Proximity fuse triggered.
    MissileDetonated {
        missile: u64,
        target: u64,
        position: Vec2,
    },
    /// Missile reached the end of its lifetime.
    MissileExpired { missile: u64 },
    /// A turret computed a firing solution.
    TurretAimed {
        turret: u64,
        target: u64,
        aim: Vec2,
        found: bool,
    },
}
