//! Commands sent to the simulation by peers or game logic.
//!
//! Commands are queued and processed at the next tick boundary. Entity
//! handles travel as `u64` bits so commands can cross process boundaries.

use serde::{Deserialize, Serialize};

use crate::enums::RetargetPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    /// Point a missile at a target, or clear its target with `None`.
    SetMissileTarget { missile: u64, target: Option<u64> },
    /// Change when a missile re-queries for targets.
    SetRetargetPolicy {
        missile: u64,
        policy: RetargetPolicy,
    },
    /// Assign (or clear) a turret's target.
    SetTurretTarget { turret: u64, target: Option<u64> },
    /// Solve a firing solution for a turret now.
    AimTurret { turret: u64 },
    /// Remove an entity from the simulation, running its cleanup.
    DestroyEntity { entity: u64 },
}

/// Discriminant of a `SimCommand`, used as the index into the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    SetMissileTarget = 0,
    SetRetargetPolicy = 1,
    SetTurretTarget = 2,
    AimTurret = 3,
    DestroyEntity = 4,
}

impl CommandKind {
    pub const COUNT: usize = 5;
}

impl SimCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            SimCommand::SetMissileTarget { .. } => CommandKind::SetMissileTarget,
            SimCommand::SetRetargetPolicy { .. } => CommandKind::SetRetargetPolicy,
            SimCommand::SetTurretTarget { .. } => CommandKind::SetTurretTarget,
            SimCommand::AimTurret { .. } => CommandKind::AimTurret,
            SimCommand::DestroyEntity { .. } => CommandKind::DestroyEntity,
        }
    }
}
