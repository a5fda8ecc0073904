//! Snapshot types: the read-only view of the simulation handed to
//! collaborators (rendering, warning UI, replication checks) each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{FlightPhase, RetargetPolicy};
use crate::events::SimEvent;
use crate::types::{SimTime, Vec2};

/// Complete per-tick snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub missiles: Vec<MissileView>,
    pub targets: Vec<TargetView>,
    pub turrets: Vec<TurretView>,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileView {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub heading: f64,
    pub phase: FlightPhase,
    pub policy: RetargetPolicy,
    pub target: Option<u64>,
    /// Last desired acceleration from the intercept solver.
    pub desired_acceleration: Option<Vec2>,
    /// Throttle applied this tick, 0..=1.
    pub throttle: f64,
    /// Estimated seconds to intercept, if a converged solution exists.
    pub time_to_intercept: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Missiles currently homing on this target (for missile-warning UI).
    pub incoming: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretView {
    pub id: u64,
    pub position: Vec2,
    pub target: Option<u64>,
    pub aim: Option<Vec2>,
    #[serde(with = "crate::wire::seconds_or_never_option")]
    pub hit_time: Option<f64>,
}
