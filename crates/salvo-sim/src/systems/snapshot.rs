//! Snapshot system: queries the ECS world and builds a `SimSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use salvo_core::events::SimEvent;
use salvo_core::state::*;
use salvo_core::types::{Attitude, Kinematics, SimTime};

use crate::components::{Guidance, IncomingMissiles, Target, Turret};

pub fn build_snapshot(world: &World, time: &SimTime, events: Vec<SimEvent>) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        missiles: build_missiles(world),
        targets: build_targets(world),
        turrets: build_turrets(world),
        events,
    }
}

fn build_missiles(world: &World) -> Vec<MissileView> {
    let mut missiles: Vec<MissileView> = world
        .query::<(&Guidance, &Kinematics, &Attitude)>()
        .iter()
        .map(|(entity, (guidance, kinematics, attitude))| MissileView {
            id: entity.to_bits().get(),
            position: kinematics.position,
            velocity: kinematics.velocity,
            heading: attitude.heading,
            phase: guidance.phase,
            policy: guidance.policy,
            target: guidance.track.target().map(|t| t.to_bits().get()),
            desired_acceleration: guidance.desired_acceleration,
            throttle: guidance.throttle,
            time_to_intercept: guidance.time_to_intercept,
        })
        .collect();
    missiles.sort_by_key(|m| m.id);
    missiles
}

fn build_targets(world: &World) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<(&Target, &Kinematics, &IncomingMissiles)>()
        .iter()
        .map(|(entity, (_target, kinematics, incoming))| TargetView {
            id: entity.to_bits().get(),
            position: kinematics.position,
            velocity: kinematics.velocity,
            incoming: incoming.missiles.iter().map(|m| m.to_bits().get()).collect(),
        })
        .collect();
    targets.sort_by_key(|t| t.id);
    targets
}

fn build_turrets(world: &World) -> Vec<TurretView> {
    let mut turrets: Vec<TurretView> = world
        .query::<(&Turret, &Kinematics)>()
        .iter()
        .map(|(entity, (turret, kinematics))| TurretView {
            id: entity.to_bits().get(),
            position: kinematics.position,
            target: turret.target.map(|t| t.to_bits().get()),
            aim: turret.aim,
            hit_time: turret.last_solution.map(|s| s.hit_time),
        })
        .collect();
    turrets.sort_by_key(|t| t.id);
    turrets
}
