//! Command dispatch.
//!
//! Each `SimCommand` kind maps to one handler in a fixed table, indexed by
//! `CommandKind`. Entity handles arrive as `u64` bits and are validated
//! against the world before use.

use hecs::{Entity, World};

use salvo_core::commands::{CommandKind, SimCommand};
use salvo_core::error::CommandError;
use salvo_core::events::SimEvent;

use crate::components::{Guidance, Target, Turret};
use crate::lifecycle;
use crate::systems::fire_control;
use crate::tracking::TrackEvent;

type Handler = fn(&mut World, &SimCommand, &mut Vec<SimEvent>) -> Result<(), CommandError>;

const HANDLERS: [Handler; CommandKind::COUNT] = [
    set_missile_target,
    set_retarget_policy,
    set_turret_target,
    aim_turret,
    destroy_entity,
];

/// Apply one command to the world.
pub fn dispatch(
    world: &mut World,
    command: &SimCommand,
    events: &mut Vec<SimEvent>,
) -> Result<(), CommandError> {
    HANDLERS[command.kind() as usize](world, command, events)
}

/// Resolve handle bits to a live entity.
pub fn resolve(world: &World, bits: u64) -> Result<Entity, CommandError> {
    Entity::from_bits(bits)
        .filter(|entity| world.contains(*entity))
        .ok_or(CommandError::UnknownEntity(bits))
}

fn resolve_target(world: &World, bits: u64) -> Result<Entity, CommandError> {
    let entity = resolve(world, bits)?;
    if world.get::<&Target>(entity).is_err() {
        return Err(CommandError::NotATarget(bits));
    }
    Ok(entity)
}

fn set_missile_target(
    world: &mut World,
    command: &SimCommand,
    events: &mut Vec<SimEvent>,
) -> Result<(), CommandError> {
    let SimCommand::SetMissileTarget { missile, target } = *command else {
        return Ok(());
    };
    let missile_entity = resolve(world, missile)?;
    let new_target = target.map(|bits| resolve_target(world, bits)).transpose()?;

    let (mut state, policy) = match world.get::<&Guidance>(missile_entity) {
        Ok(guidance) => (guidance.track, guidance.policy),
        Err(_) => return Err(CommandError::NotAMissile(missile)),
    };
    let previous = state.target();
    if previous == new_target {
        return Ok(());
    }

    if previous.is_some() {
        state = state.on_event(TrackEvent::TargetLost, policy);
    }
    if let Some(found) = new_target {
        state = state.on_event(TrackEvent::TargetFound(found), policy);
    }
    if let Ok(mut guidance) = world.get::<&mut Guidance>(missile_entity) {
        guidance.track = state;
    }
    lifecycle::retarget(world, missile_entity, previous, new_target, events);
    Ok(())
}

fn set_retarget_policy(
    world: &mut World,
    command: &SimCommand,
    _events: &mut Vec<SimEvent>,
) -> Result<(), CommandError> {
    let SimCommand::SetRetargetPolicy { missile, policy } = *command else {
        return Ok(());
    };
    let entity = resolve(world, missile)?;
    let mut guidance = world
        .get::<&mut Guidance>(entity)
        .map_err(|_| CommandError::NotAMissile(missile))?;
    guidance.policy = policy;
    Ok(())
}

fn set_turret_target(
    world: &mut World,
    command: &SimCommand,
    _events: &mut Vec<SimEvent>,
) -> Result<(), CommandError> {
    let SimCommand::SetTurretTarget { turret, target } = *command else {
        return Ok(());
    };
    let entity = resolve(world, turret)?;
    let new_target = target.map(|bits| resolve_target(world, bits)).transpose()?;
    let mut state = world
        .get::<&mut Turret>(entity)
        .map_err(|_| CommandError::NotATurret(turret))?;
    if state.target != new_target {
        state.target = new_target;
        state.last_solution = None;
    }
    Ok(())
}

fn aim_turret(
    world: &mut World,
    command: &SimCommand,
    events: &mut Vec<SimEvent>,
) -> Result<(), CommandError> {
    let SimCommand::AimTurret { turret } = *command else {
        return Ok(());
    };
    let entity = resolve(world, turret)?;
    fire_control::aim_turret(world, entity, events).map(|_| ())
}

fn destroy_entity(
    world: &mut World,
    command: &SimCommand,
    events: &mut Vec<SimEvent>,
) -> Result<(), CommandError> {
    let SimCommand::DestroyEntity { entity } = *command else {
        return Ok(());
    };
    let resolved = resolve(world, entity)?;
    lifecycle::destroy(world, resolved, events)
}
