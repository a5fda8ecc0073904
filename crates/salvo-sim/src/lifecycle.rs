//! Incoming-missile registration and entity destruction.
//!
//! Missiles register with their target's `IncomingMissiles` list when they
//! start tracking it and deregister when they stop. Destroying a target
//! notifies every missile on its list instead of waiting for them to poll.

use hecs::{Entity, World};

use salvo_core::error::CommandError;
use salvo_core::events::SimEvent;

use crate::components::{Guidance, IncomingMissiles};
use crate::tracking::TrackEvent;

/// Add `missile` to `target`'s incoming list (no duplicates).
pub fn register_incoming(world: &mut World, target: Entity, missile: Entity) {
    if let Ok(mut incoming) = world.get::<&mut IncomingMissiles>(target) {
        if !incoming.missiles.contains(&missile) {
            incoming.missiles.push(missile);
        }
    }
}

/// Remove `missile` from `target`'s incoming list. A dead target is ignored.
pub fn deregister_incoming(world: &mut World, target: Entity, missile: Entity) {
    if let Ok(mut incoming) = world.get::<&mut IncomingMissiles>(target) {
        incoming.missiles.retain(|m| *m != missile);
    }
}

/// Move `missile`'s registration from `lost` to `acquired`, emitting events.
pub fn retarget(
    world: &mut World,
    missile: Entity,
    lost: Option<Entity>,
    acquired: Option<Entity>,
    events: &mut Vec<SimEvent>,
) {
    if let Some(target) = lost {
        deregister_incoming(world, target, missile);
        log::debug!("missile {missile:?} lost target {target:?}");
        events.push(SimEvent::TargetLost {
            missile: missile.to_bits().get(),
            target: target.to_bits().get(),
        });
    }
    if let Some(target) = acquired {
        register_incoming(world, target, missile);
        log::debug!("missile {missile:?} acquired target {target:?}");
        events.push(SimEvent::TargetAcquired {
            missile: missile.to_bits().get(),
            target: target.to_bits().get(),
        });
    }
}

/// Remove an entity from the world, running missile and target cleanup first.
pub fn destroy(
    world: &mut World,
    entity: Entity,
    events: &mut Vec<SimEvent>,
) -> Result<(), CommandError> {
    if !world.contains(entity) {
        return Err(CommandError::UnknownEntity(entity.to_bits().get()));
    }

    // A dying missile leaves its target's warning list.
    let tracked = world
        .get::<&Guidance>(entity)
        .ok()
        .and_then(|guidance| guidance.track.target());
    if let Some(target) = tracked {
        deregister_incoming(world, target, entity);
    }

    // A dying target tells everything homing on it.
    let incoming = world
        .get::<&IncomingMissiles>(entity)
        .map(|incoming| incoming.missiles.clone())
        .unwrap_or_default();
    for missile in incoming {
        if let Ok(mut guidance) = world.get::<&mut Guidance>(missile) {
            if guidance.track.target() == Some(entity) {
                guidance.track = guidance.track.on_event(TrackEvent::TargetLost, guidance.policy);
                events.push(SimEvent::TargetLost {
                    missile: missile.to_bits().get(),
                    target: entity.to_bits().get(),
                });
            }
        }
    }

    log::debug!("destroying {entity:?}");
    world
        .despawn(entity)
        .map_err(|_| CommandError::UnknownEntity(entity.to_bits().get()))
}
