//! Fuse and lifetime system: removes missiles that reached their target or
//! burned out, running deregistration for each.
//!
//! Damage is applied elsewhere; this system only reports the detonation.

use hecs::{Entity, World};

use salvo_core::events::SimEvent;
use salvo_core::types::{Kinematics, Vec2};

use crate::components::{Guidance, Missile};
use crate::lifecycle;

/// Run after movement. Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    dt: f64,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    despawn_buffer.clear();

    for (entity, (missile, guidance, body)) in
        world.query::<(&Missile, &Guidance, &Kinematics)>().iter()
    {
        if guidance.elapsed >= missile.spec.lifetime {
            events.push(SimEvent::MissileExpired {
                missile: entity.to_bits().get(),
            });
            despawn_buffer.push(entity);
            continue;
        }

        let Some(target) = guidance.track.target() else {
            continue;
        };
        let Ok(target_body) = world.get::<&Kinematics>(target) else {
            continue;
        };

        let relative = body.relative(&target_body);
        let miss = closest_approach_in_step(relative.position, relative.velocity, dt);
        if miss <= missile.spec.fuse_radius {
            events.push(SimEvent::MissileDetonated {
                missile: entity.to_bits().get(),
                target: target.to_bits().get(),
                position: body.position,
            });
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        if let Err(err) = lifecycle::destroy(world, entity, events) {
            log::warn!("fuse could not remove {entity:?}: {err}");
        }
    }
}

/// Smallest separation during the last step, given the separation now and
/// the relative velocity over the step. Catches fast fly-throughs that skip
/// over the fuse radius between ticks.
pub fn closest_approach_in_step(separation: Vec2, relative_velocity: Vec2, dt: f64) -> f64 {
    let start = separation - relative_velocity * dt;
    let travel = separation - start;
    let travel_sq = travel.length_squared();
    if travel_sq == 0.0 {
        return separation.length();
    }
    let s = (-start.dot(travel) / travel_sq).clamp(0.0, 1.0);
    (start + travel * s).length()
}
