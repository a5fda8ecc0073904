//! Guidance system: runs the controller for every homing missile.
//!
//! Per missile and tick: resolve the tracked target according to the retarget
//! policy, solve the intercept relative to the missile's own body, then write
//! back steering, throttle and thrust.

use hecs::{Entity, World};

use salvo_core::enums::FlightPhase;
use salvo_core::events::SimEvent;
use salvo_core::types::{Attitude, Kinematics};

use crate::components::{Guidance, Missile, Target, Thrust};
use crate::guidance::{self as controller, GuidanceContext};
use crate::lifecycle;
use crate::targeting::TargetSelector;
use crate::tracking;

/// Run guidance for one tick.
pub fn run(world: &mut World, selector: &dyn TargetSelector, dt: f64, events: &mut Vec<SimEvent>) {
    // Collect first: tracking changes touch other entities' components.
    let missiles: Vec<Entity> = world
        .query::<(&Missile, &Guidance)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for missile in missiles {
        update_missile(world, selector, missile, dt, events);
    }
}

fn is_live_target(world: &World, entity: Entity) -> bool {
    world.contains(entity) && world.get::<&Target>(entity).is_ok()
}

fn update_missile(
    world: &mut World,
    selector: &dyn TargetSelector,
    missile: Entity,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let (spec, mut guidance, body, attitude) = match (
        world.get::<&Missile>(missile),
        world.get::<&Guidance>(missile),
        world.get::<&Kinematics>(missile),
        world.get::<&Attitude>(missile),
    ) {
        (Ok(m), Ok(g), Ok(k), Ok(a)) => (m.spec, *g, *k, *a),
        _ => return,
    };

    let phase = controller::flight_phase(&spec, guidance.elapsed);
    if phase == FlightPhase::Guided {
        if guidance.phase != FlightPhase::Guided {
            events.push(SimEvent::GuidanceActivated {
                missile: missile.to_bits().get(),
            });
        }

        let update = tracking::step(
            guidance.track,
            guidance.policy,
            |e| is_live_target(world, e),
            || selector.select(world, missile, &body),
        );
        guidance.track = update.state;
        lifecycle::retarget(world, missile, update.lost, update.acquired, events);
    }

    let target = guidance
        .track
        .target()
        .filter(|t| is_live_target(world, *t))
        .and_then(|t| world.get::<&Kinematics>(t).ok().map(|k| *k));

    let ctx = GuidanceContext {
        spec: &spec,
        elapsed: guidance.elapsed,
        body,
        attitude,
        target,
        dt,
    };
    let output = controller::update(&ctx, &mut guidance.pid);

    guidance.phase = output.phase;
    guidance.throttle = output.throttle;
    guidance.time_to_intercept = output.time_to_intercept;
    guidance.desired_acceleration = output.desired_acceleration;
    guidance.elapsed += dt;

    if let Ok(mut g) = world.get::<&mut Guidance>(missile) {
        *g = guidance;
    }
    if let Ok(mut a) = world.get::<&mut Attitude>(missile) {
        a.angular_velocity += output.angular_velocity_delta;
    }
    if let Ok(mut thrust) = world.get::<&mut Thrust>(missile) {
        thrust.acceleration = output.thrust;
    }
}
