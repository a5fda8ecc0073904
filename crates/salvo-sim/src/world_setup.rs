//! Entity spawn factories.
//!
//! Creates targets, homing missiles and turrets with the component bundles
//! the systems expect.

use std::f64::consts::TAU;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use salvo_core::config::MissileSpec;
use salvo_core::types::{Attitude, Kinematics, Vec2};

use crate::components::*;
use crate::lifecycle;

/// Spawn a targetable body with an empty incoming-missile list.
pub fn spawn_target(world: &mut World, kinematics: Kinematics) -> Entity {
    world.spawn((Target, kinematics, IncomingMissiles::default()))
}

/// Spawn a homing missile. A live `target` is registered immediately;
/// a dead or non-target handle is treated as no target.
///
/// `spec` is used as given; `SimulationEngine::spawn_missile` validates it first.
pub fn spawn_missile(
    world: &mut World,
    kinematics: Kinematics,
    heading: f64,
    spec: MissileSpec,
    target: Option<Entity>,
) -> Entity {
    let target = target.filter(|t| world.contains(*t) && world.get::<&Target>(*t).is_ok());
    let missile = world.spawn((
        Missile { spec },
        Guidance::new(&spec, target),
        kinematics,
        Attitude::new(heading),
        Thrust::default(),
    ));
    if let Some(target) = target {
        lifecycle::register_incoming(world, target, missile);
    }
    missile
}

/// Spawn a direct-fire turret at `position`.
pub fn spawn_turret(world: &mut World, position: Vec2, projectile_speed: f64) -> Entity {
    world.spawn((
        Turret::new(projectile_speed),
        Kinematics::new(position, Vec2::ZERO),
    ))
}

/// Scatter `count` targets on a ring of `radius` around the origin, each
/// moving in a random direction at up to `max_speed`.
pub fn scatter_targets(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    count: usize,
    radius: f64,
    max_speed: f64,
) -> Vec<Entity> {
    (0..count)
        .map(|_| {
            let bearing = rng.gen_range(0.0..TAU);
            let heading = rng.gen_range(0.0..TAU);
            let speed = if max_speed > 0.0 {
                rng.gen_range(0.0..max_speed)
            } else {
                0.0
            };
            let position = Vec2::from_angle(bearing) * radius;
            let velocity = Vec2::from_angle(heading) * speed;
            spawn_target(world, Kinematics::new(position, velocity))
        })
        .collect()
}
