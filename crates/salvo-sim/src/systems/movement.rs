//! Kinematic integration system.
//!
//! Semi-implicit Euler: velocity += thrust * dt, then position += velocity * dt.
//! Attitude integrates angular velocity into heading.

use std::f64::consts::{PI, TAU};

use hecs::World;

use salvo_core::types::{Attitude, Kinematics};

use crate::components::Thrust;

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (kinematics, thrust)) in world.query_mut::<(&mut Kinematics, Option<&Thrust>)>() {
        if let Some(thrust) = thrust {
            kinematics.velocity += thrust.acceleration * dt;
        }
        kinematics.position += kinematics.velocity * dt;
    }

    for (_entity, attitude) in world.query_mut::<&mut Attitude>() {
        attitude.heading = wrap_angle(attitude.heading + attitude.angular_velocity * dt);
    }
}

/// Wrap into `[-PI, PI)`.
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}
