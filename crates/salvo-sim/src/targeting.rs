//! Target selection seam.
//!
//! Choosing what to shoot at belongs to the surrounding game. Missiles ask a
//! `TargetSelector` when their retarget policy calls for it.

use hecs::{Entity, World};

use salvo_core::types::Kinematics;

use crate::components::Target;

pub trait TargetSelector: Send + Sync {
    /// Pick a target for `missile`, currently at `body`.
    fn select(&self, world: &World, missile: Entity, body: &Kinematics) -> Option<Entity>;
}

/// Picks the closest live `Target`, optionally within a maximum range.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestTarget {
    pub max_range: Option<f64>,
}

impl TargetSelector for NearestTarget {
    fn select(&self, world: &World, missile: Entity, body: &Kinematics) -> Option<Entity> {
        let max_range_sq = self.max_range.map(|r| r * r).unwrap_or(f64::INFINITY);
        let mut best: Option<(Entity, f64)> = None;
        for (entity, (_target, kinematics)) in world.query::<(&Target, &Kinematics)>().iter() {
            if entity == missile {
                continue;
            }
            let range_sq = body.position.distance_squared(kinematics.position);
            if range_sq > max_range_sq {
                continue;
            }
            if best.map_or(true, |(_, best_sq)| range_sq < best_sq) {
                best = Some((entity, range_sq));
            }
        }
        best.map(|(entity, _)| entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use salvo_core::types::Vec2;

    fn spawn_target(world: &mut World, x: f64, y: f64) -> Entity {
        world.spawn((Target, Kinematics::new(Vec2::new(x, y), Vec2::ZERO)))
    }

    #[test]
    fn test_nearest_target_picks_closest() {
        let mut world = World::new();
        let far = spawn_target(&mut world, 500.0, 0.0);
        let near = spawn_target(&mut world, 0.0, 100.0);
        let missile = world.spawn((Kinematics::default(),));

        let picked = NearestTarget::default().select(&world, missile, &Kinematics::default());
        assert_eq!(picked, Some(near));
        assert_ne!(picked, Some(far));
    }

    #[test]
    fn test_nearest_target_respects_range() {
        let mut world = World::new();
        spawn_target(&mut world, 500.0, 0.0);
        let missile = world.spawn((Kinematics::default(),));

        let selector = NearestTarget {
            max_range: Some(100.0),
        };
        assert_eq!(selector.select(&world, missile, &Kinematics::default()), None);
    }

    #[test]
    fn test_nearest_target_empty_world() {
        let mut world = World::new();
        let missile = world.spawn((Kinematics::default(),));
        assert_eq!(NearestTarget::default().select(&world, missile, &Kinematics::default()), None);
    }
}
