//! Fire control for direct-fire turrets.
//!
//! Called once per firing decision, not every tick. A turret without an exact
//! intercept keeps its last aim rather than stalling.

use hecs::{Entity, World};

use salvo_core::error::CommandError;
use salvo_core::events::SimEvent;
use salvo_core::types::Kinematics;
use salvo_solver::intercept::{solve_projectile_intercept, ProjectileSolution};

use crate::components::{Target, Turret};

/// Solve and store a firing solution for `turret`.
///
/// Returns `Ok(None)` when the turret has no live target (its target is cleared).
pub fn aim_turret(
    world: &mut World,
    turret: Entity,
    events: &mut Vec<SimEvent>,
) -> Result<Option<ProjectileSolution>, CommandError> {
    let id = turret.to_bits().get();
    if !world.contains(turret) {
        return Err(CommandError::UnknownEntity(id));
    }
    let (mut state, shooter) = match (
        world.get::<&Turret>(turret),
        world.get::<&Kinematics>(turret),
    ) {
        (Ok(t), Ok(k)) => (*t, *k),
        _ => return Err(CommandError::NotATurret(id)),
    };

    let target = state
        .target
        .filter(|t| world.contains(*t) && world.get::<&Target>(*t).is_ok());
    let Some(target) = target else {
        if let Ok(mut t) = world.get::<&mut Turret>(turret) {
            t.target = None;
        }
        return Ok(None);
    };
    let Ok(target_body) = world.get::<&Kinematics>(target).map(|k| *k) else {
        return Ok(None);
    };

    let relative = shooter.relative(&target_body);
    let solution = solve_projectile_intercept(
        relative.position,
        relative.velocity,
        state.projectile_speed,
    );

    let aim = if solution.found {
        solution.velocity
    } else {
        state.aim.unwrap_or(solution.velocity)
    };
    state.aim = Some(aim);
    state.last_solution = Some(solution);

    if let Ok(mut t) = world.get::<&mut Turret>(turret) {
        *t = state;
    }
    events.push(SimEvent::TurretAimed {
        turret: id,
        target: target.to_bits().get(),
        aim,
        found: solution.found,
    });
    Ok(Some(solution))
}
