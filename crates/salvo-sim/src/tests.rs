//! Tests for the simulation engine, guidance pipeline, target tracking and fire control.

use approx::assert_abs_diff_eq;
use hecs::{Entity, World};
use test_log::test;

use salvo_core::commands::SimCommand;
use salvo_core::config::MissileSpec;
use salvo_core::enums::{FlightPhase, RetargetPolicy};
use salvo_core::error::{CommandError, ConfigError};
use salvo_core::events::SimEvent;
use salvo_core::state::{MissileView, SimSnapshot, TargetView};
use salvo_core::types::{Attitude, Kinematics, Vec2};

use crate::components::Turret;
use crate::engine::{SimConfig, SimulationEngine};
use crate::systems::fire_control;
use crate::world_setup;

fn id(entity: Entity) -> u64 {
    entity.to_bits().get()
}

fn at(x: f64, y: f64) -> Kinematics {
    Kinematics::new(Vec2::new(x, y), Vec2::ZERO)
}

fn spec(policy: RetargetPolicy) -> MissileSpec {
    MissileSpec {
        retarget_policy: policy,
        ..Default::default()
    }
}

fn missile_view(snapshot: &SimSnapshot, missile: Entity) -> Option<&MissileView> {
    snapshot.missiles.iter().find(|m| m.id == id(missile))
}

fn target_view(snapshot: &SimSnapshot, target: Entity) -> Option<&TargetView> {
    snapshot.targets.iter().find(|t| t.id == id(target))
}

/// Launch from the origin along +x.
fn launch(engine: &mut SimulationEngine, policy: RetargetPolicy, target: Option<Entity>) -> Entity {
    engine
        .spawn_missile(at(0.0, 0.0), 0.0, spec(policy), target)
        .unwrap()
}

/// Tick `count` times, returning the last snapshot and every event seen.
fn run(engine: &mut SimulationEngine, count: usize) -> (SimSnapshot, Vec<SimEvent>) {
    let mut events = Vec::new();
    let mut last = SimSnapshot::default();
    for _ in 0..count {
        last = engine.tick();
        events.extend(last.events.iter().cloned());
    }
    (last, events)
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let build = || {
        let mut engine = SimulationEngine::new(SimConfig {
            seed: 12345,
            ..Default::default()
        });
        engine.scatter_targets(5, 1500.0, 80.0);
        for i in 0..3 {
            let heading = i as f64;
            let missile_spec = spec(RetargetPolicy::IfInvalid);
            engine.spawn_missile(at(0.0, 0.0), heading, missile_spec, None).unwrap();
        }
        engine
    };
    let mut engine_a = build();
    let mut engine_b = build();

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_scatter_depends_on_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });
    assert_eq!(engine_a.scatter_targets(4, 1000.0, 50.0).len(), 4);
    assert_eq!(engine_b.scatter_targets(4, 1000.0, 50.0).len(), 4);

    let snap_a = engine_a.tick();
    let snap_b = engine_b.tick();
    assert_eq!(snap_a.targets.len(), 4);
    for target in &snap_a.targets {
        // Targets move during the first tick, so allow their step.
        assert!((target.position.length() - 1000.0).abs() <= 50.0 / 60.0 + 1e-9);
        assert!(target.velocity.length() < 50.0);
        assert!(target.incoming.is_empty());
    }
    assert_ne!(snap_a.targets, snap_b.targets);
}

#[test]
fn test_time_advances_at_tick_rate() {
    let mut engine = SimulationEngine::new(SimConfig {
        tick_rate: 50,
        ..Default::default()
    });
    assert!((engine.dt() - 0.02).abs() < 1e-12);
    let (snapshot, _) = run(&mut engine, 50);
    assert_eq!(snapshot.time.tick, 50);
    assert!((snapshot.time.elapsed_secs - 1.0).abs() < 1e-9);
    assert_eq!(engine.time(), snapshot.time);
}

// ---- Guidance ----

#[test]
fn test_missile_homes_on_stationary_target() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(800.0, 600.0));
    let heading = 600.0_f64.atan2(800.0);
    let missile = engine.spawn_missile(
        at(0.0, 0.0),
        heading,
        MissileSpec {
            fuse_radius: 20.0,
            ..spec(RetargetPolicy::Never)
        },
        Some(target),
    ).unwrap();

    let (_, events) = run(&mut engine, 10 * 60);
    let detonation = events.iter().find_map(|e| match e {
        SimEvent::MissileDetonated {
            missile: m,
            target: t,
            position,
        } if *m == id(missile) => Some((*t, *position)),
        _ => None,
    });
    let (hit, position) = detonation.expect("missile never detonated");
    assert_eq!(hit, id(target));
    assert!(position.distance(Vec2::new(800.0, 600.0)) < 100.0);
    assert!(!engine.world().contains(missile));
    assert!(engine.world().contains(target));
}

#[test]
fn test_guidance_activation_delay() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(2000.0, 0.0));
    let missile = launch(&mut engine, RetargetPolicy::Never, Some(target));

    let (early, early_events) = run(&mut engine, 10);
    let view = missile_view(&early, missile).unwrap();
    assert_eq!(view.phase, FlightPhase::Boost);
    assert_eq!(view.desired_acceleration, None);
    assert_eq!(view.throttle, 1.0);
    assert!(early_events.iter().any(|e| matches!(
        e,
        SimEvent::MissileLaunched { missile: m, target: Some(t) }
            if *m == id(missile) && *t == id(target)
    )));
    assert!(!early_events.iter().any(|e| matches!(e, SimEvent::GuidanceActivated { .. })));

    let (late, late_events) = run(&mut engine, 20);
    let activations = late_events
        .iter()
        .filter(|e| matches!(e, SimEvent::GuidanceActivated { missile: m } if *m == id(missile)))
        .count();
    assert_eq!(activations, 1);
    let view = missile_view(&late, missile).unwrap();
    assert_eq!(view.phase, FlightPhase::Guided);
    assert!(view.desired_acceleration.is_some());
    assert!(view.time_to_intercept.unwrap() > 0.0);
}

#[test]
fn test_lost_target_settles_heading() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(0.0, 2000.0));
    let missile = launch(&mut engine, RetargetPolicy::Never, Some(target));

    // Mid-turn toward a target off the nose.
    run(&mut engine, 30);
    let turning = *engine.world().get::<&Attitude>(missile).unwrap();
    assert!(turning.angular_velocity.abs() > 0.1);

    engine.destroy(target).unwrap();
    run(&mut engine, 60);
    let settled = *engine.world().get::<&Attitude>(missile).unwrap();
    assert_abs_diff_eq!(settled.angular_velocity, 0.0, epsilon = 1e-9);

    let (snapshot, _) = run(&mut engine, 60);
    let view = missile_view(&snapshot, missile).unwrap();
    assert_eq!(view.target, None);
    assert_eq!(view.desired_acceleration, None);
    assert_abs_diff_eq!(view.heading, settled.heading, epsilon = 1e-6);
    // Still flying: the motor keeps pushing along the held heading.
    assert_abs_diff_eq!(view.throttle, 1.0);
}

#[test]
fn test_thrust_delay_coasts() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let missile = engine.spawn_missile(
        Kinematics::new(Vec2::ZERO, Vec2::new(10.0, 0.0)),
        0.0,
        MissileSpec {
            thrust_activation_delay: 1.0,
            guidance_activation_delay: 2.0,
            ..Default::default()
        },
        None,
    ).unwrap();
    let (snapshot, _) = run(&mut engine, 30);
    let view = missile_view(&snapshot, missile).unwrap();
    assert_eq!(view.phase, FlightPhase::Coast);
    assert_eq!(view.throttle, 0.0);
    assert!((view.velocity.x - 10.0).abs() < 1e-9);
}

#[test]
fn test_missile_expires_after_lifetime() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let missile = engine.spawn_missile(
        at(0.0, 0.0),
        0.0,
        MissileSpec {
            lifetime: 0.5,
            ..spec(RetargetPolicy::Never)
        },
        None,
    ).unwrap();
    let (snapshot, events) = run(&mut engine, 40);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::MissileExpired { missile: m } if *m == id(missile))));
    assert!(snapshot.missiles.is_empty());
    assert!(!engine.world().contains(missile));
}

#[test]
fn test_invalid_missile_spec_is_rejected() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let bad = MissileSpec {
        max_acceleration: 0.0,
        ..Default::default()
    };
    let result = engine.spawn_missile(at(0.0, 0.0), 0.0, bad, None);
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            field: "max_acceleration",
            ..
        })
    ));
    let snapshot = engine.tick();
    assert!(snapshot.missiles.is_empty());
    assert!(snapshot.events.is_empty());
}

// ---- Retarget policies ----

#[test]
fn test_never_policy_goes_idle_when_target_dies() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let first = engine.spawn_target(at(3000.0, 0.0));
    let _other = engine.spawn_target(at(0.0, 3000.0));
    let missile = launch(&mut engine, RetargetPolicy::Never, Some(first));

    run(&mut engine, 20);
    engine.destroy(first).unwrap();
    let (snapshot, events) = run(&mut engine, 20);

    assert_eq!(missile_view(&snapshot, missile).unwrap().target, None);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::TargetLost { missile: m, target: t } if *m == id(missile) && *t == id(first)
    )));
    assert!(!events.iter().any(|e| matches!(e, SimEvent::TargetAcquired { .. })));
}

#[test]
fn test_if_invalid_policy_reacquires_after_loss() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let first = engine.spawn_target(at(3000.0, 0.0));
    let second = engine.spawn_target(at(0.0, 3000.0));
    let missile = launch(&mut engine, RetargetPolicy::IfInvalid, Some(first));

    let (snapshot, _) = run(&mut engine, 20);
    // A valid target is never swapped out.
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, Some(id(first)));

    engine.destroy(first).unwrap();
    let (snapshot, events) = run(&mut engine, 1);
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, Some(id(second)));
    assert_eq!(target_view(&snapshot, second).unwrap().incoming, vec![id(missile)]);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::TargetAcquired { missile: m, target: t } if *m == id(missile) && *t == id(second)
    )));
}

#[test]
fn test_if_invalid_acquires_when_launched_without_target() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(2000.0, 500.0));
    let missile = launch(&mut engine, RetargetPolicy::IfInvalid, None);

    let (snapshot, _) = run(&mut engine, 10);
    // Still boosting; the selector is not consulted before guidance.
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, None);

    let (snapshot, _) = run(&mut engine, 10);
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, Some(id(target)));
}

#[test]
fn test_always_policy_switches_to_nearest() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let far = engine.spawn_target(at(3000.0, 0.0));
    let near = engine.spawn_target(at(0.0, 400.0));
    let missile = launch(&mut engine, RetargetPolicy::Always, Some(far));

    let (snapshot, _) = run(&mut engine, 1);
    assert_eq!(target_view(&snapshot, far).unwrap().incoming, vec![id(missile)]);

    let (snapshot, events) = run(&mut engine, 20);
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, Some(id(near)));
    assert!(target_view(&snapshot, far).unwrap().incoming.is_empty());
    assert_eq!(target_view(&snapshot, near).unwrap().incoming, vec![id(missile)]);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::TargetLost { target: t, .. } if *t == id(far)
    )));
}

// ---- Incoming-missile observers ----

#[test]
fn test_destroyed_missile_leaves_incoming_list() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(3000.0, 0.0));
    let a = launch(&mut engine, RetargetPolicy::Never, Some(target));
    let b = engine
        .spawn_missile(at(0.0, 50.0), 0.0, spec(RetargetPolicy::Never), Some(target))
        .unwrap();

    let (snapshot, _) = run(&mut engine, 1);
    let mut incoming = target_view(&snapshot, target).unwrap().incoming.clone();
    incoming.sort_unstable();
    let mut expected = vec![id(a), id(b)];
    expected.sort_unstable();
    assert_eq!(incoming, expected);

    engine.destroy(a).unwrap();
    let (snapshot, _) = run(&mut engine, 1);
    assert_eq!(target_view(&snapshot, target).unwrap().incoming, vec![id(b)]);
}

#[test]
fn test_destroyed_target_notifies_missiles() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(3000.0, 0.0));
    let missile = launch(&mut engine, RetargetPolicy::IfInvalid, Some(target));
    run(&mut engine, 1);

    engine.destroy(target).unwrap();
    let guidance = engine
        .world()
        .get::<&crate::components::Guidance>(missile)
        .map(|g| g.track)
        .unwrap();
    assert_eq!(guidance, crate::tracking::TrackState::Reacquiring);

    let (snapshot, events) = run(&mut engine, 1);
    assert!(snapshot.targets.is_empty());
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, None);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::TargetLost { missile: m, .. } if *m == id(missile)
    )));
}

#[test]
fn test_destroy_twice_is_unknown_entity() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(0.0, 0.0));
    engine.destroy(target).unwrap();
    assert_eq!(engine.destroy(target), Err(CommandError::UnknownEntity(id(target))));
}

#[test]
fn test_spawn_with_dead_target_launches_untargeted() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(100.0, 0.0));
    engine.destroy(target).unwrap();
    let missile = launch(&mut engine, RetargetPolicy::Never, Some(target));
    let (snapshot, _) = run(&mut engine, 1);
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, None);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::MissileLaunched { target: None, .. })));
}

// ---- Commands ----

#[test]
fn test_set_missile_target_command() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let first = engine.spawn_target(at(3000.0, 0.0));
    let second = engine.spawn_target(at(0.0, 3000.0));
    let missile = launch(&mut engine, RetargetPolicy::Never, Some(first));

    engine.queue_command(SimCommand::SetMissileTarget {
        missile: id(missile),
        target: Some(id(second)),
    });
    let snapshot = engine.tick();
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, Some(id(second)));
    assert!(target_view(&snapshot, first).unwrap().incoming.is_empty());
    assert_eq!(target_view(&snapshot, second).unwrap().incoming, vec![id(missile)]);
    assert!(snapshot.events.iter().any(|e| matches!(
        e,
        SimEvent::TargetLost { target: t, .. } if *t == id(first)
    )));
    assert!(snapshot.events.iter().any(|e| matches!(
        e,
        SimEvent::TargetAcquired { target: t, .. } if *t == id(second)
    )));

    engine.queue_command(SimCommand::SetMissileTarget {
        missile: id(missile),
        target: None,
    });
    let snapshot = engine.tick();
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, None);
    assert!(target_view(&snapshot, second).unwrap().incoming.is_empty());
}

#[test]
fn test_set_retarget_policy_command() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let missile = launch(&mut engine, RetargetPolicy::Never, None);
    engine.queue_command(SimCommand::SetRetargetPolicy {
        missile: id(missile),
        policy: RetargetPolicy::Always,
    });
    let snapshot = engine.tick();
    assert_eq!(missile_view(&snapshot, missile).unwrap().policy, RetargetPolicy::Always);
}

#[test]
fn test_invalid_commands_are_dropped() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(500.0, 0.0));
    let turret = engine.spawn_turret(Vec2::ZERO, 300.0);
    let missile = launch(&mut engine, RetargetPolicy::Never, None);

    engine.queue_commands([
        // Garbage handle.
        SimCommand::DestroyEntity { entity: 0 },
        // A turret is not a target.
        SimCommand::SetMissileTarget {
            missile: id(missile),
            target: Some(id(turret)),
        },
        // A target is not a missile.
        SimCommand::SetRetargetPolicy {
            missile: id(target),
            policy: RetargetPolicy::Always,
        },
        // Still processed after the failures above.
        SimCommand::DestroyEntity { entity: id(target) },
    ]);
    let snapshot = engine.tick();
    assert!(snapshot.targets.is_empty());
    assert_eq!(missile_view(&snapshot, missile).unwrap().target, None);
    assert_eq!(snapshot.turrets.len(), 1);
}

// ---- Fire control ----

#[test]
fn test_turret_commands_aim_at_stationary_target() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(100.0, 0.0));
    let turret = engine.spawn_turret(Vec2::ZERO, 100.0);

    engine.queue_commands([
        SimCommand::SetTurretTarget {
            turret: id(turret),
            target: Some(id(target)),
        },
        SimCommand::AimTurret { turret: id(turret) },
    ]);
    let snapshot = engine.tick();
    let view = &snapshot.turrets[0];
    assert_eq!(view.target, Some(id(target)));
    let aim = view.aim.unwrap();
    assert!((aim - Vec2::new(100.0, 0.0)).length() < 1e-6);
    assert!((view.hit_time.unwrap() - 1.0).abs() < 1e-6);
    assert!(snapshot
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::TurretAimed { found: true, .. })));
}

#[test]
fn test_turret_keeps_last_aim_when_target_outruns() {
    let mut world = World::new();
    let mut events = Vec::new();
    let target = world_setup::spawn_target(&mut world, at(100.0, 0.0));
    let turret = world_setup::spawn_turret(&mut world, Vec2::ZERO, 100.0);
    world.get::<&mut Turret>(turret).unwrap().target = Some(target);

    let first = fire_control::aim_turret(&mut world, turret, &mut events).unwrap().unwrap();
    assert!(first.found);

    // Target now flies away faster than the projectile.
    world.get::<&mut Kinematics>(target).unwrap().velocity = Vec2::new(300.0, 0.0);
    let second = fire_control::aim_turret(&mut world, turret, &mut events).unwrap().unwrap();
    assert!(!second.found);
    let state = *world.get::<&Turret>(turret).unwrap();
    assert_eq!(state.aim, Some(first.velocity));
    assert_eq!(state.last_solution, Some(second));
    assert!(matches!(events.last(), Some(SimEvent::TurretAimed { found: false, .. })));
}

#[test]
fn test_turret_with_dead_target_clears_it() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(100.0, 0.0));
    let turret = engine.spawn_turret(Vec2::ZERO, 100.0);
    engine.queue_command(SimCommand::SetTurretTarget {
        turret: id(turret),
        target: Some(id(target)),
    });
    engine.tick();
    engine.destroy(target).unwrap();

    assert_eq!(engine.aim_turret(turret), Ok(None));
    let snapshot = engine.tick();
    assert_eq!(snapshot.turrets[0].target, None);
}

#[test]
fn test_aim_turret_rejects_non_turret() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let target = engine.spawn_target(at(100.0, 0.0));
    assert_eq!(engine.aim_turret(target), Err(CommandError::NotATurret(id(target))));
}
