//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world, processes queued commands,
//! runs all systems at a fixed tick, and produces `SimSnapshot`s. Completely
//! headless, so identical inputs give identical snapshots.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use salvo_core::commands::SimCommand;
use salvo_core::config::MissileSpec;
use salvo_core::constants::{DEFAULT_SEED, TICK_RATE};
use salvo_core::error::{CommandError, ConfigError};
use salvo_core::events::SimEvent;
use salvo_core::state::SimSnapshot;
use salvo_core::types::{Kinematics, SimTime, Vec2};
use salvo_solver::intercept::ProjectileSolution;

use crate::dispatch;
use crate::lifecycle;
use crate::systems;
use crate::targeting::{NearestTarget, TargetSelector};
use crate::world_setup;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for scenario setup. Same seed = same simulation.
    pub seed: u64,
    /// Fixed ticks per simulated second.
    pub tick_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_rate: TICK_RATE,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    dt: f64,
    rng: ChaCha8Rng,
    selector: Box<dyn TargetSelector>,
    command_queue: VecDeque<SimCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create an engine that retargets missiles onto the nearest target.
    pub fn new(config: SimConfig) -> Self {
        Self::with_selector(config, Box::new(NearestTarget::default()))
    }

    /// Create an engine with a caller-supplied target selector.
    pub fn with_selector(config: SimConfig, selector: Box<dyn TargetSelector>) -> Self {
        let tick_rate = config.tick_rate.max(1);
        log::info!("simulation at {tick_rate} Hz, seed {}", config.seed);
        Self {
            world: World::new(),
            time: SimTime::default(),
            dt: 1.0 / tick_rate as f64,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            selector,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();
        self.run_systems();
        self.time.advance(self.dt);

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, events)
    }

    pub fn spawn_target(&mut self, kinematics: Kinematics) -> Entity {
        world_setup::spawn_target(&mut self.world, kinematics)
    }

    /// Launch a homing missile. The launch event is reported with the next snapshot.
    pub fn spawn_missile(
        &mut self,
        kinematics: Kinematics,
        heading: f64,
        spec: MissileSpec,
        target: Option<Entity>,
    ) -> Result<Entity, ConfigError> {
        spec.validate()?;
        let missile =
            world_setup::spawn_missile(&mut self.world, kinematics, heading, spec, target);
        let target = self
            .world
            .get::<&crate::components::Guidance>(missile)
            .ok()
            .and_then(|g| g.track.target());
        self.events.push(SimEvent::MissileLaunched {
            missile: missile.to_bits().get(),
            target: target.map(|t| t.to_bits().get()),
        });
        Ok(missile)
    }

    pub fn spawn_turret(&mut self, position: Vec2, projectile_speed: f64) -> Entity {
        world_setup::spawn_turret(&mut self.world, position, projectile_speed)
    }

    /// Scatter moving targets around the origin using the engine's seeded RNG.
    pub fn scatter_targets(&mut self, count: usize, radius: f64, max_speed: f64) -> Vec<Entity> {
        world_setup::scatter_targets(&mut self.world, &mut self.rng, count, radius, max_speed)
    }

    /// Solve a firing solution for `turret` immediately.
    pub fn aim_turret(
        &mut self,
        turret: Entity,
    ) -> Result<Option<ProjectileSolution>, CommandError> {
        systems::fire_control::aim_turret(&mut self.world, turret, &mut self.events)
    }

    /// Remove an entity, running missile deregistration and target-loss notification.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), CommandError> {
        lifecycle::destroy(&mut self.world, entity, &mut self.events)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Process all queued commands. Invalid commands are logged and dropped.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = dispatch::dispatch(&mut self.world, &command, &mut self.events) {
                log::warn!("dropping {:?}: {err}", command.kind());
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Guidance (tracking, intercept solve, steering, throttle)
        systems::guidance::run(&mut self.world, self.selector.as_ref(), self.dt, &mut self.events);
        // 2. Movement integration
        systems::movement::run(&mut self.world, self.dt);
        // 3. Fuse and lifetime
        systems::fuse::run(&mut self.world, self.dt, &mut self.despawn_buffer, &mut self.events);
    }
}
