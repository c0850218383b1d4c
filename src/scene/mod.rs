//! Top-level simulation session.
//!
//! A [`Scene`] owns the entity world, the collision system and the camera, and
//! advances them with a fixed-timestep accumulator. Nothing here is global;
//! any number of scenes can run side by side.

pub mod behavior;

use glam::Vec2;
use hecs::Entity;
use thiserror::Error;
use tracing::{debug, info};

use crate::camera::Camera2d;
use crate::ecs::components::physics::{Body, EntityKind, Velocity};
use crate::ecs::components::transform::Transform2d;
use crate::physics::mover::{MoveInput, MoveOutcome, Mover, MoverConfig};
use crate::physics::solver::ResolveStats;
use crate::physics::{CollisionConfig, CollisionSystem, ConfigError};

use self::behavior::{BehaviorContext, BehaviorTable};

/// Scene bookkeeping failures.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity limit of {0} reached")]
    EntityLimit(usize),
    #[error("no such entity: {0:?}")]
    NoSuchEntity(Entity),
    #[error("fixed timestep must be positive, got {0}")]
    InvalidTimestep(f64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration for a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub collision: CollisionConfig,
    pub mover: MoverConfig,
    /// Fixed timestep in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum fixed steps per call to [`Scene::step`]. Default: 4.
    pub max_substeps: u32,
    /// Camera easing rate toward the player, per second. Default: 25.
    pub camera_follow_rate: f32,
    /// Spawn cap. Default: 64.
    pub max_entities: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            collision: CollisionConfig::default(),
            mover: MoverConfig::default(),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            camera_follow_rate: 25.0,
            max_entities: 64,
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collision(mut self, collision: CollisionConfig) -> Self {
        self.collision = collision;
        self
    }

    pub fn mover(mut self, mover: MoverConfig) -> Self {
        self.mover = mover;
        self
    }

    pub fn fixed_timestep(mut self, fixed_timestep: f64) -> Self {
        self.fixed_timestep = fixed_timestep;
        self
    }

    pub fn max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    pub fn camera_follow_rate(mut self, rate: f32) -> Self {
        self.camera_follow_rate = rate;
        self
    }

    pub fn max_entities(mut self, max_entities: usize) -> Self {
        self.max_entities = max_entities;
        self
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        self.collision.validate()?;
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(SceneError::InvalidTimestep(self.fixed_timestep));
        }
        Ok(())
    }
}

/// Input sampled once per frame and applied to every fixed step in it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub player: MoveInput,
}

/// Summary of the most recent fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    pub overlaps: usize,
    pub resolve: ResolveStats,
    pub player: Option<MoveOutcome>,
}

/// A running simulation.
pub struct Scene {
    config: SceneConfig,
    world: hecs::World,
    collision: CollisionSystem,
    camera: Camera2d,
    behaviors: BehaviorTable,
    player: Option<Entity>,
    accumulator: f64,
    last_report: StepReport,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self {
            config,
            world: hecs::World::new(),
            collision: CollisionSystem::new(config.collision)?,
            camera: Camera2d::default(),
            behaviors: BehaviorTable::standard(),
            player: None,
            accumulator: 0.0,
            last_report: StepReport::default(),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn collision(&self) -> &CollisionSystem {
        &self.collision
    }

    pub fn collision_mut(&mut self) -> &mut CollisionSystem {
        &mut self.collision
    }

    pub fn camera(&self) -> &Camera2d {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2d {
        &mut self.camera
    }

    pub fn behaviors_mut(&mut self) -> &mut BehaviorTable {
        &mut self.behaviors
    }

    /// The local player, if one has been spawned.
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn entity_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn last_report(&self) -> &StepReport {
        &self.last_report
    }

    fn check_capacity(&self) -> Result<(), SceneError> {
        if self.entity_count() >= self.config.max_entities {
            return Err(SceneError::EntityLimit(self.config.max_entities));
        }
        Ok(())
    }

    /// Spawn immovable level geometry.
    pub fn spawn_solid(&mut self, position: Vec2, size: Vec2) -> Result<Entity, SceneError> {
        self.check_capacity()?;
        Ok(self.world.spawn((
            Transform2d::new(position, size),
            Body::new_static(),
            EntityKind::Solid,
        )))
    }

    /// Spawn a movable box drifting at `velocity`.
    pub fn spawn_prop(
        &mut self,
        position: Vec2,
        size: Vec2,
        velocity: Vec2,
    ) -> Result<Entity, SceneError> {
        self.check_capacity()?;
        Ok(self.world.spawn((
            Transform2d::new(position, size),
            Body::new_dynamic(),
            Velocity(velocity),
            EntityKind::Prop,
        )))
    }

    /// Spawn the player and make it the local player. The camera jumps to it.
    pub fn spawn_player(&mut self, position: Vec2, size: Vec2) -> Result<Entity, SceneError> {
        self.check_capacity()?;
        let entity = self.world.spawn((
            Transform2d::new(position, size),
            Body::new_dynamic(),
            Mover::default(),
            EntityKind::Player,
        ));
        self.player = Some(entity);
        self.camera.position = position;
        info!(?entity, ?position, "player spawned");
        Ok(entity)
    }

    pub fn despawn(&mut self, entity: Entity) -> Result<(), SceneError> {
        self.world
            .despawn(entity)
            .map_err(|_| SceneError::NoSuchEntity(entity))?;
        if self.player == Some(entity) {
            self.player = None;
        }
        Ok(())
    }

    /// Despawn everything.
    pub fn clear(&mut self) {
        self.world.clear();
        self.player = None;
        self.accumulator = 0.0;
    }

    /// Advance by `delta_time` seconds, running as many fixed steps as fit.
    ///
    /// Returns the number of fixed steps run.
    pub fn step(&mut self, delta_time: f64, input: &FrameInput) -> u32 {
        self.accumulator += delta_time;

        let fixed = self.config.fixed_timestep;
        let mut substeps = 0u32;
        while self.accumulator >= fixed && substeps < self.config.max_substeps {
            self.fixed_step(fixed as f32, input);
            self.accumulator -= fixed;
            substeps += 1;
        }

        // Drop the backlog instead of spiralling
        if self.accumulator > fixed * self.config.max_substeps as f64 {
            debug!(backlog = self.accumulator, "dropping simulation backlog");
            self.accumulator = 0.0;
        }

        substeps
    }

    /// One simulation step of `dt` seconds.
    pub fn fixed_step(&mut self, dt: f32, input: &FrameInput) {
        // 1. Detect
        let pairs = self.collision.detect_overlaps(&self.world);

        // 2. Resolve
        let resolve = self.collision.resolve(&mut self.world, &pairs);

        // 3. Traces below must see resolved positions
        if resolve.moved_entities > 0 {
            self.collision.build_from_world(&self.world);
        }

        // 4. Behaviors
        let entities: Vec<(Entity, EntityKind)> = self
            .world
            .query::<&EntityKind>()
            .iter()
            .map(|(entity, kind)| (entity, *kind))
            .collect();

        let mut ctx = BehaviorContext {
            world: &mut self.world,
            collision: &self.collision,
            mover: &self.config.mover,
            input: input.player,
            dt,
            player_outcome: None,
        };
        self.behaviors.run(&mut ctx, &entities);
        let player_outcome = ctx.player_outcome;

        // 5. Camera
        let target = self
            .player
            .and_then(|player| self.world.get::<&Transform2d>(player).ok().map(|t| t.position));
        if let Some(target) = target {
            self.camera.follow(target, self.config.camera_follow_rate, dt);
        }

        self.last_report = StepReport {
            overlaps: pairs.len(),
            resolve,
            player: player_outcome,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(scene: &Scene, entity: Entity) -> Vec2 {
        scene.world().get::<&Transform2d>(entity).unwrap().position
    }

    fn level() -> (Scene, Entity) {
        let mut scene = Scene::new(SceneConfig::default()).unwrap();
        let floor = scene
            .spawn_solid(Vec2::new(0.0, 100.0), Vec2::new(600.0, 20.0))
            .unwrap();
        (scene, floor)
    }

    #[test]
    fn test_scene_config_default() {
        let config = SceneConfig::default();
        assert!((config.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(config.max_substeps, 4);
        assert_eq!(config.max_entities, 64);
        assert_eq!(config.camera_follow_rate, 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_cell = SceneConfig::new().collision(CollisionConfig::new().cell_size(0.0));
        assert!(matches!(
            Scene::new(bad_cell),
            Err(SceneError::Config(ConfigError::InvalidCellSize(_)))
        ));

        let bad_step = SceneConfig::new().fixed_timestep(0.0);
        assert!(matches!(
            Scene::new(bad_step),
            Err(SceneError::InvalidTimestep(_))
        ));
    }

    #[test]
    fn test_entity_limit() {
        let mut scene = Scene::new(SceneConfig::new().max_entities(2)).unwrap();
        scene.spawn_solid(Vec2::ZERO, Vec2::ONE).unwrap();
        let prop = scene.spawn_prop(Vec2::X, Vec2::ONE, Vec2::ZERO).unwrap();

        assert!(matches!(
            scene.spawn_player(Vec2::Y, Vec2::ONE),
            Err(SceneError::EntityLimit(2))
        ));

        scene.despawn(prop).unwrap();
        assert!(scene.spawn_player(Vec2::Y, Vec2::ONE).is_ok());
    }

    #[test]
    fn test_despawn_player() {
        let (mut scene, _) = level();
        let player = scene.spawn_player(Vec2::ZERO, Vec2::new(14.0, 17.0)).unwrap();
        assert_eq!(scene.player(), Some(player));

        scene.despawn(player).unwrap();
        assert_eq!(scene.player(), None);
        assert!(matches!(
            scene.despawn(player),
            Err(SceneError::NoSuchEntity(_))
        ));
    }

    #[test]
    fn test_step_runs_fixed_substeps() {
        let (mut scene, _) = level();
        let input = FrameInput::default();

        assert_eq!(scene.step(1.0 / 120.0, &input), 0);
        assert_eq!(scene.step(1.0 / 120.0, &input), 1);
        assert_eq!(scene.step(1.0 / 30.0, &input), 2);

        // A long hitch is capped and the backlog dropped
        assert_eq!(scene.step(1.0, &input), 4);
        assert_eq!(scene.step(0.0, &input), 0);
    }

    #[test]
    fn test_player_lands_and_camera_follows() {
        let (mut scene, _) = level();
        let player = scene.spawn_player(Vec2::ZERO, Vec2::new(14.0, 17.0)).unwrap();
        let input = FrameInput::default();

        for _ in 0..120 {
            scene.step(1.0 / 60.0, &input);
        }

        let rest_y = 90.0 - 8.5 - 0.01;
        let at = position(&scene, player);
        assert!((at.y - rest_y).abs() < 1e-3, "y = {}", at.y);
        assert!(scene.last_report().player.unwrap().grounded);
        assert!((scene.camera().position - at).length() < 1e-2);
    }

    #[test]
    fn test_player_walks() {
        let (mut scene, _) = level();
        let player = scene.spawn_player(Vec2::new(0.0, 81.49), Vec2::new(14.0, 17.0)).unwrap();
        let input = FrameInput {
            player: MoveInput::new(1.0, false),
        };

        for _ in 0..30 {
            scene.step(1.0 / 60.0, &input);
        }
        assert!(position(&scene, player).x > 50.0);
    }

    #[test]
    fn test_prop_pushed_out_of_solid() {
        let (mut scene, floor) = level();
        // Sunk 4 units into the floor top at y = 90
        let prop = scene
            .spawn_prop(Vec2::new(0.0, 89.0), Vec2::splat(10.0), Vec2::ZERO)
            .unwrap();

        scene.fixed_step(1.0 / 60.0, &FrameInput::default());

        assert_eq!(scene.last_report().overlaps, 1);
        assert_eq!(scene.last_report().resolve.resolved, 1);
        assert_eq!(position(&scene, floor), Vec2::new(0.0, 100.0));
        assert!((position(&scene, prop).y - 85.0).abs() < 1e-4);

        scene.fixed_step(1.0 / 60.0, &FrameInput::default());
        assert_eq!(scene.last_report().overlaps, 0);
    }

    #[test]
    fn test_props_push_each_other_apart() {
        let mut scene = Scene::new(SceneConfig::default()).unwrap();
        let a = scene.spawn_prop(Vec2::ZERO, Vec2::splat(10.0), Vec2::ZERO).unwrap();
        let b = scene
            .spawn_prop(Vec2::new(8.0, 0.0), Vec2::splat(10.0), Vec2::ZERO)
            .unwrap();

        scene.fixed_step(1.0 / 60.0, &FrameInput::default());

        assert!((position(&scene, a).x + 1.0).abs() < 1e-5);
        assert!((position(&scene, b).x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_props_drift_and_custom_behaviors() {
        let mut scene = Scene::new(SceneConfig::default()).unwrap();
        let prop = scene
            .spawn_prop(Vec2::ZERO, Vec2::splat(4.0), Vec2::new(60.0, 0.0))
            .unwrap();

        scene.fixed_step(0.5, &FrameInput::default());
        assert_eq!(position(&scene, prop), Vec2::new(30.0, 0.0));

        scene.behaviors_mut().set(EntityKind::Prop, None);
        scene.fixed_step(0.5, &FrameInput::default());
        assert_eq!(position(&scene, prop), Vec2::new(30.0, 0.0));
    }
}
