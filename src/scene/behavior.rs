//! Per-kind entity behavior dispatch.

use hecs::Entity;

use crate::ecs::components::physics::{EntityKind, Velocity};
use crate::ecs::components::transform::Transform2d;
use crate::physics::mover::{step_mover, MoveInput, MoveOutcome, MoverConfig};
use crate::physics::CollisionSystem;

/// Everything a behavior may read or write during one fixed step.
pub struct BehaviorContext<'a> {
    pub world: &'a mut hecs::World,
    pub collision: &'a CollisionSystem,
    pub mover: &'a MoverConfig,
    pub input: MoveInput,
    pub dt: f32,
    /// Set by the player behavior.
    pub player_outcome: Option<MoveOutcome>,
}

/// Behavior run once per fixed step for each entity of a kind.
pub type BehaviorFn = fn(&mut BehaviorContext<'_>, Entity);

/// Maps each [`EntityKind`] to an optional behavior.
#[derive(Clone, Copy)]
pub struct BehaviorTable {
    behaviors: [Option<BehaviorFn>; EntityKind::COUNT],
}

impl Default for BehaviorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for BehaviorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for kind in EntityKind::ALL {
            map.entry(&kind, &self.get(kind).is_some());
        }
        map.finish()
    }
}

impl BehaviorTable {
    /// Table with no behaviors.
    pub fn empty() -> Self {
        Self {
            behaviors: [None; EntityKind::COUNT],
        }
    }

    /// Solids do nothing, props drift, the player runs the mover.
    pub fn standard() -> Self {
        Self::empty()
            .with(EntityKind::Prop, integrate_velocity)
            .with(EntityKind::Player, drive_player)
    }

    pub fn with(mut self, kind: EntityKind, behavior: BehaviorFn) -> Self {
        self.set(kind, Some(behavior));
        self
    }

    pub fn set(&mut self, kind: EntityKind, behavior: Option<BehaviorFn>) {
        self.behaviors[kind.index()] = behavior;
    }

    pub fn get(&self, kind: EntityKind) -> Option<BehaviorFn> {
        self.behaviors[kind.index()]
    }

    /// Run the behavior of each entity's kind, in the given order.
    pub fn run(&self, ctx: &mut BehaviorContext<'_>, entities: &[(Entity, EntityKind)]) {
        for &(entity, kind) in entities {
            if let Some(behavior) = self.get(kind) {
                behavior(ctx, entity);
            }
        }
    }
}

/// Move by [`Velocity`] with no collision checks; overlaps are resolved next step.
pub fn integrate_velocity(ctx: &mut BehaviorContext<'_>, entity: Entity) {
    let Ok((transform, velocity)) = ctx
        .world
        .query_one_mut::<(&mut Transform2d, &Velocity)>(entity)
    else {
        return;
    };
    transform.position += velocity.0 * ctx.dt;
}

/// Drive the entity with the frame's input.
pub fn drive_player(ctx: &mut BehaviorContext<'_>, entity: Entity) {
    ctx.player_outcome = step_mover(
        ctx.collision,
        ctx.world,
        entity,
        ctx.mover,
        ctx.input,
        ctx.dt,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::Body;
    use glam::Vec2;

    fn bump(ctx: &mut BehaviorContext<'_>, entity: Entity) {
        if let Ok(mut transform) = ctx.world.get::<&mut Transform2d>(entity) {
            transform.position.x += 1.0;
        }
    }

    #[test]
    fn test_standard_table() {
        let table = BehaviorTable::standard();
        assert!(table.get(EntityKind::Solid).is_none());
        assert!(table.get(EntityKind::Prop).is_some());
        assert!(table.get(EntityKind::Player).is_some());
        assert!(BehaviorTable::empty().get(EntityKind::Player).is_none());
    }

    #[test]
    fn test_run_dispatches_by_kind() {
        let mut world = hecs::World::new();
        let solid = world.spawn((Transform2d::default(), EntityKind::Solid));
        let prop = world.spawn((
            Transform2d::default(),
            Velocity(Vec2::new(60.0, -30.0)),
            EntityKind::Prop,
        ));
        let entities = [(solid, EntityKind::Solid), (prop, EntityKind::Prop)];

        let collision = CollisionSystem::default();
        let mover = MoverConfig::default();
        let mut ctx = BehaviorContext {
            world: &mut world,
            collision: &collision,
            mover: &mover,
            input: MoveInput::default(),
            dt: 0.5,
            player_outcome: None,
        };

        BehaviorTable::standard()
            .with(EntityKind::Solid, bump)
            .run(&mut ctx, &entities);

        assert!(ctx.player_outcome.is_none());
        assert_eq!(world.get::<&Transform2d>(solid).unwrap().position, Vec2::new(1.0, 0.0));
        assert_eq!(world.get::<&Transform2d>(prop).unwrap().position, Vec2::new(30.0, -15.0));
    }

    #[test]
    fn test_drive_player_records_outcome() {
        let mut world = hecs::World::new();
        let player = world.spawn((
            Transform2d::new(Vec2::ZERO, Vec2::splat(10.0)),
            Body::new_dynamic(),
            crate::physics::mover::Mover::default(),
        ));

        let collision = CollisionSystem::default();
        let mover = MoverConfig::default();
        let mut ctx = BehaviorContext {
            world: &mut world,
            collision: &collision,
            mover: &mover,
            input: MoveInput::new(1.0, false),
            dt: 0.1,
            player_outcome: None,
        };
        drive_player(&mut ctx, player);

        let outcome = ctx.player_outcome.unwrap();
        assert!(outcome.displacement.x > 0.0);
        assert!(outcome.displacement.y > 0.0);
        assert!(!outcome.grounded);
    }
}
