//! Kinematic character movement built on hull traces.
//!
//! Each step moves horizontally, then vertically, then probes below the hull
//! for ground. Every move is clamped to the first hit minus a small skin so
//! the hull never ends a step touching geometry.

use glam::Vec2;
use tracing::trace;

use crate::ecs::components::transform::Transform2d;
use crate::math::normalize_or_self;

use super::CollisionSystem;

/// Tuning for [`step_mover`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoverConfig {
    /// Downward acceleration while airborne, units/s^2. Default: 980.
    pub gravity: f32,
    /// Horizontal speed cap, units/s. Default: 200.
    pub max_speed: f32,
    /// Horizontal acceleration under input, units/s^2. Default: 2000.
    pub acceleration: f32,
    /// Fraction of horizontal velocity shed per second with no input. Default: 6.
    pub damping: f32,
    /// Upward speed applied on jump, units/s. Default: 400.
    pub jump_impulse: f32,
    /// Reach of the ground probe below the hull. Default: 2.
    pub ground_check_distance: f32,
    /// Gap kept between the hull and anything it stops against. Default: 0.01.
    pub skin: f32,
    /// Probe hits this close pull the hull down onto the surface. Default: 2.
    pub snap_distance: f32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            max_speed: 200.0,
            acceleration: 2000.0,
            damping: 6.0,
            jump_impulse: 400.0,
            ground_check_distance: 2.0,
            skin: 0.01,
            snap_distance: 2.0,
        }
    }
}

impl MoverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn jump_impulse(mut self, jump_impulse: f32) -> Self {
        self.jump_impulse = jump_impulse;
        self
    }

    pub fn ground_check_distance(mut self, distance: f32) -> Self {
        self.ground_check_distance = distance;
        self
    }

    pub fn skin(mut self, skin: f32) -> Self {
        self.skin = skin;
        self
    }

    pub fn snap_distance(mut self, distance: f32) -> Self {
        self.snap_distance = distance;
        self
    }
}

/// Character controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mover {
    pub velocity: Vec2,
    pub grounded: bool,
    pub facing_left: bool,
}

/// Player intent for one step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveInput {
    /// Horizontal direction, -1 (left) to 1 (right).
    pub horizontal: f32,
    pub jump: bool,
}

impl MoveInput {
    pub fn new(horizontal: f32, jump: bool) -> Self {
        Self { horizontal, jump }
    }
}

/// What happened during one [`step_mover`] call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveOutcome {
    pub displacement: Vec2,
    pub grounded: bool,
    pub hit_wall: bool,
    pub hit_ceiling: bool,
}

/// Advance one mover by `dt` seconds against the collision system's current grid.
///
/// The entity itself is excluded from every trace. Returns `None` if the
/// entity is missing a [`Transform2d`] or a [`Mover`].
pub fn step_mover(
    collision: &CollisionSystem,
    world: &mut hecs::World,
    entity: hecs::Entity,
    config: &MoverConfig,
    input: MoveInput,
    dt: f32,
) -> Option<MoveOutcome> {
    let (start, hull) = {
        let transform = world.get::<&Transform2d>(entity).ok()?;
        (transform.position, transform.scaled_size())
    };
    let mut state = *world.get::<&Mover>(entity).ok()?;
    let mut outcome = MoveOutcome::default();
    let mut position = start;

    let direction = normalize_or_self(Vec2::new(input.horizontal, 0.0));
    if direction.x < 0.0 {
        state.facing_left = true;
    } else if direction.x > 0.0 {
        state.facing_left = false;
    }

    if !state.grounded {
        state.velocity.y += config.gravity * dt;
    } else if state.velocity.y > 0.0 {
        state.velocity.y = 0.0;
    }

    if input.jump && state.grounded {
        state.velocity.y = -config.jump_impulse;
        state.grounded = false;
    }

    if direction.x != 0.0 {
        state.velocity.x += direction.x * config.acceleration * dt;
        state.velocity.x = state.velocity.x.clamp(-config.max_speed, config.max_speed);
    } else {
        state.velocity.x -= state.velocity.x * config.damping * dt;
    }

    let delta = state.velocity * dt;

    if delta.x != 0.0 {
        let end = position + Vec2::new(delta.x, 0.0);
        let hit = collision.trace_hull(position, end, hull, Some(entity));
        if hit.hit {
            position.x += delta.x.signum() * (hit.distance - config.skin).max(0.0);
            state.velocity.x = 0.0;
            outcome.hit_wall = true;
        } else {
            position.x = end.x;
        }
    }

    if delta.y != 0.0 {
        let end = position + Vec2::new(0.0, delta.y);
        let hit = collision.trace_hull(position, end, hull, Some(entity));
        if hit.hit {
            position.y += delta.y.signum() * (hit.distance - config.skin).max(0.0);
            if delta.y > 0.0 {
                state.grounded = true;
            } else {
                outcome.hit_ceiling = true;
            }
            state.velocity.y = 0.0;
        } else {
            position.y = end.y;
            state.grounded = false;
        }
    }

    let probe_end = position + Vec2::new(0.0, config.ground_check_distance);
    let probe = collision.trace_hull(position, probe_end, hull, Some(entity));
    if probe.hit && probe.distance <= config.ground_check_distance {
        state.grounded = true;
        if probe.distance <= config.snap_distance && state.velocity.y >= 0.0 {
            position.y = probe.hit_point.y - config.skin;
            state.velocity.y = 0.0;
        }
    } else if state.velocity.y >= 0.0 {
        state.grounded = false;
    }

    if let Ok(mut transform) = world.get::<&mut Transform2d>(entity) {
        transform.position = position;
    }
    if let Ok(mut mover) = world.get::<&mut Mover>(entity) {
        *mover = state;
    }

    outcome.displacement = position - start;
    outcome.grounded = state.grounded;

    trace!(
        ?entity,
        ?position,
        velocity = ?state.velocity,
        grounded = state.grounded,
        "mover step"
    );

    Some(outcome)
}
