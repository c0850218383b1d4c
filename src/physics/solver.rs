//! Positional overlap resolution.
//!
//! Pushes overlapping entities apart along the separating axis. There is no
//! impulse, restitution or friction step; velocities belong to movement code.

use glam::Vec2;
use tracing::{trace, warn};

use crate::ecs::components::transform::Transform2d;

use super::contact::{Axis, CollisionPair, CollisionSide};

/// Counters from one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Pairs that received a correction.
    pub resolved: usize,
    /// Static-static pairs left overlapping.
    pub skipped_static: usize,
    /// Entity translations written back to the world.
    pub moved_entities: usize,
}

/// Full-penetration translations for A and B that separate the pair on its axis.
pub fn correction(pair: &CollisionPair) -> (Vec2, Vec2) {
    let pen = pair.penetration;
    let move_a = match (pair.axis(), pair.side_a) {
        (Axis::X, CollisionSide::Right) => Vec2::new(-pen.x, 0.0),
        (Axis::X, CollisionSide::Left) => Vec2::new(pen.x, 0.0),
        (Axis::Y, CollisionSide::Bottom) => Vec2::new(0.0, -pen.y),
        (Axis::Y, CollisionSide::Top) => Vec2::new(0.0, pen.y),
        _ => Vec2::ZERO,
    };
    (move_a, -move_a)
}

/// Apply corrections for every pair, in order.
///
/// A movable entity paired with a static one takes the whole correction; two
/// movable entities each take half. Static entities are never written.
pub fn resolve_pairs(world: &mut hecs::World, pairs: &[CollisionPair]) -> ResolveStats {
    let mut stats = ResolveStats::default();

    for pair in pairs {
        if pair.both_static() {
            stats.skipped_static += 1;
            continue;
        }

        let (move_a, move_b) = correction(pair);
        let (move_a, move_b) = match (pair.static_a, pair.static_b) {
            (false, true) => (move_a, Vec2::ZERO),
            (true, false) => (Vec2::ZERO, move_b),
            _ => (move_a * 0.5, move_b * 0.5),
        };

        stats.moved_entities += translate(world, pair.entity_a, move_a);
        stats.moved_entities += translate(world, pair.entity_b, move_b);
        stats.resolved += 1;

        trace!(
            a = ?pair.entity_a,
            b = ?pair.entity_b,
            ?move_a,
            ?move_b,
            "resolved overlap"
        );
    }

    if stats.skipped_static > 0 {
        warn!(
            count = stats.skipped_static,
            "static entities overlap and were left unresolved"
        );
    }

    stats
}

fn translate(world: &mut hecs::World, entity: hecs::Entity, delta: Vec2) -> usize {
    if delta == Vec2::ZERO {
        return 0;
    }
    match world.get::<&mut Transform2d>(entity) {
        Ok(mut transform) => {
            transform.position += delta;
            1
        }
        Err(_) => 0,
    }
}
