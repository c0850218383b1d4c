//! Axis-aligned boxes and the per-query collider snapshots built from the world.

use glam::Vec2;

use crate::ecs::components::physics::Body;
use crate::ecs::components::transform::Transform2d;

/// Axis-aligned bounding box in world space.
///
/// Invariant: `min <= max` on both axes. Zero-size boxes are legal but never overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` reaching `half_extents` out on each axis.
    #[inline]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// World-space box of a transform: centered on its position, sized by `size * scale`.
    #[inline]
    pub fn from_transform(transform: &Transform2d) -> Self {
        Self::from_center_half_extents(transform.position, transform.half_extents())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// True when the box has positive width and height.
    #[inline]
    pub fn has_area(&self) -> bool {
        self.max.x > self.min.x && self.max.y > self.min.y
    }

    /// Strict overlap test. Boxes that only share an edge do not overlap, and
    /// neither does a box without area.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.has_area()
            && other.has_area()
            && self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Grow the box outward by `half_extents` on each side (Minkowski sum with a box).
    #[inline]
    pub fn expanded(&self, half_extents: Vec2) -> Self {
        Self {
            min: self.min - half_extents,
            max: self.max + half_extents,
        }
    }

    /// Smallest box containing both.
    #[inline]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Snapshot of one collidable entity taken when a query starts.
///
/// `index` is the entity's position in the query input and fixes pair
/// orientation: the lower index is always side A.
#[derive(Debug, Clone, Copy)]
pub struct ColliderEntry {
    pub entity: hecs::Entity,
    pub index: usize,
    /// Entity position (box center).
    pub position: Vec2,
    pub aabb: Aabb,
    pub is_static: bool,
}

impl ColliderEntry {
    pub fn new(entity: hecs::Entity, index: usize, transform: &Transform2d, body: &Body) -> Self {
        Self {
            entity,
            index,
            position: transform.position,
            aabb: Aabb::from_transform(transform),
            is_static: body.is_static,
        }
    }
}

/// Snapshot every entity that has both a [`Transform2d`] and a [`Body`].
pub fn collect_colliders(world: &hecs::World) -> Vec<ColliderEntry> {
    world
        .query::<(&Transform2d, &Body)>()
        .iter()
        .enumerate()
        .map(|(index, (entity, (transform, body)))| {
            ColliderEntry::new(entity, index, transform, body)
        })
        .collect()
}

/// Snapshot an explicit entity list, in the given order.
///
/// Handles that are dead or lack a [`Transform2d`]/[`Body`] are skipped.
pub fn collect_colliders_from(
    world: &hecs::World,
    entities: &[hecs::Entity],
) -> Vec<ColliderEntry> {
    let mut entries = Vec::with_capacity(entities.len());
    for &entity in entities {
        let transform = world.get::<&Transform2d>(entity);
        let body = world.get::<&Body>(entity);
        if let (Ok(transform), Ok(body)) = (transform, body) {
            let index = entries.len();
            entries.push(ColliderEntry::new(entity, index, &transform, &body));
        }
    }
    entries
}
