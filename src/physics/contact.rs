//! Contact and trace result data structures.

use glam::Vec2;

/// Which face of a box was touched.
///
/// Names are screen space: y grows downward, so `Top` is the min-y face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionSide {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

impl CollisionSide {
    /// The face on the other box of a contact.
    pub fn opposite(self) -> Self {
        match self {
            CollisionSide::Top => CollisionSide::Bottom,
            CollisionSide::Bottom => CollisionSide::Top,
            CollisionSide::Left => CollisionSide::Right,
            CollisionSide::Right => CollisionSide::Left,
            CollisionSide::None => CollisionSide::None,
        }
    }

    /// Unit normal reported for a trace hit on this face.
    pub fn normal(self) -> Vec2 {
        match self {
            CollisionSide::Top => Vec2::new(0.0, 1.0),
            CollisionSide::Bottom => Vec2::new(0.0, -1.0),
            CollisionSide::Left => Vec2::new(-1.0, 0.0),
            CollisionSide::Right => Vec2::new(1.0, 0.0),
            CollisionSide::None => Vec2::ZERO,
        }
    }
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Separating axis for a penetration: the one with the smaller overlap.
    /// Equal overlaps pick `Y`.
    #[inline]
    pub fn of_penetration(penetration: Vec2) -> Self {
        if penetration.x < penetration.y {
            Axis::X
        } else {
            Axis::Y
        }
    }
}

/// One overlapping pair found by a detection pass.
///
/// `side_a` and `side_b` are always opposites. A pair lives only for the pass
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    pub entity_a: hecs::Entity,
    pub entity_b: hecs::Entity,
    /// Input-order index of A. Always lower than `index_b`.
    pub index_a: usize,
    pub index_b: usize,
    pub static_a: bool,
    pub static_b: bool,
    /// Per-axis overlap extent, never negative.
    pub penetration: Vec2,
    pub side_a: CollisionSide,
    pub side_b: CollisionSide,
}

impl CollisionPair {
    #[inline]
    pub fn axis(&self) -> Axis {
        Axis::of_penetration(self.penetration)
    }

    #[inline]
    pub fn both_static(&self) -> bool {
        self.static_a && self.static_b
    }
}

/// Closest intersection along one line or hull trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResult {
    pub hit: bool,
    pub hit_entity: Option<hecs::Entity>,
    /// Line traces: point on the struck edge. Hull traces: hull center at contact.
    pub hit_point: Vec2,
    pub hit_normal: Vec2,
    /// Distance travelled before contact; `f32::INFINITY` on a miss.
    pub distance: f32,
    /// Parametric contact time along the segment; 1.0 on a miss.
    pub fraction: f32,
    pub side: CollisionSide,
}

impl TraceResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            hit_entity: None,
            hit_point: Vec2::ZERO,
            hit_normal: Vec2::ZERO,
            distance: f32::INFINITY,
            fraction: 1.0,
            side: CollisionSide::None,
        }
    }
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::miss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for side in [
            CollisionSide::None,
            CollisionSide::Top,
            CollisionSide::Bottom,
            CollisionSide::Left,
            CollisionSide::Right,
        ] {
            assert_eq!(side.opposite().opposite(), side);
        }
        assert_eq!(CollisionSide::Left.opposite(), CollisionSide::Right);
        assert_eq!(CollisionSide::Top.opposite(), CollisionSide::Bottom);
    }

    #[test]
    fn test_normals_are_unit() {
        for side in [
            CollisionSide::Top,
            CollisionSide::Bottom,
            CollisionSide::Left,
            CollisionSide::Right,
        ] {
            assert!((side.normal().length() - 1.0).abs() < 1e-6);
            assert_eq!(side.normal(), -side.opposite().normal());
        }
        assert_eq!(CollisionSide::None.normal(), Vec2::ZERO);
    }

    #[test]
    fn test_axis_of_penetration() {
        assert_eq!(Axis::of_penetration(Vec2::new(2.0, 10.0)), Axis::X);
        assert_eq!(Axis::of_penetration(Vec2::new(10.0, 2.0)), Axis::Y);
        assert_eq!(Axis::of_penetration(Vec2::new(3.0, 3.0)), Axis::Y);
    }

    #[test]
    fn test_miss_defaults() {
        let miss = TraceResult::default();
        assert!(!miss.hit);
        assert!(miss.hit_entity.is_none());
        assert!(miss.distance.is_infinite());
        assert_eq!(miss.side, CollisionSide::None);
    }
}
