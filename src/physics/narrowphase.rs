//! Narrowphase overlap tests, penetration depth, side classification, and the
//! grid-accelerated and brute-force detection passes built on them.

use std::collections::HashSet;

use glam::Vec2;
use tracing::debug;

use super::broadphase::SpatialHashGrid;
use super::collider::{Aabb, ColliderEntry};
use super::contact::{Axis, CollisionPair, CollisionSide};

/// Strict AABB overlap. Symmetric in its arguments.
#[inline]
pub fn intersect(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}

/// Per-axis overlap extent of two boxes.
///
/// If either axis does not overlap the result is the zero vector.
#[inline]
pub fn penetration_depth(a: &Aabb, b: &Aabb) -> Vec2 {
    let overlap_x = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let overlap_y = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);
    if overlap_x < 0.0 || overlap_y < 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(overlap_x, overlap_y)
}

/// Face of A that touches B.
///
/// The separating axis is the one with the smaller penetration; on that axis the
/// entity centers decide the side. Equal centers resolve to `Left`/`Top`.
#[inline]
pub fn collision_side(position_a: Vec2, position_b: Vec2, penetration: Vec2) -> CollisionSide {
    match Axis::of_penetration(penetration) {
        Axis::X => {
            if position_a.x < position_b.x {
                CollisionSide::Right
            } else {
                CollisionSide::Left
            }
        }
        Axis::Y => {
            if position_a.y < position_b.y {
                CollisionSide::Bottom
            } else {
                CollisionSide::Top
            }
        }
    }
}

/// Full narrowphase for one candidate pair. `a` must precede `b` in input order.
pub fn test_pair(a: &ColliderEntry, b: &ColliderEntry) -> Option<CollisionPair> {
    if !intersect(&a.aabb, &b.aabb) {
        return None;
    }

    let penetration = penetration_depth(&a.aabb, &b.aabb);
    let side_a = collision_side(a.position, b.position, penetration);

    Some(CollisionPair {
        entity_a: a.entity,
        entity_b: b.entity,
        index_a: a.index,
        index_b: b.index,
        static_a: a.is_static,
        static_b: b.is_static,
        penetration,
        side_a,
        side_b: side_a.opposite(),
    })
}

/// Find every overlapping pair using the grid's buckets.
///
/// Each unordered pair is tested at most once even when the two entities share
/// several cells. Output is sorted by `(index_a, index_b)`.
pub fn detect_pairs(grid: &SpatialHashGrid) -> Vec<CollisionPair> {
    let entries = grid.entries();
    let mut pairs = Vec::new();
    let mut tested: HashSet<(usize, usize)> = HashSet::new();

    for (_, bucket) in grid.buckets() {
        for i in 0..bucket.len() {
            for j in (i + 1)..bucket.len() {
                // Buckets are filled in input order, so slot i < slot j.
                let (slot_a, slot_b) = (bucket[i], bucket[j]);
                if !tested.insert((slot_a, slot_b)) {
                    continue;
                }

                if let Some(pair) = test_pair(&entries[slot_a], &entries[slot_b]) {
                    pairs.push(pair);
                }
            }
        }
    }

    pairs.sort_unstable_by_key(|p| (p.index_a, p.index_b));

    debug!(
        candidates = tested.len(),
        overlaps = pairs.len(),
        "grid detection pass"
    );
    pairs
}

/// O(n^2) reference detection over every entry pair.
///
/// Produces the same sequence as [`detect_pairs`] for the same input.
pub fn detect_pairs_brute_force(entries: &[ColliderEntry]) -> Vec<CollisionPair> {
    let mut pairs = Vec::new();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            if let Some(pair) = test_pair(&entries[i], &entries[j]) {
                pairs.push(pair);
            }
        }
    }
    pairs
}
