//! Line and swept-box queries against the spatial grid.
//!
//! Both queries share one slab test. A hull trace is a line trace against
//! obstacles grown by the hull's half extents.

use glam::Vec2;

use super::broadphase::SpatialHashGrid;
use super::collider::Aabb;
use super::contact::{CollisionSide, TraceResult};

/// Segments shorter than this never hit anything.
pub const MIN_TRACE_LENGTH: f32 = 0.001;

/// Direction components at or below this are treated as parallel to the axis.
pub const PARALLEL_EPSILON: f32 = 0.0001;

/// Parametric entry into a box.
#[derive(Debug, Clone, Copy)]
struct SlabHit {
    t: f32,
    /// Entry time per axis; `-inf` on an axis the segment runs parallel to.
    enter: Vec2,
}

/// Segment `start + dir * t`, `t` in `[0, 1]`, against `aabb`.
fn slab_test(start: Vec2, dir: Vec2, aabb: &Aabb) -> Option<SlabHit> {
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;
    let mut enter = Vec2::splat(f32::NEG_INFINITY);

    for axis in 0..2 {
        let d = dir[axis];
        if d.abs() > PARALLEL_EPSILON {
            let t1 = (aabb.min[axis] - start[axis]) / d;
            let t2 = (aabb.max[axis] - start[axis]) / d;
            let near = t1.min(t2);
            enter[axis] = near;
            t_min = t_min.max(near);
            t_max = t_max.min(t1.max(t2));
        } else if start[axis] < aabb.min[axis] || start[axis] > aabb.max[axis] {
            return None;
        }
    }

    if t_min <= t_max && (0.0..=1.0).contains(&t_min) {
        Some(SlabHit { t: t_min, enter })
    } else {
        None
    }
}

/// Nearest edge of `aabb` to a point on its boundary. Ties go Top, Bottom, Left, Right.
fn closest_edge(point: Vec2, aabb: &Aabb) -> CollisionSide {
    let local = point - aabb.center();
    let half = aabb.half_extents();

    let edges = [
        (CollisionSide::Top, (local.y + half.y).abs()),
        (CollisionSide::Bottom, (local.y - half.y).abs()),
        (CollisionSide::Left, (local.x + half.x).abs()),
        (CollisionSide::Right, (local.x - half.x).abs()),
    ];

    let mut best = edges[0];
    for edge in &edges[1..] {
        if edge.1 < best.1 {
            best = *edge;
        }
    }
    best.0
}

/// Face struck by a sweep: the axis entered last, facing against the motion.
fn swept_side(enter: Vec2, dir: Vec2) -> CollisionSide {
    if enter.x > enter.y {
        if dir.x > 0.0 {
            CollisionSide::Left
        } else {
            CollisionSide::Right
        }
    } else if dir.y > 0.0 {
        CollisionSide::Top
    } else {
        CollisionSide::Bottom
    }
}

/// Cast a zero-thickness ray from `start` to `end` and report the first box it enters.
///
/// Points are sampled every half cell along the segment. Candidates come from
/// every cell under the bounding box of each pair of consecutive samples, so a
/// corner crossed between samples is still searched.
pub fn trace_line(
    grid: &SpatialHashGrid,
    start: Vec2,
    end: Vec2,
    ignore: Option<hecs::Entity>,
) -> TraceResult {
    let mut result = TraceResult::miss();

    let dir = end - start;
    let length = dir.length();
    if length < MIN_TRACE_LENGTH || grid.is_empty() {
        return result;
    }

    let unit = dir / length;
    let step = grid.cell_size() * 0.5;
    let num_steps = (length / step) as i32 + 1;

    let mut candidates = Vec::new();
    let mut prev = start;
    for i in 1..=num_steps {
        let t = (i as f32 * step).min(length);
        let point = start + unit * t;
        candidates.extend(grid.query_region(&Aabb::new(prev.min(point), prev.max(point))));
        prev = point;
    }
    candidates.sort_unstable();
    candidates.dedup();

    for slot in candidates {
        let entry = &grid.entries()[slot];
        if Some(entry.entity) == ignore {
            continue;
        }

        let Some(hit) = slab_test(start, dir, &entry.aabb) else {
            continue;
        };

        let distance = hit.t * length;
        if distance < result.distance {
            let hit_point = start + dir * hit.t;
            let side = closest_edge(hit_point, &entry.aabb);
            result = TraceResult {
                hit: true,
                hit_entity: Some(entry.entity),
                hit_point,
                hit_normal: side.normal(),
                distance,
                fraction: hit.t,
                side,
            };
        }
    }

    result
}

/// Sweep a box of `hull_size` with its center moving from `start` to `end`.
///
/// `hit_point` is the hull center at first contact. Candidates are the entries
/// in every cell under the swept bounding box.
pub fn trace_hull(
    grid: &SpatialHashGrid,
    start: Vec2,
    end: Vec2,
    hull_size: Vec2,
    ignore: Option<hecs::Entity>,
) -> TraceResult {
    let mut result = TraceResult::miss();

    let dir = end - start;
    let length = dir.length();
    if length < MIN_TRACE_LENGTH || grid.is_empty() {
        return result;
    }

    let half = hull_size * 0.5;
    let swept = Aabb::from_center_half_extents(start, half)
        .union(&Aabb::from_center_half_extents(end, half));

    for slot in grid.query_region(&swept) {
        let entry = &grid.entries()[slot];
        if Some(entry.entity) == ignore {
            continue;
        }

        let Some(hit) = slab_test(start, dir, &entry.aabb.expanded(half)) else {
            continue;
        };

        let distance = hit.t * length;
        if distance < result.distance {
            let side = swept_side(hit.enter, dir);
            result = TraceResult {
                hit: true,
                hit_entity: Some(entry.entity),
                hit_point: start + dir * hit.t,
                hit_normal: side.normal(),
                distance,
                fraction: hit.t,
                side,
            };
        }
    }

    result
}
