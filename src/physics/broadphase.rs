//! Broadphase collision detection using a spatial hash grid.

use std::collections::HashMap;

use glam::Vec2;
use tracing::debug;

use super::collider::{collect_colliders, collect_colliders_from, Aabb, ColliderEntry};

/// Packed cell coordinate.
pub type CellKey = u64;

/// Default cell edge length in world units.
pub const DEFAULT_CELL_SIZE: f32 = 100.0;

/// Fold integer cell coordinates into one key.
///
/// The two coordinates occupy the high and low 32 bits, so distinct cells never
/// share a bucket. The map's hasher spreads the keys.
#[inline]
pub fn hash_cell(x: i32, y: i32) -> CellKey {
    (u64::from(x as u32) << 32) | u64::from(y as u32)
}

/// Occupancy summary for debug overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridStats {
    pub total_cells: usize,
    pub total_entries: usize,
    pub max_entities_per_cell: usize,
    pub avg_entities_per_cell: f32,
}

/// Spatial hash grid over collider snapshots.
///
/// The grid is rebuilt from scratch on every build; there is no incremental
/// update. Buckets store indices into [`SpatialHashGrid::entries`].
#[derive(Debug)]
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<usize>>,
    entries: Vec<ColliderEntry>,
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialHashGrid {
    pub fn new() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE)
    }

    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Change bucket granularity. Takes effect on the next build.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        self.cell_size = cell_size;
    }

    /// Compute cell coordinates for a point.
    #[inline]
    pub fn cell_coords(&self, point: Vec2) -> (i32, i32) {
        let inv = 1.0 / self.cell_size;
        ((point.x * inv).floor() as i32, (point.y * inv).floor() as i32)
    }

    /// Rebuild from a set of snapshots. Each entry lands in every cell its box touches.
    pub fn build(&mut self, entries: Vec<ColliderEntry>) {
        self.cells.clear();
        self.entries = entries;

        for (slot, entry) in self.entries.iter().enumerate() {
            let (min_x, min_y) = self.cell_coords(entry.aabb.min);
            let (max_x, max_y) = self.cell_coords(entry.aabb.max);

            for cx in min_x..=max_x {
                for cy in min_y..=max_y {
                    self.cells.entry(hash_cell(cx, cy)).or_default().push(slot);
                }
            }
        }

        debug!(
            entries = self.entries.len(),
            cells = self.cells.len(),
            cell_size = self.cell_size,
            "spatial grid rebuilt"
        );
    }

    /// Rebuild from every collidable entity in the world.
    pub fn build_from_world(&mut self, world: &hecs::World) {
        self.build(collect_colliders(world));
    }

    /// Rebuild from an explicit entity list.
    pub fn build_from_entities(&mut self, world: &hecs::World, entities: &[hecs::Entity]) {
        self.build(collect_colliders_from(world, entities));
    }

    /// Snapshots from the last build, in input order.
    pub fn entries(&self) -> &[ColliderEntry] {
        &self.entries
    }

    /// Entry slots stored under `key`; empty when the cell is unoccupied.
    pub fn bucket(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate every occupied bucket.
    pub fn buckets(&self) -> impl Iterator<Item = (CellKey, &[usize])> {
        self.cells.iter().map(|(key, slots)| (*key, slots.as_slice()))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unique entry slots in all cells touched by `region`, ascending.
    pub fn query_region(&self, region: &Aabb) -> Vec<usize> {
        let (min_x, min_y) = self.cell_coords(region.min);
        let (max_x, max_y) = self.cell_coords(region.max);

        let mut slots = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                slots.extend_from_slice(self.bucket(hash_cell(cx, cy)));
            }
        }
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            total_cells: self.cells.len(),
            ..GridStats::default()
        };

        for slots in self.cells.values() {
            stats.total_entries += slots.len();
            stats.max_entities_per_cell = stats.max_entities_per_cell.max(slots.len());
        }

        if stats.total_cells > 0 {
            stats.avg_entities_per_cell = stats.total_entries as f32 / stats.total_cells as f32;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::Body;
    use crate::ecs::components::transform::Transform2d;

    fn spawn_box(world: &mut hecs::World, position: Vec2, size: Vec2) -> hecs::Entity {
        world.spawn((Transform2d::new(position, size), Body::new_dynamic()))
    }

    #[test]
    fn test_hash_cell_distinguishes_neighbours() {
        let mut keys = Vec::new();
        for x in -2..=2 {
            for y in -2..=2 {
                keys.push(hash_cell(x, y));
            }
        }
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 25);
    }

    #[test]
    fn test_cell_coords_floor_negative() {
        let grid = SpatialHashGrid::with_cell_size(10.0);
        assert_eq!(grid.cell_coords(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(grid.cell_coords(Vec2::new(9.99, 10.0)), (0, 1));
        assert_eq!(grid.cell_coords(Vec2::new(-0.1, -10.0)), (-1, -1));
        assert_eq!(grid.cell_coords(Vec2::new(-10.1, 25.0)), (-2, 2));
    }

    #[test]
    fn test_small_entity_occupies_one_cell() {
        let mut world = hecs::World::new();
        spawn_box(&mut world, Vec2::new(50.0, 50.0), Vec2::splat(10.0));

        let mut grid = SpatialHashGrid::new();
        grid.build_from_world(&world);

        assert_eq!(grid.cell_count(), 1);
        assert_eq!(grid.bucket(hash_cell(0, 0)), &[0]);
    }

    #[test]
    fn test_entity_spanning_cells_is_in_every_bucket() {
        let mut world = hecs::World::new();
        // Spans x in [90, 210], y in [-10, 10] -> cells x 0..=2, y -1..=0
        spawn_box(&mut world, Vec2::new(150.0, 0.0), Vec2::new(120.0, 20.0));

        let mut grid = SpatialHashGrid::new();
        grid.build_from_world(&world);

        assert_eq!(grid.cell_count(), 6);
        for cx in 0..=2 {
            for cy in -1..=0 {
                assert_eq!(grid.bucket(hash_cell(cx, cy)), &[0]);
            }
        }
        assert!(grid.bucket(hash_cell(3, 0)).is_empty());
    }

    #[test]
    fn test_rebuild_clears_stale_entries() {
        let mut world = hecs::World::new();
        let e = spawn_box(&mut world, Vec2::new(50.0, 50.0), Vec2::splat(10.0));

        let mut grid = SpatialHashGrid::new();
        grid.build_from_world(&world);
        assert_eq!(grid.bucket(hash_cell(0, 0)).len(), 1);

        world.get::<&mut Transform2d>(e).unwrap().position = Vec2::new(550.0, 50.0);
        grid.build_from_world(&world);

        assert!(grid.bucket(hash_cell(0, 0)).is_empty());
        assert_eq!(grid.bucket(hash_cell(5, 0)), &[0]);
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn test_set_cell_size_applies_to_next_build() {
        let mut world = hecs::World::new();
        spawn_box(&mut world, Vec2::new(50.0, 50.0), Vec2::splat(40.0));

        let mut grid = SpatialHashGrid::new();
        grid.build_from_world(&world);
        assert_eq!(grid.cell_count(), 1);

        grid.set_cell_size(25.0);
        assert_eq!(grid.cell_count(), 1);

        grid.build_from_world(&world);
        // [30, 70] with 25-unit cells spans cells 1..=2 on each axis
        assert_eq!(grid.cell_count(), 4);
    }

    #[test]
    fn test_build_from_entities_uses_only_listed() {
        let mut world = hecs::World::new();
        let a = spawn_box(&mut world, Vec2::ZERO, Vec2::splat(10.0));
        let _b = spawn_box(&mut world, Vec2::new(300.0, 0.0), Vec2::splat(10.0));

        let mut grid = SpatialHashGrid::new();
        grid.build_from_entities(&world, &[a]);
        assert_eq!(grid.entries().len(), 1);
        assert_eq!(grid.entries()[0].entity, a);
    }

    #[test]
    fn test_query_region_dedups() {
        let mut world = hecs::World::new();
        spawn_box(&mut world, Vec2::new(100.0, 100.0), Vec2::splat(50.0));
        spawn_box(&mut world, Vec2::new(900.0, 900.0), Vec2::splat(10.0));

        let mut grid = SpatialHashGrid::new();
        grid.build_from_world(&world);

        let region = Aabb::new(Vec2::ZERO, Vec2::splat(250.0));
        assert_eq!(grid.query_region(&region), vec![0]);
    }

    #[test]
    fn test_stats() {
        let mut world = hecs::World::new();
        spawn_box(&mut world, Vec2::new(10.0, 10.0), Vec2::splat(5.0));
        spawn_box(&mut world, Vec2::new(20.0, 20.0), Vec2::splat(5.0));
        spawn_box(&mut world, Vec2::new(150.0, 10.0), Vec2::splat(5.0));

        let mut grid = SpatialHashGrid::new();
        assert_eq!(grid.stats(), GridStats::default());

        grid.build_from_world(&world);
        let stats = grid.stats();
        assert_eq!(stats.total_cells, 2);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.max_entities_per_cell, 2);
        assert!((stats.avg_entities_per_cell - 1.5).abs() < 1e-6);
    }
}
