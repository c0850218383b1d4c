//! 2D collision core: spatial hashing, overlap detection, positional
//! resolution and line/hull traces.
//!
//! # Architecture
//!
//! One simulation step runs:
//!
//! 1. Rebuild the spatial hash grid from the world (snapshot of every
//!    `Transform2d` + `Body` entity)
//! 2. Detect overlapping pairs from co-resident grid buckets
//! 3. Resolve pairs by pushing entities apart on the separating axis
//! 4. Movement code issues line/hull traces against the grid
//!
//! The grid is rebuilt from scratch on every build. Queries that take an
//! explicit entity list rebuild it first, so a caller should pick either the
//! world-wide grid or per-query lists for a given frame.

pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod mover;
pub mod narrowphase;
pub mod solver;
pub mod trace;

use glam::Vec2;
use thiserror::Error;
use tracing::warn;

use self::broadphase::{GridStats, SpatialHashGrid, DEFAULT_CELL_SIZE};
use self::collider::collect_colliders;
use self::contact::{CollisionPair, TraceResult};
use self::solver::ResolveStats;

/// Invalid collision configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f32),
}

/// Configuration for the collision system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConfig {
    /// Edge length of one grid cell in world units. Default: 100.
    pub cell_size: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl CollisionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid cell size.
    pub fn cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Reject non-finite or non-positive cell sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size.is_finite() && self.cell_size > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidCellSize(self.cell_size))
        }
    }
}

/// Collision queries over a `hecs::World`.
///
/// Owns the spatial grid; holds no entities. Several independent systems can
/// coexist in one process.
#[derive(Debug)]
pub struct CollisionSystem {
    config: CollisionConfig,
    grid: SpatialHashGrid,
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self {
            config: CollisionConfig::default(),
            grid: SpatialHashGrid::new(),
        }
    }
}

impl CollisionSystem {
    /// Create a collision system, validating the configuration.
    pub fn new(config: CollisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            grid: SpatialHashGrid::with_cell_size(config.cell_size),
        })
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    pub fn cell_size(&self) -> f32 {
        self.config.cell_size
    }

    /// Change the cell size used by subsequent builds.
    ///
    /// The current buckets are left as they are until the next build.
    pub fn set_cell_size(&mut self, cell_size: f32) -> Result<(), ConfigError> {
        let config = self.config.cell_size(cell_size);
        if let Err(err) = config.validate() {
            warn!(cell_size, "rejected cell size");
            return Err(err);
        }
        self.config = config;
        self.grid.set_cell_size(cell_size);
        Ok(())
    }

    /// The grid as of the most recent build.
    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    pub fn build_from_world(&mut self, world: &hecs::World) {
        self.grid.build_from_world(world);
    }

    pub fn build_from_entities(&mut self, world: &hecs::World, entities: &[hecs::Entity]) {
        self.grid.build_from_entities(world, entities);
    }

    /// Rebuild from the whole world and return every overlapping pair.
    pub fn detect_overlaps(&mut self, world: &hecs::World) -> Vec<CollisionPair> {
        self.grid.build_from_world(world);
        narrowphase::detect_pairs(&self.grid)
    }

    /// Rebuild from `entities` and return every overlapping pair among them.
    pub fn detect_overlaps_in(
        &mut self,
        world: &hecs::World,
        entities: &[hecs::Entity],
    ) -> Vec<CollisionPair> {
        self.grid.build_from_entities(world, entities);
        narrowphase::detect_pairs(&self.grid)
    }

    /// Reference detection without the grid. Leaves the grid untouched.
    pub fn detect_overlaps_brute_force(&self, world: &hecs::World) -> Vec<CollisionPair> {
        narrowphase::detect_pairs_brute_force(&collect_colliders(world))
    }

    /// Push overlapping pairs apart. See [`solver::resolve_pairs`].
    pub fn resolve(&self, world: &mut hecs::World, pairs: &[CollisionPair]) -> ResolveStats {
        solver::resolve_pairs(world, pairs)
    }

    /// Line trace against the current grid.
    pub fn trace_line(&self, start: Vec2, end: Vec2, ignore: Option<hecs::Entity>) -> TraceResult {
        trace::trace_line(&self.grid, start, end, ignore)
    }

    /// Rebuild from `entities`, then line trace.
    pub fn trace_line_in(
        &mut self,
        world: &hecs::World,
        entities: &[hecs::Entity],
        start: Vec2,
        end: Vec2,
        ignore: Option<hecs::Entity>,
    ) -> TraceResult {
        self.grid.build_from_entities(world, entities);
        self.trace_line(start, end, ignore)
    }

    /// Hull trace against the current grid.
    pub fn trace_hull(
        &self,
        start: Vec2,
        end: Vec2,
        hull_size: Vec2,
        ignore: Option<hecs::Entity>,
    ) -> TraceResult {
        trace::trace_hull(&self.grid, start, end, hull_size, ignore)
    }

    /// Rebuild from `entities`, then hull trace.
    pub fn trace_hull_in(
        &mut self,
        world: &hecs::World,
        entities: &[hecs::Entity],
        start: Vec2,
        end: Vec2,
        hull_size: Vec2,
        ignore: Option<hecs::Entity>,
    ) -> TraceResult {
        self.grid.build_from_entities(world, entities);
        self.trace_hull(start, end, hull_size, ignore)
    }

    pub fn grid_stats(&self) -> GridStats {
        self.grid.stats()
    }
}
