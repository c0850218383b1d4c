//! Sprig 2D Runtime
//!
//! Collision core and kinematic movement for 2D games, built on glam and hecs.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Vector helpers on top of `glam::Vec2`
//! 2. **ecs** - hecs components (transform, body, velocity, entity kind)
//! 3. **physics** - Spatial hash broadphase, overlap detection, positional
//!    resolution, line/hull traces and the character mover
//! 4. **camera** - World/screen mapping and follow easing
//! 5. **scene** - Session object owning the world and running the fixed step
//!    (feature = "scene")

pub mod camera;
pub mod ecs;
pub mod math;
pub mod physics;

#[cfg(feature = "scene")]
pub mod scene;

// Re-export commonly used types
pub use camera::Camera2d;

pub use ecs::prelude::*;

pub use physics::broadphase::{GridStats, SpatialHashGrid};
pub use physics::collider::{Aabb, ColliderEntry};
pub use physics::contact::{Axis, CollisionPair, CollisionSide, TraceResult};
pub use physics::mover::{step_mover, MoveInput, MoveOutcome, Mover, MoverConfig};
pub use physics::solver::ResolveStats;
pub use physics::{CollisionConfig, CollisionSystem, ConfigError};

#[cfg(feature = "scene")]
pub use scene::{FrameInput, Scene, SceneConfig, SceneError, StepReport};

// Re-export glam and hecs for convenience
pub use glam;
pub use hecs;
