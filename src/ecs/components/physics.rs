//! Physics components for ECS entities.

use glam::Vec2;

/// Collision body component.
///
/// Static bodies are never moved by overlap resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub is_static: bool,
}

impl Body {
    /// Create an immovable body.
    pub fn new_static() -> Self {
        Self { is_static: true }
    }

    /// Create a body that resolution may push around.
    pub fn new_dynamic() -> Self {
        Self { is_static: false }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new_static()
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// Entity kind tag, fixed at spawn time.
///
/// Per-kind behavior is looked up from this tag instead of inspecting the
/// entity's concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Level geometry. Never processed.
    Solid,
    /// Free-moving box that drifts by its [`Velocity`].
    Prop,
    /// Input-driven character using the mover.
    Player,
}

impl EntityKind {
    pub const COUNT: usize = 3;

    /// All kinds, in dispatch table order.
    pub const ALL: [EntityKind; Self::COUNT] =
        [EntityKind::Solid, EntityKind::Prop, EntityKind::Player];

    /// Stable index into per-kind tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            EntityKind::Solid => 0,
            EntityKind::Prop => 1,
            EntityKind::Player => 2,
        }
    }
}
