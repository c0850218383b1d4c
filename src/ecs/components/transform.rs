//! Transform component for 2D entities.

use glam::Vec2;

/// World placement of an entity.
///
/// `position` is the center of the entity's box in world units. `size` is the
/// untransformed width/height and `scale` a uniform multiplier applied to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2d {
    pub position: Vec2,
    pub size: Vec2,
    pub scale: f32,
}

impl Transform2d {
    /// Create a transform with unit scale.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            scale: 1.0,
        }
    }

    /// Set the uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Size after applying scale.
    #[inline]
    pub fn scaled_size(&self) -> Vec2 {
        self.size * self.scale
    }

    /// Half of the scaled size.
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.scaled_size() * 0.5
    }
}

impl Default for Transform2d {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ZERO)
    }
}
