//! 2D camera
//!
//! Maps between world and screen coordinates. The camera's `position` is the
//! world point shown at the viewport center.

use glam::Vec2;

/// Orthographic 2D camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2d {
    /// World point at the center of the screen.
    pub position: Vec2,
    /// Screen pixels per world unit.
    pub zoom: f32,
    /// Screen size in pixels.
    pub viewport: Vec2,
}

impl Default for Camera2d {
    fn default() -> Self {
        Self::new(Vec2::new(1280.0, 720.0))
    }
}

impl Camera2d {
    /// Camera at the origin with unit zoom.
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport,
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    #[inline]
    fn screen_center(&self) -> Vec2 {
        self.viewport * 0.5
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom + self.screen_center()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.screen_center()) / self.zoom + self.position
    }

    /// On-screen length of `length` world units.
    pub fn scale_on_screen(&self, length: f32) -> f32 {
        self.zoom * length
    }

    /// Ease toward `target`, covering `rate * dt` of the remaining distance (at most all of it).
    pub fn follow(&mut self, target: Vec2, rate: f32, dt: f32) {
        let t = (rate * dt).clamp(0.0, 1.0);
        self.position = self.position.lerp(target, t);
    }
}
