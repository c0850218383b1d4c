//! Small vector helpers on top of glam.

use glam::Vec2;

/// Length below which [`normalize_or_self`] leaves a vector untouched.
pub const NORMALIZE_EPSILON: f32 = 1e-4;

/// Normalize `v`, or return it unchanged when it is too short to have a direction.
///
/// Unlike [`Vec2::normalize_or_zero`], tiny inputs pass through as-is.
#[inline]
pub fn normalize_or_self(v: Vec2) -> Vec2 {
    let length = v.length();
    if length > NORMALIZE_EPSILON {
        v / length
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_or_self() {
        let n = normalize_or_self(Vec2::new(3.0, 4.0));
        assert!((n - Vec2::new(0.6, 0.8)).length() < 1e-6);

        assert_eq!(normalize_or_self(Vec2::new(-0.25, 0.0)), Vec2::new(-1.0, 0.0));

        let tiny = Vec2::new(5e-5, 0.0);
        assert_eq!(normalize_or_self(tiny), tiny);
        assert_eq!(normalize_or_self(Vec2::ZERO), Vec2::ZERO);
    }
}
