//! # Coordinate Space
//!
//! Entities are stored in normalized space (`0..=100` on each axis). The
//! renderer draws into a fixed logical space (`0..=1000`), which the view
//! transform then maps to screen pixels.

use glam::Vec2;

use crate::math::Rect;
use crate::view::Transform;

pub const NORMALIZED_EXTENT: f32 = 100.0;
pub const LOGICAL_EXTENT: f32 = 1000.0;
/// Logical units per normalized unit.
pub const RENDER_SCALE: f32 = LOGICAL_EXTENT / NORMALIZED_EXTENT;

/// Normalized → logical.
pub fn to_render(normalized: Vec2) -> Vec2 {
    normalized * RENDER_SCALE
}

/// Logical → normalized.
pub fn to_normalized(logical: Vec2) -> Vec2 {
    logical / RENDER_SCALE
}

pub fn clamp_normalized(p: Vec2) -> Vec2 {
    p.clamp(Vec2::ZERO, Vec2::splat(NORMALIZED_EXTENT))
}

pub fn clamp_logical(p: Vec2) -> Vec2 {
    p.clamp(Vec2::ZERO, Vec2::splat(LOGICAL_EXTENT))
}

/// The full logical content area.
pub fn logical_bounds() -> Rect {
    Rect {
        min: Vec2::ZERO,
        max: Vec2::splat(LOGICAL_EXTENT),
    }
}

/// Maps a raw pointer position back into logical space.
///
/// `surface_scale` is the ratio between the surface's backing resolution and
/// its layout size (e.g. 2.0 for a 2× export capture). Pointer positions in
/// backing pixels are divided by it before the view transform is inverted.
/// Call this per event; the transform may change between events.
pub fn screen_to_logical(screen: Vec2, transform: &Transform, surface_scale: f32) -> Vec2 {
    let layout = if surface_scale > 0.0 {
        screen / surface_scale
    } else {
        screen
    };
    transform.invert(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_logical_accounts_for_surface_scale() {
        let transform = Transform {
            pan: Vec2::new(100.0, 50.0),
            zoom: 2.0,
        };
        let at_1x = screen_to_logical(Vec2::new(300.0, 250.0), &transform, 1.0);
        let at_2x = screen_to_logical(Vec2::new(600.0, 500.0), &transform, 2.0);
        assert_eq!(at_1x, Vec2::new(100.0, 100.0));
        assert_eq!(at_1x, at_2x);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(
            clamp_normalized(Vec2::new(-3.0, 140.0)),
            Vec2::new(0.0, 100.0)
        );
        assert_eq!(
            clamp_logical(Vec2::new(1200.0, 20.0)),
            Vec2::new(1000.0, 20.0)
        );
    }
}
