//! # View Transform
//!
//! This module handles the pan/zoom mathematics.
//! It provides utilities to transform between Logical Space (the fixed 1000×1000 map area)
//! and Screen Space (the pixels of the host surface).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::coords::LOGICAL_EXTENT;
use crate::math::Rect;

/// Represents the current camera state: where we are looking (Pan) and how close (Zoom).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The translation offset of the content, in screen pixels.
    /// A positive value moves the content right/down.
    pub pan: Vec2,
    /// The uniform scale factor.
    /// - 1.0 = one logical unit per pixel.
    /// - Greater than 1.0 = Zoomed In.
    /// - Less than 1.0 = Zoomed Out.
    pub zoom: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        zoom: 1.0,
    };

    /// Formula: `Screen = (Logical * Zoom) + Pan`
    pub fn apply(&self, logical: Vec2) -> Vec2 {
        (logical * self.zoom) + self.pan
    }

    /// Formula: `Logical = (Screen - Pan) / Zoom`
    pub fn invert(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.zoom
    }
}

/// The View struct combines the Transform with the actual Viewport size (window size).
/// It serves as the single source of truth for coordinate conversions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    /// The camera transform.
    pub transform: Transform,
    /// The size of the visible area in pixels.
    pub viewport_size: Vec2,
}

impl View {
    pub fn new(transform: Transform, viewport_size: Vec2) -> Self {
        Self {
            transform,
            viewport_size,
        }
    }

    pub fn logical_to_screen(&self, logical: Vec2) -> Vec2 {
        self.transform.apply(logical)
    }

    pub fn screen_to_logical(&self, screen: Vec2) -> Vec2 {
        self.transform.invert(screen)
    }

    /// Screen-space rectangle covered by the logical content area.
    pub fn content_on_screen(&self) -> Rect {
        Rect {
            min: self.logical_to_screen(Vec2::ZERO),
            max: self.logical_to_screen(Vec2::splat(LOGICAL_EXTENT)),
        }
    }
}
