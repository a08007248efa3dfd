//! # Rendering System
//!
//! Instead of drawing directly, the Canvas outputs a display list of `DrawCommand`s.
//! The host application (SVG, Canvas2D, WGPU, a screenshot pipeline) interprets
//! these commands and draws pixels.

use glam::{Vec2, Vec4};
use map_terrain::{FillRule, Path};
use serde::{Deserialize, Serialize};

/// Horizontal alignment of a text command relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

/// A single drawing primitive.
///
/// Coordinates and sizes are in **Screen Space** (Pixels).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// A filled rectangle with an optional stroke.
    Rect {
        /// Top-left position in screen pixels.
        pos: Vec2,
        /// Size in screen pixels.
        size: Vec2,
        /// Fill color (RGBA, 0.0 - 1.0).
        color: Vec4,
        /// Width of the border stroke in pixels.
        stroke_width: f32,
        /// Color of the border stroke.
        stroke_color: Option<Vec4>,
    },
    /// An external image stretched over a rectangle.
    Image {
        href: String,
        pos: Vec2,
        size: Vec2,
    },
    /// A vector path, possibly with holes.
    Path {
        path: Path,
        fill: Option<Vec4>,
        stroke: Option<Vec4>,
        stroke_width: f32,
        fill_rule: FillRule,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Option<Vec4>,
        stroke: Option<Vec4>,
        stroke_width: f32,
    },
    /// A quadratic Bezier curve, used for relationships.
    QuadCurve {
        start: Vec2,
        ctrl: Vec2,
        end: Vec2,
        /// Curve color; alpha already includes the opacity rule.
        color: Vec4,
        width: f32,
        dashed: bool,
    },
    /// Text to be rendered.
    Text {
        /// Anchor position in screen pixels (baseline).
        pos: Vec2,
        text: String,
        color: Vec4,
        /// Font size in pixels.
        size: f32,
        /// Font family; `None` uses the host default.
        font: Option<String>,
        anchor: TextAnchor,
    },
}

/// A list of draw commands representing the current frame.
pub type RenderList = Vec<DrawCommand>;
