use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Perpendicular offset of the default control point, as a fraction of the chord length.
pub const DEFAULT_CURVE_BEND: f32 = 0.15;
/// Polyline resolution used when measuring distance to a curve.
const CURVE_SAMPLES: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn from_center(center: Vec2, half_size: Vec2) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Control point used for a relationship without an explicit one.
///
/// The chord midpoint pushed along the perpendicular of `from → to` by 15% of
/// the chord length. A pure function of the endpoints; swapping them bends
/// the curve to the other side.
pub fn default_control_point(from: Vec2, to: Vec2) -> Vec2 {
    let mid = (from + to) * 0.5;
    let d = to - from;
    mid + Vec2::new(-d.y, d.x) * DEFAULT_CURVE_BEND
}

/// Point on the quadratic Bézier `start → ctrl → end` at `t ∈ [0, 1]`.
pub fn quad_point(start: Vec2, ctrl: Vec2, end: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    start * (u * u) + ctrl * (2.0 * u * t) + end * (t * t)
}

/// Shortest distance from `p` to the segment `a → b`.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Approximate distance from `p` to a quadratic Bézier, via a sampled polyline.
pub fn distance_to_quad(p: Vec2, start: Vec2, ctrl: Vec2, end: Vec2) -> f32 {
    let mut best = f32::INFINITY;
    let mut prev = start;
    for i in 1..=CURVE_SAMPLES {
        let next = quad_point(start, ctrl, end, i as f32 / CURVE_SAMPLES as f32);
        best = best.min(distance_to_segment(p, prev, next));
        prev = next;
    }
    best
}
