//! # Polygon & Path Geometry
//!
//! Small helpers shared by the generator and the canvas: ray-casting
//! containment, fractal subdivision and closed Catmull-Rom smoothing.

use std::fmt::Write;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rng::SeededRng;

/// How overlapping subpaths of one path are filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRule {
    /// Every other nested subpath is a hole. Used for coastlines with lakes.
    #[default]
    EvenOdd,
    NonZero,
}

/// One drawing instruction of a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    Close,
}

/// A vector path made of one or more subpaths.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// Straight-edged closed polygon.
    pub fn polygon(points: &[Vec2]) -> Self {
        let mut segments = Vec::with_capacity(points.len() + 1);
        for (i, &p) in points.iter().enumerate() {
            segments.push(if i == 0 {
                PathSegment::MoveTo(p)
            } else {
                PathSegment::LineTo(p)
            });
        }
        if !points.is_empty() {
            segments.push(PathSegment::Close);
        }
        Self { segments }
    }

    /// Closed Catmull-Rom spline through every point, as cubic Béziers.
    ///
    /// Falls back to a polygon for fewer than 3 points.
    pub fn closed_spline(points: &[Vec2]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::polygon(points);
        }

        let mut segments = Vec::with_capacity(n + 2);
        segments.push(PathSegment::MoveTo(points[0]));
        for i in 0..n {
            let p0 = points[(i + n - 1) % n];
            let p1 = points[i];
            let p2 = points[(i + 1) % n];
            let p3 = points[(i + 2) % n];
            segments.push(PathSegment::CubicTo {
                ctrl1: p1 + (p2 - p0) / 6.0,
                ctrl2: p2 - (p3 - p1) / 6.0,
                to: p2,
            });
        }
        segments.push(PathSegment::Close);
        Self { segments }
    }

    /// Appends all subpaths of `other`.
    pub fn extend(&mut self, other: Path) {
        self.segments.extend(other.segments);
    }

    /// Returns a copy with every coordinate passed through `f`.
    pub fn map_points(&self, f: impl Fn(Vec2) -> Vec2) -> Self {
        let segments = self
            .segments
            .iter()
            .map(|seg| match *seg {
                PathSegment::MoveTo(p) => PathSegment::MoveTo(f(p)),
                PathSegment::LineTo(p) => PathSegment::LineTo(f(p)),
                PathSegment::CubicTo { ctrl1, ctrl2, to } => PathSegment::CubicTo {
                    ctrl1: f(ctrl1),
                    ctrl2: f(ctrl2),
                    to: f(to),
                },
                PathSegment::Close => PathSegment::Close,
            })
            .collect();
        Self { segments }
    }

    /// SVG `d` attribute with two fixed decimals, stable for a given path.
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            if !out.is_empty() {
                out.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match seg {
                PathSegment::MoveTo(p) => write!(out, "M{:.2},{:.2}", p.x, p.y),
                PathSegment::LineTo(p) => write!(out, "L{:.2},{:.2}", p.x, p.y),
                PathSegment::CubicTo { ctrl1, ctrl2, to } => write!(
                    out,
                    "C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                    ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
                ),
                PathSegment::Close => write!(out, "Z"),
            };
        }
        out
    }
}

/// Even-odd ray casting test. Points exactly on an edge may go either way.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// One pass of midpoint displacement over a closed ring.
///
/// Each edge gains a midpoint pushed along the edge normal by up to
/// `roughness / 2` of the edge length, in either direction.
pub fn subdivide(points: &[Vec2], roughness: f32, rng: &mut SeededRng) -> Vec<Vec2> {
    let n = points.len();
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        out.push(a);

        let offset = (rng.next_f32() - 0.5) * roughness;
        let edge = b - a;
        let len = edge.length();
        if len <= f32::EPSILON {
            continue;
        }
        let normal = Vec2::new(-edge.y, edge.x) / len;
        out.push((a + b) * 0.5 + normal * offset * len);
    }
    out
}

/// Ring of `count` points around `center` with radius and angle jitter.
pub fn jittered_ring(
    center: Vec2,
    radii: Vec2,
    count: usize,
    radius_jitter: f32,
    angle_jitter: f32,
    rng: &mut SeededRng,
) -> Vec<Vec2> {
    let step = std::f32::consts::TAU / count as f32;
    (0..count)
        .map(|i| {
            let angle = step * i as f32 + rng.jitter(angle_jitter * step);
            let r = 1.0 + rng.jitter(radius_jitter);
            center + Vec2::new(angle.cos() * radii.x, angle.sin() * radii.y) * r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = square();
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &sq));
        assert!(!point_in_polygon(Vec2::new(5.0, -1.0), &sq));
        assert!(!point_in_polygon(Vec2::new(5.0, 5.0), &sq[..2]));
    }

    #[test]
    fn test_subdivide_doubles_points() {
        let mut rng = SeededRng::new("subdivide");
        let out = subdivide(&square(), 0.5, &mut rng);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], Vec2::new(0.0, 0.0));
        assert_eq!(out[2], Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_spline_passes_through_points() {
        let sq = square();
        let path = Path::closed_spline(&sq);
        assert_eq!(path.segments.len(), sq.len() + 2);
        assert_eq!(path.segments[0], PathSegment::MoveTo(sq[0]));
        match path.segments[1] {
            PathSegment::CubicTo { to, .. } => assert_eq!(to, sq[1]),
            other => panic!("expected cubic, got {:?}", other),
        }
        assert_eq!(path.segments.last(), Some(&PathSegment::Close));
    }

    #[test]
    fn test_svg_output() {
        let path = Path::polygon(&[Vec2::new(0.0, 0.0), Vec2::new(1.5, 2.0), Vec2::new(3.0, 0.0)]);
        assert_eq!(path.to_svg_path(), "M0.00,0.00 L1.50,2.00 L3.00,0.00 Z");
    }
}
