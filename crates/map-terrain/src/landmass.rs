//! # Procedural Landmass
//!
//! Builds the default map background: one main body with bays and inlets,
//! lakes cut out of it, and a handful of offshore islands. Output depends only
//! on the seed string and the configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{LandmassConfig, LandmassParams};
use crate::geometry::{self, FillRule, Path};
use crate::rng::SeededRng;

/// Radial jitter of the base ellipse points, as a fraction of the radius.
const BASE_RADIUS_JITTER: f32 = 0.15;
/// Angular jitter of the base points, as a fraction of the angular step.
const BASE_ANGLE_JITTER: f32 = 0.3;
const BLOB_RADIUS_JITTER: f32 = 0.3;
const BLOB_ROUGHNESS: f32 = 0.3;

/// A filled region with optional holes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub outline: Vec<Vec2>,
    pub holes: Vec<Vec<Vec2>>,
}

impl Shape {
    /// Inside the outline and outside every hole.
    pub fn contains(&self, point: Vec2) -> bool {
        geometry::point_in_polygon(point, &self.outline)
            && !self
                .holes
                .iter()
                .any(|hole| geometry::point_in_polygon(point, hole))
    }

    /// Smoothed outline and holes as subpaths of one path.
    ///
    /// Fill with [`FillRule::EvenOdd`] so the holes are cut out.
    pub fn to_path(&self) -> Path {
        let mut path = Path::closed_spline(&self.outline);
        for hole in &self.holes {
            path.extend(Path::closed_spline(hole));
        }
        path
    }
}

/// Generated terrain for one seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmass {
    pub seed: String,
    pub params: LandmassParams,
    /// Main body; its holes are the lakes.
    pub coastline: Shape,
    pub islands: Vec<Shape>,
}

impl Landmass {
    /// Runs the generator. Pure: same seed and config, same output.
    pub fn generate(seed: &str, config: &LandmassConfig) -> Self {
        let mut rng = SeededRng::new(seed);
        let params = config.sample(&mut rng);
        let center = Vec2::splat(config.extent * 0.5);

        let mut outline = geometry::jittered_ring(
            center,
            Vec2::new(params.radius, params.radius * params.aspect),
            params.base_points,
            BASE_RADIUS_JITTER,
            BASE_ANGLE_JITTER,
            &mut rng,
        );
        for _ in 0..params.subdivisions {
            outline = geometry::subdivide(&outline, params.roughness, &mut rng);
        }

        let islands = place_blobs(
            &mut rng,
            &outline,
            center,
            config,
            &params,
            Placement::Offshore,
        );
        let lakes = place_blobs(
            &mut rng,
            &outline,
            center,
            config,
            &params,
            Placement::Inland,
        );

        tracing::debug!(
            seed,
            coastline_points = outline.len(),
            islands = islands.len(),
            lakes = lakes.len(),
            "Generated landmass"
        );

        Self {
            seed: seed.to_string(),
            params,
            coastline: Shape {
                outline,
                holes: lakes,
            },
            islands: islands
                .into_iter()
                .map(|outline| Shape {
                    outline,
                    holes: Vec::new(),
                })
                .collect(),
        }
    }

    /// Lake polygons (holes of the coastline).
    pub fn lakes(&self) -> &[Vec<Vec2>] {
        &self.coastline.holes
    }

    /// Fill rule the coastline path must be drawn with.
    pub fn fill_rule(&self) -> FillRule {
        FillRule::EvenOdd
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    /// Islands: candidate must be outside the coastline.
    Offshore,
    /// Lakes: candidate must be inside the coastline.
    Inland,
}

fn place_blobs(
    rng: &mut SeededRng,
    coastline: &[Vec2],
    center: Vec2,
    config: &LandmassConfig,
    params: &LandmassParams,
    placement: Placement,
) -> Vec<Vec<Vec2>> {
    let (count, scale) = match placement {
        Placement::Offshore => (params.island_count, params.island_scale),
        Placement::Inland => (params.lake_count, params.lake_scale),
    };

    let mut blobs = Vec::with_capacity(count);
    for index in 0..count {
        let blob_radius = params.radius * scale;
        let mut accepted = None;

        for _ in 0..config.max_attempts {
            let angle = rng.next_f32() * std::f32::consts::TAU;
            let distance = match placement {
                Placement::Offshore => params.island_distance * rng.range(0.85, 1.15),
                Placement::Inland => params.lake_distance * rng.next_f32(),
            } * params.radius;
            let candidate =
                center + Vec2::new(angle.cos(), angle.sin() * params.aspect) * distance;

            let margin = blob_radius * (1.0 + BLOB_RADIUS_JITTER);
            let in_bounds = candidate.x >= margin
                && candidate.y >= margin
                && candidate.x <= config.extent - margin
                && candidate.y <= config.extent - margin;
            let inside = geometry::point_in_polygon(candidate, coastline);
            let wanted = match placement {
                Placement::Offshore => !inside,
                Placement::Inland => inside,
            };

            if in_bounds && wanted {
                accepted = Some(candidate);
                break;
            }
        }

        match accepted {
            Some(at) => blobs.push(blob(rng, at, blob_radius)),
            None => tracing::debug!(?placement, index, "No valid position found, skipping"),
        }
    }
    blobs
}

/// Small irregular polygon around `center`.
fn blob(rng: &mut SeededRng, center: Vec2, radius: f32) -> Vec<Vec2> {
    let count = rng.range_usize(7, 10);
    let ring = geometry::jittered_ring(
        center,
        Vec2::splat(radius),
        count,
        BLOB_RADIUS_JITTER,
        BASE_ANGLE_JITTER,
        rng,
    );
    geometry::subdivide(&ring, BLOB_ROUGHNESS, rng)
}
