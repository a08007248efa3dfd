//! # Landmass Configuration
//!
//! The generator is configured with parameter *ranges*. Each range is sampled
//! once per seed, so two maps share a style while still looking different.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::rng::SeededRng;

/// An inclusive `[min, max]` parameter range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamRange<T> {
    pub min: T,
    pub max: T,
}

impl<T> ParamRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl ParamRange<f32> {
    pub fn sample(&self, rng: &mut SeededRng) -> f32 {
        rng.range(self.min, self.max)
    }

    fn check(&self, param: &'static str) -> Result<(), TerrainError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(TerrainError::InvalidParameter {
                param,
                reason: "bounds must be finite".to_string(),
            });
        }
        if self.min > self.max {
            return Err(TerrainError::InvalidRange {
                param,
                min: self.min as f64,
                max: self.max as f64,
            });
        }
        Ok(())
    }
}

impl ParamRange<usize> {
    pub fn sample(&self, rng: &mut SeededRng) -> usize {
        rng.range_usize(self.min, self.max)
    }

    fn check(&self, param: &'static str) -> Result<(), TerrainError> {
        if self.min > self.max {
            return Err(TerrainError::InvalidRange {
                param,
                min: self.min as f64,
                max: self.max as f64,
            });
        }
        Ok(())
    }
}

/// Parameter ranges for the procedural landmass.
///
/// Radii and distances are expressed as fractions of the main body's base
/// radius, which is `base_radius * scale` logical units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmassConfig {
    /// Side length of the square logical area the landmass is centered in.
    pub extent: f32,
    /// Radius of the main body before `scale` is applied (logical units).
    pub base_radius: f32,
    /// Number of points on the rough base ellipse.
    pub base_points: ParamRange<usize>,
    /// Midpoint-displacement passes over the coastline.
    pub subdivisions: ParamRange<usize>,
    /// Displacement as a fraction of edge length. Higher = more bays.
    pub roughness: ParamRange<f32>,
    /// Overall size multiplier for the main body.
    pub scale: ParamRange<f32>,
    /// Vertical-to-horizontal ratio of the base ellipse.
    pub aspect: ParamRange<f32>,
    pub island_count: ParamRange<usize>,
    /// Island blob radius, fraction of the main radius.
    pub island_scale: ParamRange<f32>,
    /// Island distance from center, fraction of the main radius.
    pub island_distance: ParamRange<f32>,
    pub lake_count: ParamRange<usize>,
    /// Lake blob radius, fraction of the main radius.
    pub lake_scale: ParamRange<f32>,
    /// Furthest a lake may sit from center, fraction of the main radius.
    pub lake_distance: ParamRange<f32>,
    /// Candidate positions tried per island/lake before it is skipped.
    pub max_attempts: u32,
}

impl Default for LandmassConfig {
    fn default() -> Self {
        Self {
            extent: 1000.0,
            base_radius: 300.0,
            base_points: ParamRange::new(10, 16),
            subdivisions: ParamRange::new(3, 4),
            roughness: ParamRange::new(0.35, 0.6),
            scale: ParamRange::new(0.85, 1.0),
            aspect: ParamRange::new(0.75, 0.95),
            island_count: ParamRange::new(1, 5),
            island_scale: ParamRange::new(0.06, 0.12),
            island_distance: ParamRange::new(1.2, 1.4),
            lake_count: ParamRange::new(1, 3),
            lake_scale: ParamRange::new(0.05, 0.09),
            lake_distance: ParamRange::new(0.2, 0.45),
            max_attempts: 24,
        }
    }
}

impl LandmassConfig {
    /// Checks that every range is ordered and every value is usable.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(self.extent > 0.0) {
            return Err(TerrainError::InvalidParameter {
                param: "extent",
                reason: format!("must be positive, got {}", self.extent),
            });
        }
        if !(self.base_radius > 0.0) || self.base_radius * 2.0 > self.extent {
            return Err(TerrainError::InvalidParameter {
                param: "base_radius",
                reason: format!(
                    "must be positive and fit inside the extent, got {}",
                    self.base_radius
                ),
            });
        }

        self.base_points.check("base_points")?;
        if self.base_points.min < 3 {
            return Err(TerrainError::InvalidParameter {
                param: "base_points",
                reason: "a coastline needs at least 3 points".to_string(),
            });
        }
        self.subdivisions.check("subdivisions")?;
        if self.subdivisions.max > 8 {
            return Err(TerrainError::InvalidParameter {
                param: "subdivisions",
                reason: "more than 8 passes produces an unbounded point count".to_string(),
            });
        }
        self.roughness.check("roughness")?;
        self.scale.check("scale")?;
        self.aspect.check("aspect")?;
        self.island_count.check("island_count")?;
        self.island_scale.check("island_scale")?;
        self.island_distance.check("island_distance")?;
        self.lake_count.check("lake_count")?;
        self.lake_scale.check("lake_scale")?;
        self.lake_distance.check("lake_distance")?;

        for (param, range) in [
            ("roughness", self.roughness),
            ("scale", self.scale),
            ("aspect", self.aspect),
            ("island_scale", self.island_scale),
            ("island_distance", self.island_distance),
            ("lake_scale", self.lake_scale),
            ("lake_distance", self.lake_distance),
        ] {
            if range.min < 0.0 {
                return Err(TerrainError::InvalidParameter {
                    param,
                    reason: format!("must not be negative, got {}", range.min),
                });
            }
        }
        Ok(())
    }

    /// Samples every range once, in a fixed order, to fix this seed's parameters.
    pub fn sample(&self, rng: &mut SeededRng) -> LandmassParams {
        let scale = self.scale.sample(rng);
        LandmassParams {
            base_points: self.base_points.sample(rng).max(3),
            subdivisions: self.subdivisions.sample(rng),
            roughness: self.roughness.sample(rng),
            radius: self.base_radius * scale,
            aspect: self.aspect.sample(rng),
            island_count: self.island_count.sample(rng),
            island_scale: self.island_scale.sample(rng),
            island_distance: self.island_distance.sample(rng),
            lake_count: self.lake_count.sample(rng),
            lake_scale: self.lake_scale.sample(rng),
            lake_distance: self.lake_distance.sample(rng),
        }
    }
}

/// Concrete parameters fixed for one seed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmassParams {
    pub base_points: usize,
    pub subdivisions: usize,
    pub roughness: f32,
    /// Main body radius in logical units.
    pub radius: f32,
    pub aspect: f32,
    pub island_count: usize,
    pub island_scale: f32,
    pub island_distance: f32,
    pub lake_count: usize,
    pub lake_scale: f32,
    pub lake_distance: f32,
}
