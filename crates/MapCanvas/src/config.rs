//! # Configuration
//!
//! This module defines the configuration struct for the Canvas.
//! Every field has a default, so hosts can load partial JSON documents.

use std::collections::HashMap;

use glam::Vec4;
use map_terrain::LandmassConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::Category;

/// Zoom limits a config may not widen.
pub const ZOOM_BOUNDS: (f32, f32) = (0.5, 5.0);

/// Configuration parameters for the Canvas.
///
/// Thresholds are in logical units (pixels at zoom 1.0). Hit radii for
/// relationships are screen pixels and stay the same size at any zoom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Zoom change per wheel unit. Default: 0.002.
    pub zoom_speed: f32,
    /// Lower zoom bound, no lower than 0.5. Default: 0.5.
    pub min_zoom: f32,
    /// Upper zoom bound, no higher than 5.0. Default: 5.0.
    pub max_zoom: f32,
    /// How far the view may pan past the content edges. Default: 50.0.
    pub pan_padding: f32,
    /// Margin left around the content by `fit_to_content`, as a fraction. Default: 0.05.
    pub fit_padding: f32,
    /// Squared pointer travel below which a drag counts as a click.
    ///
    /// Shared by entity drags and curve edits. Default: 5.0.
    pub movement_threshold_sq: f32,
    /// Search radius in screen pixels for the relationship target on release,
    /// before `marker_scale`. Default: 24.0.
    pub link_hit_radius: f32,
    /// Width in screen pixels of the invisible stroke used to hit-test
    /// relationship curves. Default: 16.0.
    pub curve_hit_width: f32,
    /// Visual styling configuration.
    pub style: CanvasStyle,
    /// Procedural background used when no image is supplied.
    pub landmass: LandmassConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            zoom_speed: 0.002,
            min_zoom: 0.5,
            max_zoom: 5.0,
            pan_padding: 50.0,
            fit_padding: 0.05,
            movement_threshold_sq: 5.0,
            link_hit_radius: 24.0,
            curve_hit_width: 16.0,
            style: CanvasStyle::default(),
            landmass: LandmassConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lowest, highest) = ZOOM_BOUNDS;
        if !(self.min_zoom >= lowest)
            || !(self.max_zoom <= highest)
            || !(self.max_zoom >= self.min_zoom)
        {
            tracing::warn!(min = self.min_zoom, max = self.max_zoom, "Rejected zoom limits");
            return Err(ConfigError::InvalidZoom {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        let non_negative = [
            ("zoom_speed", self.zoom_speed),
            ("pan_padding", self.pan_padding),
            ("movement_threshold_sq", self.movement_threshold_sq),
            ("link_hit_radius", self.link_hit_radius),
            ("curve_hit_width", self.curve_hit_width),
            ("style.label_scale", self.style.label_scale),
            ("style.marker_scale", self.style.marker_scale),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                tracing::warn!(field, value, "Rejected canvas config value");
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        if !(0.0..0.5).contains(&self.fit_padding) {
            return Err(ConfigError::InvalidValue {
                field: "fit_padding",
                reason: format!("must be in [0, 0.5), got {}", self.fit_padding),
            });
        }
        if !(0.0..=1.0).contains(&self.style.pending_opacity)
            || !(0.0..=1.0).contains(&self.style.line.opacity)
        {
            return Err(ConfigError::InvalidValue {
                field: "style",
                reason: "opacities must be within [0, 1]".to_string(),
            });
        }

        self.landmass.validate()?;
        Ok(())
    }
}

/// Visual styling configuration for the Canvas.
///
/// Colors are RGBA `glam::Vec4` values in `0.0..=1.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasStyle {
    /// Fill behind everything; the sea when the landmass is drawn.
    pub background_color: Vec4,
    pub terrain: TerrainStyle,
    pub line: LineStyle,
    pub marker: MarkerStyle,
    /// Per-category marker colors. Missing categories use `marker.fallback_color`.
    pub category_colors: HashMap<Category, Vec4>,
    /// Multiplier applied to every label size.
    pub label_scale: f32,
    /// Multiplier applied to every marker radius and to the link hit radius.
    pub marker_scale: f32,
    /// Font family for region labels. `None` leaves the choice to the host.
    pub region_font: Option<String>,
    /// Opacity factor for pending items shown to their owner.
    pub pending_opacity: f32,
    pub text_color: Vec4,
    /// Ring drawn around selected entities.
    pub selection_color: Vec4,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        let category_colors = HashMap::from([
            (Category::Event, Vec4::new(0.91, 0.30, 0.24, 1.0)),
            (Category::Person, Vec4::new(0.20, 0.60, 0.86, 1.0)),
            (Category::Space, Vec4::new(0.18, 0.80, 0.44, 1.0)),
            (Category::Community, Vec4::new(0.61, 0.35, 0.71, 1.0)),
            (Category::Media, Vec4::new(0.95, 0.61, 0.07, 1.0)),
            (Category::Region, Vec4::new(0.93, 0.93, 0.93, 1.0)),
        ]);
        Self {
            background_color: Vec4::new(0.11, 0.20, 0.31, 1.0),
            terrain: TerrainStyle::default(),
            line: LineStyle::default(),
            marker: MarkerStyle::default(),
            category_colors,
            label_scale: 1.0,
            marker_scale: 1.0,
            region_font: None,
            pending_opacity: 0.5,
            text_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            selection_color: Vec4::new(1.0, 0.85, 0.2, 1.0),
        }
    }
}

impl CanvasStyle {
    pub fn category_color(&self, category: Category) -> Vec4 {
        self.category_colors
            .get(&category)
            .copied()
            .unwrap_or(self.marker.fallback_color)
    }
}

/// Colors of the generated landmass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainStyle {
    pub land_color: Vec4,
    pub coast_color: Vec4,
    pub coast_width: f32,
}

impl Default for TerrainStyle {
    fn default() -> Self {
        Self {
            land_color: Vec4::new(0.25, 0.36, 0.27, 1.0),
            coast_color: Vec4::new(0.62, 0.71, 0.58, 1.0),
            coast_width: 2.0,
        }
    }
}

/// Visual style for relationship curves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: Vec4,
    /// Opacity of approved relationships.
    pub opacity: f32,
    /// Stroke width in logical units.
    pub width: f32,
    /// Color of the dashed preview while creating a relationship.
    pub preview_color: Vec4,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Vec4::new(0.9, 0.9, 0.9, 1.0),
            opacity: 0.7,
            width: 2.0,
            preview_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

/// Visual style for entity markers and labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Marker radius in logical units, before `marker_scale`.
    pub radius: f32,
    /// Glow radius as a multiple of the marker radius.
    pub glow_factor: f32,
    pub glow_opacity: f32,
    pub outline_color: Vec4,
    pub outline_width: f32,
    /// Thicker outline marks pending entities.
    pub pending_outline_width: f32,
    /// Label font size in logical units, before `label_scale`.
    pub label_size: f32,
    /// Region label font size in logical units, before `label_scale`.
    pub region_label_size: f32,
    pub fallback_color: Vec4,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 8.0,
            glow_factor: 2.2,
            glow_opacity: 0.25,
            outline_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            outline_width: 1.5,
            pending_outline_width: 3.5,
            label_size: 12.0,
            region_label_size: 22.0,
            fallback_color: Vec4::new(0.7, 0.7, 0.7, 1.0),
        }
    }
}
