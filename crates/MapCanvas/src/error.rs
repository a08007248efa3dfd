use map_terrain::TerrainError;
use thiserror::Error;

/// Errors raised while loading or validating a [`CanvasConfig`](crate::CanvasConfig).
///
/// Rendering and interaction never fail; this is the only error surface of the crate.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse canvas config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid zoom limits: min {min}, max {max}")]
    InvalidZoom { min: f32, max: f32 },
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("invalid landmass config: {0}")]
    Terrain(#[from] TerrainError),
}
