use thiserror::Error;

/// Errors raised while validating a [`LandmassConfig`](crate::config::LandmassConfig).
///
/// Generation itself never fails; these only surface when a configuration is
/// loaded or edited by the host.
#[derive(Debug, Error, PartialEq)]
pub enum TerrainError {
    /// A range whose lower bound is above its upper bound.
    #[error("parameter `{param}` has an inverted range ({min} > {max})")]
    InvalidRange {
        param: &'static str,
        min: f64,
        max: f64,
    },
    /// A value outside the domain the generator can work with.
    #[error("parameter `{param}` is invalid: {reason}")]
    InvalidParameter { param: &'static str, reason: String },
}
