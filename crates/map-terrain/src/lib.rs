//! # MapTerrain
//!
//! `map_terrain` generates the default background of a community map: a
//! coastline with bays, inland lakes and offshore islands, all derived from a
//! seed string so a map always renders the same terrain.
//!
//! ## Modules
//! - **RNG (`src/rng.rs`)**: string-seeded deterministic stream.
//! - **Geometry (`src/geometry.rs`)**: containment, subdivision, spline paths.
//! - **Landmass (`src/landmass.rs`)**: the generator itself.
//! - **Cache (`src/cache.rs`)**: per-seed memoization for repeated renders.

pub mod cache;
pub mod config;
pub mod error;
pub mod geometry;
pub mod landmass;
pub mod rng;

pub use cache::LandmassCache;
pub use config::{LandmassConfig, LandmassParams, ParamRange};
pub use error::TerrainError;
pub use geometry::{FillRule, Path, PathSegment};
pub use landmass::{Landmass, Shape};
pub use rng::SeededRng;
