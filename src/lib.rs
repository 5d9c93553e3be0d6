//! Tile terrain generation library
//!
//! Seeded fractal heightfields, threshold terrain classification and
//! best-candidate point sampling for resource placement.

pub mod ascii;
pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod gradient_noise;
pub mod heightmap;
pub mod logging;
pub mod params;
pub mod render;
pub mod resources;
pub mod sampler;
pub mod session;
pub mod snapshot;
pub mod terrain;
pub mod tilemap;
pub mod utils;

pub use error::{MapError, Result};
