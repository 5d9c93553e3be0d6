//! Map configuration
//!
//! Everything a session needs besides the live tunables' current values:
//! map/tile geometry, the starting seed and noise parameters, the threshold
//! table, resource placement and the debounce window. Loaded from JSON;
//! missing fields fall back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::params::NoiseParams;
use crate::resources::ResourceConfig;
use crate::sampler::Point;
use crate::terrain::ThresholdTable;

/// Map and tile geometry, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLayout {
    pub map_width: u32,
    pub map_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            map_width: 960,
            map_height: 640,
            tile_width: 4,
            tile_height: 4,
        }
    }
}

impl MapLayout {
    /// Tiles across (map_width / tile_width, truncated)
    pub fn columns(&self) -> usize {
        (self.map_width / self.tile_width.max(1)) as usize
    }

    /// Tiles down (map_height / tile_height, truncated)
    pub fn rows(&self) -> usize {
        (self.map_height / self.tile_height.max(1)) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(MapError::invalid("tile size must be > 0"));
        }
        if self.tile_width > self.map_width || self.tile_height > self.map_height {
            return Err(MapError::invalid(format!(
                "tile {}x{} does not fit in map {}x{}",
                self.tile_width, self.tile_height, self.map_width, self.map_height
            )));
        }
        Ok(())
    }

    /// Map-centered position of tile (x, y)'s lower-left corner.
    pub fn tile_origin(&self, x: usize, y: usize) -> Point {
        Point::new(
            self.tile_width as f64 * x as f64 - self.map_width as f64 / 2.0,
            self.tile_height as f64 * y as f64 - self.map_height as f64 / 2.0,
        )
    }

    /// Tile containing a map-centered position, if it is on the tiled area.
    pub fn tile_at(&self, position: Point) -> Option<(usize, usize)> {
        let local_x = position.x + self.map_width as f64 / 2.0;
        let local_y = position.y + self.map_height as f64 / 2.0;
        if local_x < 0.0 || local_y < 0.0 {
            return None;
        }
        let tx = (local_x / self.tile_width as f64).floor() as usize;
        let ty = (local_y / self.tile_height as f64).floor() as usize;
        if tx < self.columns() && ty < self.rows() {
            Some((tx, ty))
        } else {
            None
        }
    }
}

/// Full generator configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub layout: MapLayout,
    pub seed: u32,
    pub noise: NoiseParams,
    pub thresholds: ThresholdTable,
    pub resources: ResourceConfig,
    /// Settle window for coalescing slider updates (milliseconds)
    pub debounce_ms: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            layout: MapLayout::default(),
            seed: 1,
            noise: NoiseParams::default(),
            thresholds: ThresholdTable::default(),
            resources: ResourceConfig::default(),
            debounce_ms: 16,
        }
    }
}

impl MapConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: MapConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.noise.validate()?;
        self.resources.validate()?;
        Ok(())
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
