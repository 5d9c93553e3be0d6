//! Flat JSON snapshot of a generated map
//!
//! Field names follow the external format:
//! `{seed, noiseMap, width, height, scale, octaves, persistance, lacunarity,
//! offsetX, offsetY}`, with `noiseMap[x][y]` holding heights rounded to
//! three decimals.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::heightmap::{Heightfield, HEIGHT_PRECISION};
use crate::params::{NoiseParams, Offset};
use crate::tilemap::Tilemap;
use crate::utils::round_to;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    pub seed: u32,
    /// Column-major: `noise_map[x][y]`
    pub noise_map: Vec<Vec<f64>>,
    pub width: usize,
    pub height: usize,
    pub scale: f64,
    pub octaves: u32,
    #[serde(rename = "persistance")]
    pub persistence: f64,
    pub lacunarity: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl MapSnapshot {
    pub fn capture(seed: u32, params: &NoiseParams, heightfield: &Heightfield) -> Self {
        let noise_map = heightfield
            .values()
            .to_columns()
            .into_iter()
            .map(|col| col.into_iter().map(|v| round_to(v, HEIGHT_PRECISION)).collect())
            .collect();

        Self {
            seed,
            noise_map,
            width: heightfield.width(),
            height: heightfield.height(),
            scale: params.scale,
            octaves: params.octaves,
            persistence: params.persistence,
            lacunarity: params.lacunarity,
            offset_x: params.offset.x,
            offset_y: params.offset.y,
        }
    }

    pub fn params(&self) -> NoiseParams {
        NoiseParams {
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
            offset: Offset::new(self.offset_x, self.offset_y),
        }
    }

    /// Rebuild the stored heightfield without regenerating it.
    pub fn heightfield(&self) -> Result<Heightfield> {
        if self.noise_map.len() != self.width
            || self.noise_map.iter().any(|col| col.len() != self.height)
        {
            return Err(MapError::invalid(format!(
                "noiseMap shape does not match {}x{}",
                self.width, self.height
            )));
        }
        let values = Tilemap::from_fn(self.width, self.height, |x, y| self.noise_map[x][y]);
        Heightfield::from_normalized(values)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::generate_heightfield;

    #[test]
    fn test_field_names() {
        let params = NoiseParams::default();
        let field = generate_heightfield(3, 2, 1, &params).unwrap();
        let json = MapSnapshot::capture(1, &params, &field).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in [
            "seed", "noiseMap", "width", "height", "scale", "octaves",
            "persistance", "lacunarity", "offsetX", "offsetY",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["noiseMap"].as_array().unwrap().len(), 3);
        assert_eq!(value["noiseMap"][0].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_column_major_layout() {
        let params = NoiseParams::default();
        let field = generate_heightfield(5, 4, 2, &params).unwrap();
        let snapshot = MapSnapshot::capture(2, &params, &field);
        assert_eq!(snapshot.noise_map[3][1], field.get(3, 1));
    }

    #[test]
    fn test_file_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");

        let params = NoiseParams { octaves: 3, ..Default::default() };
        let field = generate_heightfield(12, 8, 5, &params).unwrap();
        let snapshot = MapSnapshot::capture(5, &params, &field);
        snapshot.write_to(&path).unwrap();

        let loaded = MapSnapshot::read_from(&path).unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.params(), params);
        assert_eq!(loaded.heightfield().unwrap().values(), field.values());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let params = NoiseParams::default();
        let field = generate_heightfield(4, 4, 1, &params).unwrap();
        let mut snapshot = MapSnapshot::capture(1, &params, &field);
        snapshot.noise_map[2].pop();
        assert!(snapshot.heightfield().is_err());
    }
}
