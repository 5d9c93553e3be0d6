//! Resource placement
//!
//! Spreads resource sites over the map with the best-candidate sampler.
//! Sampling happens in a centered sub-rectangle covering `area_fraction` of
//! the map, and each site is reported in map-centered coordinates along
//! with the tile and terrain underneath it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MapLayout;
use crate::error::{MapError, Result};
use crate::sampler::{BestCandidateSampler, Point};
use crate::terrain::{TerrainCategory, TileGrid};

/// Resource placement settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Number of sites to place
    pub count: usize,
    /// Share of the map (per axis) the sites may occupy, in (0, 1]
    pub area_fraction: f64,
    /// Marker size in pixels; `None` means twice the tile width
    pub marker_size: Option<u32>,
    pub marker_color: (u8, u8, u8),
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            count: 100,
            area_fraction: 0.9,
            marker_size: None,
            marker_color: (0xA6, 0x6F, 0xE8),
        }
    }
}

impl ResourceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.count < 1 {
            return Err(MapError::invalid("resource count must be >= 1"));
        }
        if !(self.area_fraction > 0.0 && self.area_fraction <= 1.0) {
            return Err(MapError::invalid(format!(
                "area_fraction must be in (0, 1], got {}",
                self.area_fraction
            )));
        }
        Ok(())
    }

    pub fn marker_size(&self, layout: &MapLayout) -> u32 {
        self.marker_size.unwrap_or(layout.tile_width * 2)
    }
}

/// One placed resource
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSite {
    /// Map-centered position
    pub position: Point,
    /// Tile under the site
    pub tile: Option<(usize, usize)>,
    /// Terrain of that tile, when a tile grid was supplied
    pub terrain: Option<TerrainCategory>,
}

/// Size of the sampling area: the map scaled by `area_fraction`.
pub fn placement_area(layout: &MapLayout, config: &ResourceConfig) -> (f64, f64) {
    (
        layout.map_width as f64 * config.area_fraction,
        layout.map_height as f64 * config.area_fraction,
    )
}

/// Place `config.count` resource sites.
pub fn place_resources<R: Rng + ?Sized>(
    layout: &MapLayout,
    tiles: Option<&TileGrid>,
    config: &ResourceConfig,
    sampler: &BestCandidateSampler,
    rng: &mut R,
) -> Result<Vec<ResourceSite>> {
    config.validate()?;
    let (area_w, area_h) = placement_area(layout, config);
    let points = sampler.generate(area_w, area_h, config.count, rng)?;

    let sites = points
        .into_iter()
        .map(|p| {
            let position = Point::new(p.x - area_w / 2.0, p.y - area_h / 2.0);
            let tile = layout.tile_at(position);
            let terrain = match (tiles, tile) {
                (Some(grid), Some((tx, ty))) => grid.try_get(tx, ty).copied(),
                _ => None,
            };
            ResourceSite { position, tile, terrain }
        })
        .collect();

    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Tilemap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sites_inside_centered_area() {
        let layout = MapLayout::default();
        let config = ResourceConfig { count: 25, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sites =
            place_resources(&layout, None, &config, &BestCandidateSampler::default(), &mut rng).unwrap();

        assert_eq!(sites.len(), 25);
        for site in &sites {
            assert!(site.position.x >= -432.0 && site.position.x <= 432.0);
            assert!(site.position.y >= -288.0 && site.position.y <= 288.0);
            assert!(site.tile.is_some());
            assert!(site.terrain.is_none());
        }
    }

    #[test]
    fn test_sites_report_terrain() {
        let layout = MapLayout { map_width: 40, map_height: 40, tile_width: 4, tile_height: 4 };
        let grid = Tilemap::from_fn(10, 10, |x, _| {
            if x < 5 { TerrainCategory::Sea } else { TerrainCategory::Grass }
        });
        let config = ResourceConfig { count: 6, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sites =
            place_resources(&layout, Some(&grid), &config, &BestCandidateSampler::default(), &mut rng)
                .unwrap();

        for site in &sites {
            let (tx, ty) = site.tile.unwrap();
            assert_eq!(site.terrain, Some(*grid.get(tx, ty)));
        }
    }

    #[test]
    fn test_marker_size_defaults_to_two_tiles() {
        let layout = MapLayout::default();
        assert_eq!(ResourceConfig::default().marker_size(&layout), 8);
        let custom = ResourceConfig { marker_size: Some(3), ..Default::default() };
        assert_eq!(custom.marker_size(&layout), 3);
    }

    #[test]
    fn test_rejects_bad_config() {
        let layout = MapLayout::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sampler = BestCandidateSampler::default();

        let zero = ResourceConfig { count: 0, ..Default::default() };
        assert!(place_resources(&layout, None, &zero, &sampler, &mut rng).is_err());

        let wide = ResourceConfig { area_fraction: 1.2, ..Default::default() };
        assert!(place_resources(&layout, None, &wide, &sampler, &mut rng).is_err());
    }
}
