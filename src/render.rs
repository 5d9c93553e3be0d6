//! Fill-rectangle draw commands for a host renderer
//!
//! The generator does not rasterize anything itself; it hands the renderer
//! one colored rectangle per tile (and per resource marker) in map-centered
//! coordinates.

use crate::config::MapLayout;
use crate::resources::{ResourceConfig, ResourceSite};
use crate::terrain::TileGrid;

/// One filled rectangle in map-centered pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: (u8, u8, u8),
}

impl FillRect {
    /// `#RRGGBB` form of the fill color
    pub fn hex_color(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.color.0, self.color.1, self.color.2)
    }
}

/// One command per tile, column by column: tile (x, y) is drawn at
/// `(tile_width * x - map_width / 2, tile_height * y - map_height / 2)`.
pub fn tile_fill_commands(tiles: &TileGrid, layout: &MapLayout) -> Vec<FillRect> {
    let mut commands = Vec::with_capacity(tiles.len());
    for x in 0..tiles.width {
        for y in 0..tiles.height {
            let origin = layout.tile_origin(x, y);
            commands.push(FillRect {
                x: origin.x,
                y: origin.y,
                width: layout.tile_width as f64,
                height: layout.tile_height as f64,
                color: tiles.get(x, y).color(),
            });
        }
    }
    commands
}

/// One square marker per resource site.
pub fn resource_fill_commands(
    sites: &[ResourceSite],
    layout: &MapLayout,
    config: &ResourceConfig,
) -> Vec<FillRect> {
    let size = config.marker_size(layout) as f64;
    sites
        .iter()
        .map(|site| FillRect {
            x: site.position.x,
            y: site.position.y,
            width: size,
            height: size,
            color: config.marker_color,
        })
        .collect()
}
