//! PNG export of generated maps

use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use crate::config::MapLayout;
use crate::error::Result;
use crate::heightmap::Heightfield;
use crate::render::FillRect;

/// Rasterize map-centered fill commands into a `map_width x map_height` image.
///
/// Image row 0 is the map's lowest y. Rectangles are clipped to the image;
/// later commands paint over earlier ones.
pub fn rasterize(commands: &[FillRect], layout: &MapLayout, background: (u8, u8, u8)) -> RgbImage {
    let width = layout.map_width;
    let height = layout.map_height;
    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, Rgb([background.0, background.1, background.2]));

    let half_w = width as f64 / 2.0;
    let half_h = height as f64 / 2.0;

    for rect in commands {
        let x0 = clip(rect.x + half_w, width);
        let x1 = clip(rect.x + rect.width + half_w, width);
        let y0 = clip(rect.y + half_h, height);
        let y1 = clip(rect.y + rect.height + half_h, height);
        let color = Rgb([rect.color.0, rect.color.1, rect.color.2]);

        for py in y0..y1 {
            for px in x0..x1 {
                img.put_pixel(px, py, color);
            }
        }
    }

    img
}

fn clip(v: f64, limit: u32) -> u32 {
    v.round().clamp(0.0, limit as f64) as u32
}

/// Rasterize and save fill commands as a PNG.
pub fn export_commands_png(commands: &[FillRect], layout: &MapLayout, path: impl AsRef<Path>) -> Result<()> {
    let img = rasterize(commands, layout, (0, 0, 0));
    img.save(path.as_ref())?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

/// Export a heightfield as grayscale, one pixel per cell (black = 0, white = 1).
pub fn export_heightfield_png(heightfield: &Heightfield, path: impl AsRef<Path>) -> Result<()> {
    let mut img: GrayImage = ImageBuffer::new(heightfield.width() as u32, heightfield.height() as u32);

    for (x, y, &v) in heightfield.values().iter() {
        let level = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        img.put_pixel(x as u32, y as u32, Luma([level]));
    }

    img.save(path.as_ref())?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::generate_heightfield;
    use crate::params::NoiseParams;
    use crate::render::tile_fill_commands;
    use crate::terrain::TerrainCategory;
    use crate::tilemap::Tilemap;

    #[test]
    fn test_rasterize_tiles() {
        let layout = MapLayout { map_width: 8, map_height: 4, tile_width: 4, tile_height: 4 };
        let tiles = Tilemap::from_fn(2, 1, |x, _| {
            if x == 0 { TerrainCategory::Sea } else { TerrainCategory::Sand }
        });
        let img = rasterize(&tile_fill_commands(&tiles, &layout), &layout, (0, 0, 0));

        assert_eq!(img.dimensions(), (8, 4));
        let (r, g, b) = TerrainCategory::Sea.color();
        assert_eq!(img.get_pixel(0, 0), &Rgb([r, g, b]));
        assert_eq!(img.get_pixel(3, 3), &Rgb([r, g, b]));
        let (r, g, b) = TerrainCategory::Sand.color();
        assert_eq!(img.get_pixel(4, 0), &Rgb([r, g, b]));
        assert_eq!(img.get_pixel(7, 3), &Rgb([r, g, b]));
    }

    #[test]
    fn test_rasterize_clips() {
        let layout = MapLayout { map_width: 4, map_height: 4, tile_width: 1, tile_height: 1 };
        let rect = FillRect { x: 1.0, y: 1.0, width: 10.0, height: 10.0, color: (255, 0, 0) };
        let img = rasterize(&[rect], &layout, (0, 0, 0));
        assert_eq!(img.get_pixel(3, 3), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_export_files() {
        let dir = tempfile::tempdir().unwrap();
        let field = generate_heightfield(16, 8, 1, &NoiseParams::default()).unwrap();

        let height_path = dir.path().join("height.png");
        export_heightfield_png(&field, &height_path).unwrap();
        let img = image::open(&height_path).unwrap();
        assert_eq!((img.width(), img.height()), (16, 8));

        let layout = MapLayout { map_width: 64, map_height: 32, tile_width: 4, tile_height: 4 };
        let tiles = Tilemap::new_with(16, 8, TerrainCategory::Grass);
        let map_path = dir.path().join("map.png");
        export_commands_png(&tile_fill_commands(&tiles, &layout), &layout, &map_path).unwrap();
        let img = image::open(&map_path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 32));
    }
}
