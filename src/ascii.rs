//! ASCII rendering and export for terminal previews
//!
//! Renders a tile grid or heightfield as text, optionally with ANSI
//! 24-bit colors, and writes annotated text dumps.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::session::GeneratedMap;
use crate::terrain::{category_counts, TerrainCategory, ThresholdTable, TileGrid};
use crate::heightmap::Heightfield;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Show terrain category characters
    Terrain,
    /// Show normalized height gradient
    Height,
}

/// Ramp from low to high used by [`AsciiMode::Height`]
const HEIGHT_RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Get ASCII character for a normalized height
pub fn height_char(height: f64) -> char {
    let idx = (height.clamp(0.0, 1.0) * (HEIGHT_RAMP.len() - 1) as f64).round() as usize;
    HEIGHT_RAMP[idx]
}

/// Grayscale color for a normalized height
pub fn height_color(height: f64) -> (u8, u8, u8) {
    let v = (height.clamp(0.0, 1.0) * 255.0).round() as u8;
    (v, v, v)
}

/// Render every `step`-th tile as one character per cell, one line per row.
pub fn render_ascii_map(heightfield: &Heightfield, tiles: &TileGrid, mode: AsciiMode, step: usize) -> String {
    let step = step.max(1);
    let width = tiles.width.div_ceil(step);
    let mut result = String::with_capacity((width + 1) * tiles.height.div_ceil(step));

    for y in (0..tiles.height).step_by(step) {
        for x in (0..tiles.width).step_by(step) {
            let ch = match mode {
                AsciiMode::Terrain => tiles.get(x, y).ascii_char(),
                AsciiMode::Height => height_char(heightfield.get(x, y)),
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Format a character with ANSI true color (24-bit) foreground and background
pub fn ansi_colored_char(ch: char, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Render a colorized ASCII map with ANSI codes
pub fn render_colored_ascii_map(
    heightfield: &Heightfield,
    tiles: &TileGrid,
    mode: AsciiMode,
    step: usize,
) -> String {
    let step = step.max(1);
    let mut result = String::new();

    for y in (0..tiles.height).step_by(step) {
        for x in (0..tiles.width).step_by(step) {
            let (ch, bg) = match mode {
                AsciiMode::Terrain => {
                    let category = tiles.get(x, y);
                    (category.ascii_char(), category.color())
                }
                AsciiMode::Height => {
                    let h = heightfield.get(x, y);
                    (height_char(h), height_color(h))
                }
            };
            // Darker version of the background for the glyph
            let fg = (bg.0.saturating_sub(40), bg.1.saturating_sub(40), bg.2.saturating_sub(40));
            result.push_str(&ansi_colored_char(ch, fg, bg));
        }
        result.push_str("\x1b[0m\n");
    }

    result
}

/// Legend for terrain characters, in threshold order.
pub fn terrain_legend(table: &ThresholdTable) -> String {
    let mut legend = String::from("=== TERRAIN LEGEND ===\n");
    for entry in table.entries() {
        legend.push_str(&format!(
            "  {} {:<7} >= {:.2}\n",
            entry.category.ascii_char(),
            entry.category.display_name(),
            entry.value
        ));
    }
    legend
}

/// Per-category tile counts and shares, largest first.
pub fn terrain_stats(tiles: &TileGrid) -> String {
    let total = tiles.len().max(1) as f64;
    let mut counts: Vec<(TerrainCategory, usize)> = category_counts(tiles).into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.display_name().cmp(b.0.display_name())));

    let mut out = String::from("=== TERRAIN STATS ===\n");
    for (category, count) in counts {
        out.push_str(&format!(
            "  {:<7} {:>6} ({:5.1}%)\n",
            category.display_name(),
            count,
            100.0 * count as f64 / total
        ));
    }
    out
}

/// Write a text dump: header, legend, stats and the full-resolution map.
pub fn export_map_file(map: &GeneratedMap, table: &ThresholdTable, path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "=== TERRAIN TILES MAP FILE ===")?;
    writeln!(file, "Seed: {}", map.seed)?;
    writeln!(file, "Size: {}x{}", map.tiles.width, map.tiles.height)?;
    writeln!(
        file,
        "Noise: scale {} octaves {} persistence {:.3} lacunarity {:.3} offset ({:.3}, {:.3})",
        map.params.scale,
        map.params.octaves,
        map.params.persistence,
        map.params.lacunarity,
        map.params.offset.x,
        map.params.offset.y
    )?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    write!(file, "{}", terrain_legend(table))?;
    writeln!(file)?;
    write!(file, "{}", terrain_stats(&map.tiles))?;
    writeln!(file)?;

    writeln!(file, "=== MAP (Terrain View) ===")?;
    write!(file, "{}", render_ascii_map(&map.heightfield, &map.tiles, AsciiMode::Terrain, 1))?;

    Ok(())
}
