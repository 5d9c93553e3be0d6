//! Terrain categories and threshold classification
//!
//! A [`ThresholdTable`] is a staircase: entries sorted by value, highest
//! first, ending in a 0-value catch-all. A height takes the category of the
//! first entry whose value is <= the height.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::heightmap::Heightfield;
use crate::tilemap::Tilemap;

/// Terrain category of one tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainCategory {
    Dirt,
    Forest,
    Grass,
    Soil,
    Sand,
    Sea,
    Vortex,
}

impl TerrainCategory {
    pub fn all() -> &'static [Self] {
        &[
            Self::Dirt,
            Self::Forest,
            Self::Grass,
            Self::Soil,
            Self::Sand,
            Self::Sea,
            Self::Vortex,
        ]
    }

    /// Display color. Presentation only; classification never looks at it.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Dirt => (0x4D, 0x3D, 0x35),
            Self::Forest => (0x3D, 0x61, 0x12),
            Self::Grass => (0x51, 0x8A, 0x14),
            Self::Soil => (0xB2, 0x82, 0x4E),
            Self::Sand => (0xE5, 0xD8, 0xB8),
            Self::Sea => (0x00, 0xA0, 0xEE),
            Self::Vortex => (0x00, 0x63, 0xC7),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dirt => "Dirt",
            Self::Forest => "Forest",
            Self::Grass => "Grass",
            Self::Soil => "Soil",
            Self::Sand => "Sand",
            Self::Sea => "Sea",
            Self::Vortex => "Vortex",
        }
    }

    /// Character used by the ASCII preview
    pub fn ascii_char(&self) -> char {
        match self {
            Self::Dirt => '#',
            Self::Forest => 'T',
            Self::Grass => '"',
            Self::Soil => ':',
            Self::Sand => '.',
            Self::Sea => '~',
            Self::Vortex => '@',
        }
    }
}

/// One step of a threshold table
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub category: TerrainCategory,
}

impl Threshold {
    pub fn new(value: f64, category: TerrainCategory) -> Self {
        Self { value, category }
    }
}

/// Validated, descending threshold table.
///
/// Construction guarantees: at least one entry, every value finite and in
/// [0, 1], values strictly descending, and the last entry is the 0-value
/// catch-all. Any height >= 0 therefore classifies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Threshold>", into = "Vec<Threshold>")]
pub struct ThresholdTable {
    entries: Vec<Threshold>,
}

impl ThresholdTable {
    pub fn new(entries: Vec<Threshold>) -> Result<Self> {
        let last = entries
            .last()
            .ok_or_else(|| MapError::InvalidThresholdTable("table is empty".to_string()))?;

        if let Some(bad) = entries
            .iter()
            .find(|t| !t.value.is_finite() || !(0.0..=1.0).contains(&t.value))
        {
            return Err(MapError::InvalidThresholdTable(format!(
                "{:?} threshold {} is outside [0, 1]",
                bad.category, bad.value
            )));
        }

        if let Some(pair) = entries.windows(2).find(|w| w[1].value >= w[0].value) {
            return Err(MapError::InvalidThresholdTable(format!(
                "thresholds must be strictly descending: {:?} ({}) is followed by {:?} ({})",
                pair[0].category, pair[0].value, pair[1].category, pair[1].value
            )));
        }

        if last.value != 0.0 {
            return Err(MapError::InvalidThresholdTable(format!(
                "last entry must be the 0-value catch-all, found {:?} at {}",
                last.category, last.value
            )));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Threshold] {
        &self.entries
    }

    /// Category of the first entry whose value is <= `height`.
    ///
    /// Fails only for heights below the catch-all (negative or NaN), which
    /// a normalized heightfield never contains.
    pub fn classify(&self, height: f64) -> Result<TerrainCategory> {
        self.entries
            .iter()
            .find(|t| t.value <= height)
            .map(|t| t.category)
            .ok_or_else(|| {
                MapError::invalid(format!("height {} is below the catch-all threshold", height))
            })
    }

    /// Table position of the entry `height` classifies to (0 = topmost).
    pub fn rank(&self, height: f64) -> Option<usize> {
        self.entries.iter().position(|t| t.value <= height)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        use TerrainCategory::*;
        Self {
            entries: vec![
                Threshold::new(0.85, Dirt),
                Threshold::new(0.6, Forest),
                Threshold::new(0.5, Grass),
                Threshold::new(0.45, Soil),
                Threshold::new(0.4, Sand),
                Threshold::new(0.15, Sea),
                Threshold::new(0.0, Vortex),
            ],
        }
    }
}

impl TryFrom<Vec<Threshold>> for ThresholdTable {
    type Error = MapError;

    fn try_from(entries: Vec<Threshold>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<ThresholdTable> for Vec<Threshold> {
    fn from(table: ThresholdTable) -> Self {
        table.entries
    }
}

/// Terrain category per tile, positionally matching a [`Heightfield`].
pub type TileGrid = Tilemap<TerrainCategory>;

/// Classify every cell of a heightfield.
pub fn classify_heightfield(heightfield: &Heightfield, table: &ThresholdTable) -> Result<TileGrid> {
    let tiles = heightfield.values().try_map(|&h| table.classify(h))?;
    debug!(
        "Classified {}x{} tiles into {} categories",
        tiles.width,
        tiles.height,
        category_counts(&tiles).len()
    );
    Ok(tiles)
}

/// Count tiles per category.
pub fn category_counts(tiles: &TileGrid) -> HashMap<TerrainCategory, usize> {
    let mut counts = HashMap::new();
    for &category in tiles.values() {
        *counts.entry(category).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::generate_heightfield;
    use crate::params::NoiseParams;
    use TerrainCategory::*;

    fn two_step() -> ThresholdTable {
        ThresholdTable::new(vec![Threshold::new(0.5, Grass), Threshold::new(0.0, Sea)]).unwrap()
    }

    #[test]
    fn test_two_step_scenario() {
        let table = two_step();
        assert_eq!(table.classify(0.5).unwrap(), Grass);
        assert_eq!(table.classify(0.49999).unwrap(), Sea);
        assert_eq!(table.classify(0.0).unwrap(), Sea);
        assert_eq!(table.classify(1.0).unwrap(), Grass);
    }

    #[test]
    fn test_default_table() {
        let table = ThresholdTable::default();
        assert_eq!(ThresholdTable::new(table.entries().to_vec()).unwrap(), table);
        assert_eq!(table.classify(0.9).unwrap(), Dirt);
        assert_eq!(table.classify(0.85).unwrap(), Dirt);
        assert_eq!(table.classify(0.7).unwrap(), Forest);
        assert_eq!(table.classify(0.55).unwrap(), Grass);
        assert_eq!(table.classify(0.47).unwrap(), Soil);
        assert_eq!(table.classify(0.42).unwrap(), Sand);
        assert_eq!(table.classify(0.2).unwrap(), Sea);
        assert_eq!(table.classify(0.1).unwrap(), Vortex);
    }

    #[test]
    fn test_coverage_of_unit_interval() {
        let table = ThresholdTable::default();
        for i in 0..=1000 {
            let h = i as f64 / 1000.0;
            assert!(table.classify(h).is_ok(), "{} did not classify", h);
        }
    }

    #[test]
    fn test_monotonic_rank() {
        let table = ThresholdTable::default();
        let mut previous = table.rank(1.0).unwrap();
        assert_eq!(previous, 0);
        for i in (0..=1000).rev() {
            let rank = table.rank(i as f64 / 1000.0).unwrap();
            assert!(rank >= previous, "rank went up at {}", i);
            previous = rank;
        }
        assert_eq!(previous, table.entries().len() - 1);
    }

    #[test]
    fn test_below_catch_all_fails() {
        let table = two_step();
        assert!(matches!(table.classify(-0.01), Err(MapError::InvalidArgument(_))));
        assert!(table.classify(f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_malformed_tables() {
        // Missing catch-all
        let missing = ThresholdTable::new(vec![Threshold::new(0.5, Grass), Threshold::new(0.1, Sea)]);
        assert!(matches!(missing, Err(MapError::InvalidThresholdTable(_))));

        // Unsorted
        let unsorted = ThresholdTable::new(vec![
            Threshold::new(0.3, Sand),
            Threshold::new(0.6, Forest),
            Threshold::new(0.0, Sea),
        ]);
        assert!(matches!(unsorted, Err(MapError::InvalidThresholdTable(_))));

        // Duplicate catch-all
        let duplicate = ThresholdTable::new(vec![Threshold::new(0.0, Sand), Threshold::new(0.0, Sea)]);
        assert!(duplicate.is_err());

        // Out of range and empty
        assert!(ThresholdTable::new(vec![Threshold::new(1.5, Dirt), Threshold::new(0.0, Sea)]).is_err());
        assert!(ThresholdTable::new(vec![]).is_err());
    }

    #[test]
    fn test_single_catch_all_table() {
        let table = ThresholdTable::new(vec![Threshold::new(0.0, Sand)]).unwrap();
        assert_eq!(table.classify(0.73).unwrap(), Sand);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: ThresholdTable = serde_json::from_str(
            r#"[{"value":0.5,"category":"Grass"},{"value":0.0,"category":"Sea"}]"#,
        )
        .unwrap();
        assert_eq!(ok, two_step());

        let bad = serde_json::from_str::<ThresholdTable>(r#"[{"value":0.5,"category":"Grass"}]"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_classify_heightfield() {
        let field = generate_heightfield(40, 30, 3, &NoiseParams::default()).unwrap();
        let table = ThresholdTable::default();
        let tiles = classify_heightfield(&field, &table).unwrap();

        assert_eq!(tiles.width, 40);
        assert_eq!(tiles.height, 30);
        for (x, y, &category) in tiles.iter() {
            assert_eq!(category, table.classify(field.get(x, y)).unwrap());
        }

        let counts = category_counts(&tiles);
        assert_eq!(counts.values().sum::<usize>(), 40 * 30);
        // Normalized extremes always land in the top and bottom steps
        assert!(counts.contains_key(&Dirt));
        assert!(counts.contains_key(&Vortex));
    }

    #[test]
    fn test_colors_distinct() {
        let colors: std::collections::HashSet<_> =
            TerrainCategory::all().iter().map(|c| c.color()).collect();
        assert_eq!(colors.len(), TerrainCategory::all().len());
    }
}
