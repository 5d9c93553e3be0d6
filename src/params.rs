//! Octave parameters and the slider-style parameter mapping

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::utils::lerp;

/// Sampling offset, in units of map widths/heights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Parameters for fractal noise accumulation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Horizontal scale in tiles (larger = smoother). Must be > 0.
    pub scale: f64,
    /// Number of noise octaves (>= 1)
    pub octaves: u32,
    /// Amplitude decay per octave, typically (0, 1]
    pub persistence: f64,
    /// Frequency multiplier per octave, typically >= 1
    pub lacunarity: f64,
    /// Sampling offset
    pub offset: Offset,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 40.0,
            octaves: 5,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: Offset::default(),
        }
    }
}

impl NoiseParams {
    /// Reject values the generator cannot work with.
    ///
    /// Only hard failures are rejected: non-finite numbers, a non-positive
    /// scale, zero octaves, non-positive persistence/lacunarity, and an
    /// octave count whose final frequency overflows. Values outside the
    /// usual ranges (persistence > 1, lacunarity < 1) are allowed.
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(MapError::invalid(format!("scale must be > 0, got {}", self.scale)));
        }
        if self.octaves < 1 {
            return Err(MapError::invalid("octaves must be >= 1"));
        }
        if !self.persistence.is_finite() || self.persistence <= 0.0 {
            return Err(MapError::invalid(format!(
                "persistence must be > 0, got {}",
                self.persistence
            )));
        }
        if !self.lacunarity.is_finite() || self.lacunarity <= 0.0 {
            return Err(MapError::invalid(format!(
                "lacunarity must be > 0, got {}",
                self.lacunarity
            )));
        }
        // Frequency reached by the last octave; reject before any sampling
        if !self.lacunarity.powf(self.octaves as f64).is_finite() {
            return Err(MapError::invalid(format!(
                "lacunarity {} overflows over {} octaves",
                self.lacunarity, self.octaves
            )));
        }
        if !self.offset.x.is_finite() || !self.offset.y.is_finite() {
            return Err(MapError::invalid("offset must be finite"));
        }
        Ok(())
    }
}

// =============================================================================
// SLIDER MAPPING
// =============================================================================

/// A tunable that UI sliders drive with a progress value in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParamKind {
    Scale,
    Octaves,
    Persistence,
    Lacunarity,
    OffsetX,
    OffsetY,
}

impl ParamKind {
    pub fn all() -> &'static [Self] {
        &[
            Self::Scale,
            Self::Octaves,
            Self::Persistence,
            Self::Lacunarity,
            Self::OffsetX,
            Self::OffsetY,
        ]
    }

    /// Slider name as the UI reports it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scale => "Scale",
            Self::Octaves => "Octaves",
            Self::Persistence => "Persistance",
            Self::Lacunarity => "Lacunarity",
            Self::OffsetX => "OffsetX",
            Self::OffsetY => "OffsetY",
        }
    }

    /// Write the parameter value for slider `progress` into `params`.
    ///
    /// Scale maps onto [10, 100] and Octaves onto [3, 7], both floored.
    /// Persistence maps onto [0.4, 1], Lacunarity onto [2, 6].
    /// Offsets take the progress value unchanged.
    pub fn apply(&self, params: &mut NoiseParams, progress: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&progress) {
            return Err(MapError::invalid(format!(
                "{} progress must be in [0, 1], got {}",
                self.name(),
                progress
            )));
        }
        match self {
            Self::Scale => params.scale = lerp(10.0, 100.0, progress).floor(),
            Self::Octaves => params.octaves = lerp(3.0, 7.0, progress).floor() as u32,
            Self::Persistence => params.persistence = lerp(0.4, 1.0, progress),
            Self::Lacunarity => params.lacunarity = lerp(2.0, 6.0, progress),
            Self::OffsetX => params.offset.x = progress,
            Self::OffsetY => params.offset.y = progress,
        }
        Ok(())
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ParamKind {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scale" => Ok(Self::Scale),
            "octaves" => Ok(Self::Octaves),
            // The UI spells it "Persistance"
            "persistance" | "persistence" => Ok(Self::Persistence),
            "lacunarity" => Ok(Self::Lacunarity),
            "offsetx" => Ok(Self::OffsetX),
            "offsety" => Ok(Self::OffsetY),
            _ => Err(MapError::UnknownParameter(s.to_string())),
        }
    }
}

/// One slider change: which tunable, and its progress in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterUpdate {
    pub kind: ParamKind,
    pub progress: f64,
}

impl ParameterUpdate {
    pub fn new(kind: ParamKind, progress: f64) -> Self {
        Self { kind, progress }
    }
}

/// Parses `Name=progress`, e.g. `Octaves=0.5`.
impl FromStr for ParameterUpdate {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| MapError::invalid(format!("expected Name=progress, got '{}'", s)))?;
        let kind = name.trim().parse::<ParamKind>()?;
        let progress = value
            .trim()
            .parse::<f64>()
            .map_err(|e| MapError::invalid(format!("bad progress '{}': {}", value, e)))?;
        Ok(Self { kind, progress })
    }
}
