//! Fractal heightfield generation
//!
//! Sums octaves of [`GradientNoise`] over a width x height grid, then
//! normalizes the grid against its own observed range.

use log::{debug, warn};

use crate::error::{MapError, Result};
use crate::gradient_noise::GradientNoise;
use crate::params::NoiseParams;
use crate::tilemap::Tilemap;
use crate::utils::{inverse_lerp, round_to};

/// Decimal digits kept in normalized heights.
pub const HEIGHT_PRECISION: u32 = 3;

/// Value every cell takes when the raw field is flat.
pub const DEGENERATE_FILL: f64 = 0.5;

/// A normalized heightfield: every cell in [0, 1], rounded to
/// [`HEIGHT_PRECISION`] decimals.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    values: Tilemap<f64>,
    raw_min: f64,
    raw_max: f64,
}

impl Heightfield {
    pub fn width(&self) -> usize {
        self.values.width
    }

    pub fn height(&self) -> usize {
        self.values.height
    }

    /// Normalized height at (x, y). Panics outside the grid.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        *self.values.get(x, y)
    }

    pub fn values(&self) -> &Tilemap<f64> {
        &self.values
    }

    /// Raw (pre-normalization) range observed during generation.
    pub fn raw_range(&self) -> (f64, f64) {
        (self.raw_min, self.raw_max)
    }

    /// True when the raw field was flat and the constant fallback was used.
    pub fn is_degenerate(&self) -> bool {
        self.raw_max == self.raw_min
    }

    /// Wrap already-normalized values, e.g. restored from a snapshot.
    ///
    /// Fails if any value lies outside [0, 1]. The raw range is recorded
    /// as (0, 1), or as flat when every value is identical.
    pub fn from_normalized(values: Tilemap<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(MapError::invalid("heightfield must have at least one cell"));
        }
        if let Some((x, y, v)) = values.iter().find(|(_, _, v)| !(0.0..=1.0).contains(*v)) {
            return Err(MapError::invalid(format!(
                "height {} at ({}, {}) is outside [0, 1]",
                v, x, y
            )));
        }
        let first = *values.get(0, 0);
        let flat = values.values().all(|&v| v == first);
        let (raw_min, raw_max) = if flat { (first, first) } else { (0.0, 1.0) };
        Ok(Self { values, raw_min, raw_max })
    }
}

/// Generate a normalized heightfield for `seed`.
///
/// Builds the noise table for `seed` and delegates to
/// [`generate_heightfield_with`].
pub fn generate_heightfield(
    width: usize,
    height: usize,
    seed: u32,
    params: &NoiseParams,
) -> Result<Heightfield> {
    let noise = GradientNoise::new(seed);
    generate_heightfield_with(&noise, width, height, params)
}

/// Generate a normalized heightfield from an existing noise table.
///
/// For each octave the sample position of cell (x, y) is
/// `((x - width/2 + offset.x * width) / scale) * frequency` (and likewise
/// for y). Each [0, 1] noise sample is remapped to [-1, 1] and weighted by
/// the octave amplitude. Amplitude starts at 1 and is multiplied by
/// persistence each octave; frequency starts at 1 and is multiplied by
/// lacunarity.
///
/// The accumulated field is then inverse-lerped against its own min/max.
/// A flat field (min == max) becomes a constant [`DEGENERATE_FILL`] field.
pub fn generate_heightfield_with(
    noise: &GradientNoise,
    width: usize,
    height: usize,
    params: &NoiseParams,
) -> Result<Heightfield> {
    if width == 0 || height == 0 {
        return Err(MapError::invalid(format!(
            "grid dimensions must be > 0, got {}x{}",
            width, height
        )));
    }
    params.validate()?;

    let w = width as f64;
    let h = height as f64;
    let half_width = w / 2.0;
    let half_height = h / 2.0;
    let origin_x = params.offset.x * w - half_width;
    let origin_y = params.offset.y * h - half_height;

    let mut raw_min = f64::INFINITY;
    let mut raw_max = f64::NEG_INFINITY;
    let mut all_finite = true;

    let raw = Tilemap::from_fn(width, height, |x, y| {
        let base_x = (x as f64 + origin_x) / params.scale;
        let base_y = (y as f64 + origin_y) / params.scale;

        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;

        for _ in 0..params.octaves {
            let sample = noise.sample(base_x * frequency, base_y * frequency) * 2.0 - 1.0;
            total += sample * amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        all_finite &= total.is_finite();
        raw_min = raw_min.min(total);
        raw_max = raw_max.max(total);
        total
    });

    if !all_finite {
        return Err(MapError::invalid(format!(
            "octave accumulation overflowed (octaves={}, persistence={}, lacunarity={})",
            params.octaves, params.persistence, params.lacunarity
        )));
    }

    debug!(
        "Heightfield {}x{} seed={} raw range [{:.4}, {:.4}]",
        width, height, noise.seed(), raw_min, raw_max
    );

    if raw_max == raw_min {
        warn!(
            "Flat heightfield (raw value {}), using constant {}",
            raw_min, DEGENERATE_FILL
        );
    }

    let values = raw.map(|&v| match inverse_lerp(raw_min, raw_max, v) {
        Some(t) => round_to(t.clamp(0.0, 1.0), HEIGHT_PRECISION),
        None => DEGENERATE_FILL,
    });

    Ok(Heightfield { values, raw_min, raw_max })
}
