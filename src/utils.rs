//! Small numeric helpers shared by the generators

/// Linear interpolation: maps `t` in [0, 1] onto [min, max].
pub fn lerp(min: f64, max: f64, t: f64) -> f64 {
    min + (max - min) * t
}

/// Inverse of [`lerp`]: maps `value` in [min, max] onto [0, 1].
///
/// Returns `None` when the range is empty (min == max).
pub fn inverse_lerp(min: f64, max: f64, value: f64) -> Option<f64> {
    let range = max - min;
    if range == 0.0 {
        return None;
    }
    Some((value - min) / range)
}

/// Round to a fixed number of decimal digits.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
