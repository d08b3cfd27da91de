//! Fixed-point conversions for model inputs.
//!
//! The model compares and accumulates integers only. Cleaned CSV values are
//! converted once, at the boundary, into micro units (1 unit = 1e-6) so that
//! training and inference are reproducible bit for bit.

/// Scaling factor: 1 unit = 1e-6.
pub const SCALE: i64 = 1_000_000;

/// Convert a real value into micro units, rounding to the nearest unit.
///
/// Values outside the `i64` range saturate; `NaN` maps to zero.
#[inline]
pub fn to_fixed(value: f64) -> i64 {
    (value * SCALE as f64).round() as i64
}

/// Convert a real value into micro units, or `None` when it is not finite
/// or does not fit in `i64` once scaled.
pub fn try_to_fixed(value: f64) -> Option<i64> {
    let scaled = (value * SCALE as f64).round();
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    if scaled.is_finite() && scaled >= i64::MIN as f64 && scaled < i64::MAX as f64 {
        Some(scaled as i64)
    } else {
        None
    }
}

/// Convert micro units back into a real value.
#[inline]
pub fn from_fixed(value: i64) -> f64 {
    value as f64 / SCALE as f64
}

/// Convert a whole row of real values.
pub fn row_to_fixed(values: &[f64]) -> Vec<i64> {
    values.iter().copied().map(to_fixed).collect()
}
