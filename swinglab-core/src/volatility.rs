//! Volatility guard.
//!
//! Every distance in the engine is divided by, or multiplied with, a per-bar
//! volatility value. Non-positive or missing (NaN) values fall back to the
//! most recent positive value, or to [`VOLATILITY_EPSILON`] before any
//! positive value has been seen.

/// Floor used before the series has produced a positive volatility.
pub const VOLATILITY_EPSILON: f64 = 1e-6;

/// Streaming form of the guard, for single forward passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityGuard {
    last_positive: Option<f64>,
}

impl VolatilityGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the raw value for the current bar.
    pub fn resolve(&mut self, raw: f64) -> f64 {
        if raw.is_finite() && raw > 0.0 {
            self.last_positive = Some(raw);
            raw
        } else {
            self.last_positive.unwrap_or(VOLATILITY_EPSILON)
        }
    }
}

/// Apply the guard to a whole series. Output is strictly positive and finite.
pub fn sanitize_volatility(raw: &[f64]) -> Vec<f64> {
    let mut guard = VolatilityGuard::new();
    raw.iter().map(|&v| guard.resolve(v)).collect()
}

/// Guarded value at one bar without materializing the whole series.
///
/// Equivalent to `sanitize_volatility(raw)[index]`; returns `None` when
/// `index` is out of range.
pub fn volatility_at(raw: &[f64], index: usize) -> Option<f64> {
    let prefix = raw.get(..=index)?;
    Some(
        prefix
            .iter()
            .rev()
            .copied()
            .find(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(VOLATILITY_EPSILON),
    )
}
