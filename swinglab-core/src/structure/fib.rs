//! Fibonacci projections from an A-B-C pivot triple.

use super::levels::{EXTENSION_RATIOS, RETRACEMENT_RATIOS};
use crate::domain::{Pivot, PivotKind};

/// The two recognised A-B-C shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbcPattern {
    /// Bullish: low, high, higher-or-lower low. Projects upward.
    LowHighLow,
    /// Bearish mirror. Projects downward.
    HighLowHigh,
}

impl AbcPattern {
    pub fn classify(abc: &[Pivot; 3]) -> Option<Self> {
        match (abc[0].kind, abc[1].kind, abc[2].kind) {
            (PivotKind::Low, PivotKind::High, PivotKind::Low) => Some(AbcPattern::LowHighLow),
            (PivotKind::High, PivotKind::Low, PivotKind::High) => Some(AbcPattern::HighLowHigh),
            _ => None,
        }
    }

    /// +1 when the continuation is upward, -1 when downward.
    fn direction(self) -> f64 {
        match self {
            AbcPattern::LowHighLow => 1.0,
            AbcPattern::HighLowHigh => -1.0,
        }
    }
}

/// Projected price levels for one A-B-C structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibProjection {
    pub pattern: AbcPattern,
    /// C ± R × {1.272, 1.618, 2.0}
    pub extensions: [f64; 3],
    /// B ∓ R × {0.236, 0.382, 0.5, 0.618, 0.786}
    pub retracements: [f64; 5],
}

impl FibProjection {
    /// Project from the last three pivots. `None` for an unrecognised pattern
    /// or a degenerate swing (`R = |B - A|` not positive).
    pub fn from_abc(abc: &[Pivot; 3]) -> Option<Self> {
        let pattern = AbcPattern::classify(abc)?;
        let (a, b, c) = (abc[0].price, abc[1].price, abc[2].price);
        let range = (b - a).abs();
        if !(range > 0.0) {
            return None;
        }
        let dir = pattern.direction();
        Some(Self {
            pattern,
            extensions: EXTENSION_RATIOS.map(|k| c + dir * range * k),
            retracements: RETRACEMENT_RATIOS.map(|k| b - dir * range * k),
        })
    }

    /// Signed distances in volatility units, extensions first.
    ///
    /// Extensions are `(level - close) / vol`, retracements
    /// `(close - level) / vol`, so positive reads "ahead in the expected
    /// direction" for the bullish pattern.
    pub fn distances(&self, close: f64, volatility: f64) -> [Option<f64>; 8] {
        let mut out = [None; 8];
        for (slot, level) in out.iter_mut().zip(self.extensions) {
            *slot = safe_div(level - close, volatility);
        }
        for (slot, level) in out[3..].iter_mut().zip(self.retracements) {
            *slot = safe_div(close - level, volatility);
        }
        out
    }
}

/// Division that yields `None` instead of a non-finite result.
pub(crate) fn safe_div(x: f64, y: f64) -> Option<f64> {
    if y == 0.0 || !y.is_finite() {
        return None;
    }
    let v = x / y;
    v.is_finite().then_some(v)
}
