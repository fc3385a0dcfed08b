//! Structural feature engine: one forward pass over a series.
//!
//! Per bar the pivot detector advances first, then support/resistance and
//! (once an A-B-C structure exists) Fibonacci distances are measured against
//! the pivots known at that bar. Missing measurements are forward-filled,
//! defaulted to 0 and clamped.

use super::fib::FibProjection;
use super::levels::{StructureLevel, LEVEL_COUNT};
use super::row::{finalize_rows, RawStructure, StructuralFeatureRow};
use super::support_resistance::NearestLevels;
use crate::domain::{Bar, Pivot};
use crate::error::{ensure_len, CoreError, CoreResult};
use crate::pivots::{PivotConfig, PivotDetector};
use crate::volatility::sanitize_volatility;
use serde::{Deserialize, Serialize};

/// Post-processing settings for structural features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Symmetric clamp applied to every distance, in volatility units.
    pub clamp: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { clamp: 50.0 }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.clamp.is_finite() && self.clamp > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "features.clamp must be positive, got {}",
                self.clamp
            )));
        }
        Ok(())
    }
}

/// Output of one structural pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralFeatures {
    pub rows: Vec<StructuralFeatureRow>,
    /// Final pivot list for the series.
    pub pivots: Vec<Pivot>,
    /// Guarded volatility actually used per bar.
    pub volatility: Vec<f64>,
    /// Number of bars that had a usable A-B-C structure.
    pub fib_bars: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralFeatureEngine {
    pub pivots: PivotConfig,
    pub features: FeatureConfig,
}

impl StructuralFeatureEngine {
    pub fn new(pivots: PivotConfig, features: FeatureConfig) -> Self {
        Self { pivots, features }
    }

    pub fn compute(&self, bars: &[Bar], volatility: &[f64]) -> CoreResult<StructuralFeatures> {
        ensure_len("volatility", bars.len(), volatility.len())?;
        self.pivots.validate()?;
        self.features.validate()?;

        let vol = sanitize_volatility(volatility);
        let mut detector = PivotDetector::new(self.pivots);
        let mut raw: Vec<RawStructure> = Vec::with_capacity(bars.len());
        let mut fib_bars = 0;

        for (bar, &v) in bars.iter().zip(&vol) {
            detector.push(bar.close, v);
            let (measured, has_fib) = measure_bar(&detector, bar.close, v);
            fib_bars += usize::from(has_fib);
            raw.push(measured);
        }

        let pivots = detector.into_pivots();
        tracing::debug!(
            bars = bars.len(),
            pivots = pivots.len(),
            fib_bars,
            "structural features computed"
        );

        Ok(StructuralFeatures {
            rows: finalize_rows(&raw, self.features.clamp),
            pivots,
            volatility: vol,
            fib_bars,
        })
    }
}

fn measure_bar(detector: &PivotDetector, close: f64, vol: f64) -> (RawStructure, bool) {
    let mut measured: RawStructure = [None; LEVEL_COUNT];
    let pivots = detector.pivots();
    if pivots.is_empty() {
        return (measured, false);
    }

    let sr = NearestLevels::around(pivots, close).distances(close, vol);
    for (slot, value) in measured[StructureLevel::Support1.index()..]
        .iter_mut()
        .zip(sr)
    {
        *slot = value;
    }

    let projection = detector
        .pivot_list()
        .last_three()
        .and_then(|abc| FibProjection::from_abc(&abc));
    let Some(projection) = projection else {
        return (measured, false);
    };
    for (slot, value) in measured.iter_mut().zip(projection.distances(close, vol)) {
        *slot = value;
    }
    (measured, true)
}
