//! Incremental zig-zag pivot detector.
//!
//! One detector owns the swing state and pivot list of exactly one series.
//! Bars are pushed in order; the pivot list is readable after every push, so
//! the structural feature pass can see the pivots "as of" each bar.

use super::list::{PivotList, PivotUpdate};
use super::swing::{SwingState, Transition};
use crate::domain::{Bar, Pivot};
use crate::error::{ensure_len, CoreError, CoreResult};
use crate::volatility::VolatilityGuard;
use serde::{Deserialize, Serialize};

/// Reversal threshold configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    /// Reversal threshold as a multiple of the bar's volatility.
    pub atr_multiplier: f64,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            atr_multiplier: 3.0,
        }
    }
}

impl PivotConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.atr_multiplier.is_finite() && self.atr_multiplier > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "pivots.atr_multiplier must be positive, got {}",
                self.atr_multiplier
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PivotDetector {
    config: PivotConfig,
    state: SwingState,
    guard: VolatilityGuard,
    pivots: PivotList,
    bars_seen: usize,
}

impl PivotDetector {
    pub fn new(config: PivotConfig) -> Self {
        Self {
            config,
            state: SwingState::unset(),
            guard: VolatilityGuard::new(),
            pivots: PivotList::new(),
            bars_seen: 0,
        }
    }

    /// Feed the next bar. Returns the pivot confirmed by this bar, if any.
    pub fn push(&mut self, close: f64, raw_volatility: f64) -> Option<Pivot> {
        let bar_index = self.bars_seen;
        self.bars_seen += 1;

        let volatility = self.guard.resolve(raw_volatility);
        let reversal = self.config.atr_multiplier * volatility;
        let (next, transition) = self.state.step(bar_index, close, reversal);
        self.state = next;

        let Transition::Reversed(pivot) = transition else {
            return None;
        };
        if self.pivots.record(pivot) == PivotUpdate::Extended {
            tracing::debug!(
                kind = pivot.kind.tag(),
                bar = pivot.bar_index,
                price = pivot.price,
                "pivot extended in place"
            );
        }
        Some(pivot)
    }

    pub fn pivots(&self) -> &[Pivot] {
        self.pivots.as_slice()
    }

    pub fn pivot_list(&self) -> &PivotList {
        &self.pivots
    }

    pub fn state(&self) -> SwingState {
        self.state
    }

    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }

    pub fn into_pivots(self) -> Vec<Pivot> {
        self.pivots.into_vec()
    }
}

/// Run the detector over a whole series and return the final pivot list.
pub fn detect_pivots(
    bars: &[Bar],
    volatility: &[f64],
    config: &PivotConfig,
) -> CoreResult<Vec<Pivot>> {
    ensure_len("volatility", bars.len(), volatility.len())?;
    config.validate()?;
    let mut detector = PivotDetector::new(*config);
    for (bar, &vol) in bars.iter().zip(volatility) {
        detector.push(bar.close, vol);
    }
    Ok(detector.into_pivots())
}
