//! FeatureTable — one series with every derived per-bar column attached.

use crate::domain::{Bar, Pivot};
use crate::error::{ensure_len, CoreError, CoreResult};
use crate::regime::{RegimeSignals, REGIME_COUNT};
use crate::scoring::{BarSuggestion, CandidateScorer};
use crate::structure::{StructuralFeatureEngine, StructuralFeatureRow, StructuralFeatures, LEVEL_COUNT};
use tracing::debug;

/// Length of one observation vector.
pub const OBSERVATION_LEN: usize = LEVEL_COUNT + REGIME_COUNT + 2;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub symbol: String,
    pub bars: Vec<Bar>,
    /// Volatility as supplied; the simulator guards it at entry.
    pub raw_volatility: Vec<f64>,
    /// Guarded volatility used by the structural pass.
    pub volatility: Vec<f64>,
    pub regime: Vec<RegimeSignals>,
    pub structure: Vec<StructuralFeatureRow>,
    pub suggestions: Vec<BarSuggestion>,
    pub pivots: Vec<Pivot>,
}

impl FeatureTable {
    /// Run the structural pass and the scorer sequentially.
    pub fn build(
        symbol: impl Into<String>,
        bars: Vec<Bar>,
        raw_volatility: Vec<f64>,
        regime: Vec<RegimeSignals>,
        engine: &StructuralFeatureEngine,
        scorer: &CandidateScorer,
    ) -> CoreResult<Self> {
        let structure = engine.compute(&bars, &raw_volatility)?;
        let suggestions = scorer.score_series(&structure.rows, &regime)?;
        Self::from_parts(symbol, bars, raw_volatility, regime, structure, suggestions)
    }

    /// Assemble from precomputed parts (e.g. suggestions scored in parallel).
    pub fn from_parts(
        symbol: impl Into<String>,
        bars: Vec<Bar>,
        raw_volatility: Vec<f64>,
        regime: Vec<RegimeSignals>,
        structure: StructuralFeatures,
        suggestions: Vec<BarSuggestion>,
    ) -> CoreResult<Self> {
        if bars.is_empty() {
            return Err(CoreError::EmptySeries);
        }
        let n = bars.len();
        ensure_len("volatility", n, raw_volatility.len())?;
        ensure_len("regime signals", n, regime.len())?;
        ensure_len("structural rows", n, structure.rows.len())?;
        ensure_len("suggestions", n, suggestions.len())?;

        let symbol = symbol.into();
        debug!(
            symbol = %symbol,
            bars = n,
            pivots = structure.pivots.len(),
            fib_bars = structure.fib_bars,
            "feature table assembled"
        );
        Ok(Self {
            symbol,
            bars,
            raw_volatility,
            volatility: structure.volatility,
            regime,
            structure: structure.rows,
            suggestions,
            pivots: structure.pivots,
        })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Observation for bar `index`: structural row, regime signals, then the
    /// preferred side's suggested target and stop multipliers.
    pub fn observation(&self, index: usize) -> Option<[f64; OBSERVATION_LEN]> {
        let row = self.structure.get(index)?;
        let regime = self.regime.get(index)?;
        let suggested = self.suggestions.get(index)?.suggested();

        let mut obs = [0.0; OBSERVATION_LEN];
        obs[..LEVEL_COUNT].copy_from_slice(&row.values);
        obs[LEVEL_COUNT..LEVEL_COUNT + REGIME_COUNT].copy_from_slice(&regime.values());
        obs[OBSERVATION_LEN - 2] = suggested.take_profit.multiplier;
        obs[OBSERVATION_LEN - 1] = suggested.stop_loss.multiplier;
        Some(obs)
    }

    /// Column names matching [`FeatureTable::observation`].
    pub fn observation_columns() -> Vec<&'static str> {
        let mut cols: Vec<&'static str> = crate::structure::StructureLevel::ALL
            .iter()
            .map(|l| l.column_name())
            .collect();
        cols.extend(RegimeSignals::COLUMNS);
        cols.push("tp_mult_suggested");
        cols.push("sl_mult_suggested");
        cols
    }
}
