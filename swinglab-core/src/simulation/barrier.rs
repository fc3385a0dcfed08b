//! Barrier-hit trade simulation.
//!
//! The entry fills at the entry bar's close. Every later bar is checked
//! against both barriers; when one bar spans both, the configured intrabar
//! order decides which one fired.

use crate::domain::{Bar, ExitKind, Side, TradeDecision, TradeOutcome};
use crate::error::{ensure_len, CoreError, CoreResult};
use crate::volatility::volatility_at;
use serde::{Deserialize, Serialize};

/// Which barrier wins when a single bar touches both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntrabarOrder {
    /// Target is checked first.
    #[default]
    TargetFirst,
    /// Adverse ordering: the stop is checked first.
    StopFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Bars after entry before a forced Timeout; `None` scans to the end.
    pub max_holding_bars: Option<usize>,
    pub intrabar: IntrabarOrder,
}

impl SimulationConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_holding_bars == Some(0) {
            return Err(CoreError::InvalidConfig(
                "simulation.max_holding_bars must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Stateless across decisions; safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeSimulator {
    config: SimulationConfig,
}

impl TradeSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate one decision.
    ///
    /// `volatility` is the raw per-bar series; the guard is applied at the
    /// entry bar. Timeout is a normal outcome, not an error.
    pub fn simulate(
        &self,
        bars: &[Bar],
        volatility: &[f64],
        decision: &TradeDecision,
    ) -> CoreResult<TradeOutcome> {
        ensure_len("volatility", bars.len(), volatility.len())?;
        check_distance("target", decision.target_distance)?;
        check_distance("stop", decision.stop_distance)?;

        let entry_index = decision.bar_index;
        let entry_bar = bars.get(entry_index).ok_or(CoreError::EntryOutOfRange {
            index: entry_index,
            len: bars.len(),
        })?;
        let vol = volatility_at(volatility, entry_index).ok_or(CoreError::EntryOutOfRange {
            index: entry_index,
            len: volatility.len(),
        })?;

        let side = decision.side;
        let entry_price = entry_bar.close;
        let target_price = entry_price + side.sign() * decision.target_distance * vol;
        let stop_price = entry_price - side.sign() * decision.stop_distance * vol;

        let last = match self.config.max_holding_bars {
            Some(h) => entry_index.saturating_add(h).min(bars.len() - 1),
            None => bars.len() - 1,
        };

        let mut exit_index = entry_index;
        let mut exit_price = entry_price;
        let mut hit = ExitKind::Timeout;
        for (offset, bar) in bars[entry_index + 1..=last].iter().enumerate() {
            exit_index = entry_index + 1 + offset;
            if let Some(kind) = self.touched(bar, side, target_price, stop_price) {
                hit = kind;
                exit_price = match kind {
                    ExitKind::Target => target_price,
                    _ => stop_price,
                };
                break;
            }
            exit_price = bar.close;
        }

        Ok(TradeOutcome {
            side,
            entry_bar_index: entry_index,
            entry_price,
            entry_volatility: vol,
            target_price,
            stop_price,
            exit_bar_index: exit_index,
            exit_price,
            hit,
            realized_pnl: (exit_price - entry_price) * side.sign(),
            bars_held: exit_index - entry_index,
        })
    }

    fn touched(&self, bar: &Bar, side: Side, target: f64, stop: f64) -> Option<ExitKind> {
        let (target_hit, stop_hit) = match side {
            Side::Long => (bar.high >= target, bar.low <= stop),
            Side::Short => (bar.low <= target, bar.high >= stop),
        };
        match (self.config.intrabar, target_hit, stop_hit) {
            (IntrabarOrder::TargetFirst, true, _) => Some(ExitKind::Target),
            (IntrabarOrder::StopFirst, _, true) => Some(ExitKind::Stop),
            (_, true, false) => Some(ExitKind::Target),
            (_, false, true) => Some(ExitKind::Stop),
            _ => None,
        }
    }
}

fn check_distance(what: &'static str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidDistance { what, value })
    }
}

/// Convenience wrapper with the default configuration.
pub fn simulate_trade(
    bars: &[Bar],
    volatility: &[f64],
    decision: &TradeDecision,
) -> CoreResult<TradeOutcome> {
    TradeSimulator::default().simulate(bars, volatility, decision)
}
