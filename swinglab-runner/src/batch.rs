//! Batch simulation: many independent decisions over one feature table.
//!
//! Decisions share no state, so they run on the rayon pool and come back in
//! input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use swinglab_core::domain::{TradeDecision, TradeOutcome};
use swinglab_core::simulation::{RewardFunction, RewardInputs, TradeSimulator};
use swinglab_core::table::FeatureTable;
use swinglab_core::CoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredOutcome {
    pub decision: TradeDecision,
    pub outcome: TradeOutcome,
    pub reward: f64,
}

/// The scorer's preferred-side suggestion at every bar whose
/// `|confidence|` clears `conf_threshold`; the final bar is skipped.
pub fn suggested_decisions(table: &FeatureTable, conf_threshold: f64) -> Vec<TradeDecision> {
    let last = table.len().saturating_sub(1);
    table
        .suggestions
        .iter()
        .zip(&table.regime)
        .enumerate()
        .take(last)
        .filter(|(_, (_, signals))| signals.confidence.abs() >= conf_threshold)
        .map(|(i, (suggestion, _))| {
            let s = suggestion.suggested();
            TradeDecision {
                bar_index: i,
                side: s.side,
                target_distance: s.take_profit.multiplier,
                stop_distance: s.stop_loss.multiplier,
            }
        })
        .collect()
}

/// Simulate and reward every decision in parallel.
pub fn simulate_batch(
    table: &FeatureTable,
    decisions: &[TradeDecision],
    simulator: &TradeSimulator,
    reward: &RewardFunction,
) -> CoreResult<Vec<ScoredOutcome>> {
    decisions
        .par_iter()
        .map(|decision| {
            let outcome = simulator.simulate(&table.bars, &table.raw_volatility, decision)?;
            let signals = &table.regime[outcome.entry_bar_index];
            let r = reward.reward(&RewardInputs::from_outcome(&outcome, signals));
            Ok(ScoredOutcome {
                decision: *decision,
                outcome,
                reward: r,
            })
        })
        .collect()
}
