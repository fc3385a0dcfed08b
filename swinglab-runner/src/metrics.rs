//! Outcome statistics — pure functions over simulated trades.

use serde::{Deserialize, Serialize};
use swinglab_core::domain::{ExitKind, TradeOutcome};

/// Aggregate statistics for one batch of simulated trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub trade_count: usize,
    pub targets: usize,
    pub stops: usize,
    pub timeouts: usize,
    pub win_rate: f64,
    /// Mean PnL in entry-volatility units.
    pub mean_pnl_vol: f64,
    pub total_reward: f64,
    pub mean_reward: f64,
    pub mean_bars_held: f64,
    pub max_consecutive_losses: usize,
}

impl OutcomeSummary {
    /// `rewards` pairs with `outcomes` by position.
    pub fn compute(outcomes: &[TradeOutcome], rewards: &[f64]) -> Self {
        let count_hits = |kind: ExitKind| outcomes.iter().filter(|o| o.hit == kind).count();
        let total_reward: f64 = rewards.iter().sum();
        Self {
            trade_count: outcomes.len(),
            targets: count_hits(ExitKind::Target),
            stops: count_hits(ExitKind::Stop),
            timeouts: count_hits(ExitKind::Timeout),
            win_rate: win_rate(outcomes),
            mean_pnl_vol: mean(outcomes.iter().map(|o| o.realized_pnl / o.entry_volatility)),
            total_reward,
            mean_reward: mean(rewards.iter().copied()),
            mean_bars_held: mean(outcomes.iter().map(|o| o.bars_held as f64)),
            max_consecutive_losses: max_consecutive_losses(outcomes),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Fraction of trades with positive PnL; 0 for no trades.
pub fn win_rate(outcomes: &[TradeOutcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().filter(|o| o.is_winner()).count() as f64 / outcomes.len() as f64
}

/// Longest run of non-winning trades in sequence.
pub fn max_consecutive_losses(outcomes: &[TradeOutcome]) -> usize {
    let mut best = 0;
    let mut run = 0;
    for o in outcomes {
        if o.is_winner() {
            run = 0;
        } else {
            run += 1;
            best = best.max(run);
        }
    }
    best
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swinglab_core::domain::Side;

    fn outcome(pnl: f64, hit: ExitKind, bars_held: usize) -> TradeOutcome {
        TradeOutcome {
            side: Side::Long,
            entry_bar_index: 0,
            entry_price: 100.0,
            entry_volatility: 2.0,
            target_price: 104.0,
            stop_price: 98.0,
            exit_bar_index: bars_held,
            exit_price: 100.0 + pnl,
            hit,
            realized_pnl: pnl,
            bars_held,
        }
    }

    #[test]
    fn summary_counts_and_means() {
        let outcomes = vec![
            outcome(4.0, ExitKind::Target, 3),
            outcome(-2.0, ExitKind::Stop, 1),
            outcome(-0.5, ExitKind::Timeout, 8),
            outcome(4.0, ExitKind::Target, 4),
        ];
        let s = OutcomeSummary::compute(&outcomes, &[1.0, -1.0, -0.5, 1.5]);
        assert_eq!(s.trade_count, 4);
        assert_eq!((s.targets, s.stops, s.timeouts), (2, 1, 1));
        assert_eq!(s.win_rate, 0.5);
        assert_eq!(s.total_reward, 1.0);
        assert_eq!(s.mean_reward, 0.25);
        assert_eq!(s.mean_bars_held, 4.0);
        // (2 - 1 - 0.25 + 2) / 4
        assert!((s.mean_pnl_vol - 0.6875).abs() < 1e-12);
        assert_eq!(s.max_consecutive_losses, 2);
    }

    #[test]
    fn empty_batch_is_all_zero() {
        assert_eq!(OutcomeSummary::compute(&[], &[]), OutcomeSummary::default());
    }
}
