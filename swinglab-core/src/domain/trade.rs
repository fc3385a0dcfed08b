//! TradeDecision and TradeOutcome — one simulated round trip.

use super::side::Side;
use serde::{Deserialize, Serialize};

/// An entry decision handed to the simulator.
///
/// Distances are in volatility units; the simulator converts them to prices
/// with the volatility at the entry bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    pub bar_index: usize,
    pub side: Side,
    pub target_distance: f64,
    pub stop_distance: f64,
}

/// Which barrier ended the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitKind {
    Target,
    Stop,
    /// Neither level was touched before the data (or the holding horizon) ran out.
    Timeout,
}

impl ExitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitKind::Target => "target",
            ExitKind::Stop => "stop",
            ExitKind::Timeout => "timeout",
        }
    }
}

/// Realized result of a simulated trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub side: Side,

    // ── Entry ──
    pub entry_bar_index: usize,
    pub entry_price: f64,
    /// Guarded volatility at the entry bar used to convert distances to prices.
    pub entry_volatility: f64,
    pub target_price: f64,
    pub stop_price: f64,

    // ── Exit ──
    pub exit_bar_index: usize,
    pub exit_price: f64,
    pub hit: ExitKind,

    // ── Result ──
    pub realized_pnl: f64,
    pub bars_held: usize,
}

impl TradeOutcome {
    /// Absolute target distance in price units.
    pub fn target_distance_abs(&self) -> f64 {
        (self.target_price - self.entry_price).abs()
    }

    /// Absolute stop distance in price units.
    pub fn stop_distance_abs(&self) -> f64 {
        (self.stop_price - self.entry_price).abs()
    }

    pub fn is_winner(&self) -> bool {
        self.realized_pnl > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outcome() -> TradeOutcome {
        TradeOutcome {
            side: Side::Long,
            entry_bar_index: 4,
            entry_price: 100.0,
            entry_volatility: 2.0,
            target_price: 104.0,
            stop_price: 98.0,
            exit_bar_index: 7,
            exit_price: 104.0,
            hit: ExitKind::Target,
            realized_pnl: 4.0,
            bars_held: 3,
        }
    }

    #[test]
    fn absolute_distances() {
        let o = sample_outcome();
        assert_eq!(o.target_distance_abs(), 4.0);
        assert_eq!(o.stop_distance_abs(), 2.0);
        assert!(o.is_winner());
    }

    #[test]
    fn outcome_serialization_roundtrip() {
        let o = sample_outcome();
        let json = serde_json::to_string(&o).unwrap();
        assert!(json.contains("\"target\""));
        let deser: TradeOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(o, deser);
    }
}
