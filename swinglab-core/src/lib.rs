//! SwingLab Core — structural features and trade simulation for swing entries.
//!
//! Data flows strictly forward, one series at a time:
//! - Bars and a volatility series feed a zig-zag pivot detector
//! - Pivots become Fibonacci and support/resistance distances per bar
//! - Distances plus precomputed regime signals are scored into target/stop
//!   candidates for both sides
//! - A barrier-hit simulator turns an entry decision into an outcome, and the
//!   reward function turns the outcome into a bounded scalar
//! - [`episode::TradingEpisode`] steps the whole thing for an external learner

pub mod domain;
pub mod episode;
pub mod error;
pub mod indicators;
pub mod math;
pub mod pivots;
pub mod regime;
pub mod scoring;
pub mod simulation;
pub mod structure;
pub mod table;
pub mod volatility;

pub use error::{CoreError, CoreResult};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything shared across runner threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Pivot>();
        require_sync::<domain::Pivot>();
        require_send::<domain::TradeDecision>();
        require_sync::<domain::TradeDecision>();
        require_send::<domain::TradeOutcome>();
        require_sync::<domain::TradeOutcome>();

        // Pipeline stages
        require_send::<pivots::PivotDetector>();
        require_sync::<pivots::PivotDetector>();
        require_send::<structure::StructuralFeatureEngine>();
        require_sync::<structure::StructuralFeatureEngine>();
        require_send::<structure::StructuralFeatureRow>();
        require_sync::<structure::StructuralFeatureRow>();
        require_send::<regime::RegimeSignals>();
        require_sync::<regime::RegimeSignals>();
        require_send::<scoring::CandidateScorer>();
        require_sync::<scoring::CandidateScorer>();
        require_send::<scoring::BarSuggestion>();
        require_sync::<scoring::BarSuggestion>();
        require_send::<simulation::TradeSimulator>();
        require_sync::<simulation::TradeSimulator>();
        require_send::<simulation::RewardFunction>();
        require_sync::<simulation::RewardFunction>();
        require_send::<table::FeatureTable>();
        require_sync::<table::FeatureTable>();
        require_send::<episode::TradingEpisode<'static>>();
        require_sync::<episode::TradingEpisode<'static>>();

        require_send::<CoreError>();
        require_sync::<CoreError>();
    }

    /// The scorer sees only structural rows and regime signals: no bars and
    /// no future data. If this compiles the signature still enforces that.
    #[test]
    fn scorer_has_no_access_to_bars() {
        fn _check(
            scorer: &scoring::CandidateScorer,
            row: &structure::StructuralFeatureRow,
            signals: &regime::RegimeSignals,
        ) -> scoring::BarSuggestion {
            scorer.score_bar(row, signals)
        }
    }
}
