//! CandidateScorer — picks the best-supported target/stop pair per side.

use super::candidate::{
    argmax, Candidate, CandidateLabel, CandidateSet, SL_CANDIDATES, TP_CANDIDATES,
};
use super::context::ScoringContext;
use crate::domain::Side;
use crate::error::{ensure_len, CoreError, CoreResult};
use crate::math::clamp01;
use crate::regime::RegimeSignals;
use crate::structure::StructuralFeatureRow;
use serde::{Deserialize, Serialize};

/// Added to every candidate distance so none is exactly zero.
pub const DISTANCE_EPSILON: f64 = 1e-6;

/// Upper bound applied to support/resistance candidate distances.
const SR_DISTANCE_CAP: f64 = 50.0;

/// Retracement stop bonuses, deeper levels favoured.
const RETRACEMENT_BONUS: [f64; 5] = [0.05, 0.10, 0.12, 0.15, 0.18];

/// Clamp bounds for the winning multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub tp_min: f64,
    pub tp_max: f64,
    pub sl_min: f64,
    pub sl_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tp_min: 0.8,
            tp_max: 3.0,
            sl_min: 0.5,
            sl_max: 1.6,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> CoreResult<()> {
        check_bounds("scoring.tp", self.tp_min, self.tp_max)?;
        check_bounds("scoring.sl", self.sl_min, self.sl_max)
    }

    pub fn clamp_target(&self, distance: f64) -> f64 {
        distance.clamp(self.tp_min, self.tp_max)
    }

    pub fn clamp_stop(&self, distance: f64) -> f64 {
        distance.clamp(self.sl_min, self.sl_max)
    }
}

pub(crate) fn check_bounds(what: &str, min: f64, max: f64) -> CoreResult<()> {
    if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig(format!(
            "{what} bounds must satisfy 0 < min <= max, got [{min}, {max}]"
        )))
    }
}

/// A winning candidate with its clamped distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub label: CandidateLabel,
    /// Winner distance after clamping to the configured bounds.
    pub multiplier: f64,
    pub score: f64,
}

/// Candidates and winners for one side of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideSuggestion {
    pub side: Side,
    pub candidates: CandidateSet,
    pub take_profit: Selection,
    pub stop_loss: Selection,
}

/// Both sides for one bar plus the preferred direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSuggestion {
    pub long: SideSuggestion,
    pub short: SideSuggestion,
    pub preferred: Side,
}

impl BarSuggestion {
    pub fn for_side(&self, side: Side) -> &SideSuggestion {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }

    /// The `tp_mult_suggested` / `sl_mult_suggested` pair.
    pub fn suggested(&self) -> &SideSuggestion {
        self.for_side(self.preferred)
    }
}

/// Long when `conf_dir >= 0`, short otherwise.
pub fn preferred_side(conf_dir: f64) -> Side {
    if conf_dir >= 0.0 {
        Side::Long
    } else {
        Side::Short
    }
}

/// Pure per-bar scorer. Holds only the clamp bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateScorer {
    config: ScoringConfig,
}

impl CandidateScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score both sides of one bar.
    pub fn score_bar(&self, row: &StructuralFeatureRow, signals: &RegimeSignals) -> BarSuggestion {
        let ctx = ScoringContext::from_signals(signals);
        BarSuggestion {
            long: self.score_side(row, &ctx, Side::Long),
            short: self.score_side(row, &ctx, Side::Short),
            preferred: preferred_side(signals.conf_dir),
        }
    }

    /// Score a whole series; rows and signals must line up.
    pub fn score_series(
        &self,
        rows: &[StructuralFeatureRow],
        signals: &[RegimeSignals],
    ) -> CoreResult<Vec<BarSuggestion>> {
        ensure_len("regime signals", rows.len(), signals.len())?;
        Ok(rows
            .iter()
            .zip(signals)
            .map(|(row, s)| self.score_bar(row, s))
            .collect())
    }

    pub fn score_side(
        &self,
        row: &StructuralFeatureRow,
        ctx: &ScoringContext,
        side: Side,
    ) -> SideSuggestion {
        let candidates = CandidateSet {
            take_profit: take_profit_candidates(row, ctx, side),
            stop_loss: stop_loss_candidates(row, ctx, side),
        };
        let tp = candidates.take_profit[argmax(&candidates.take_profit)];
        let sl = candidates.stop_loss[argmax(&candidates.stop_loss)];
        SideSuggestion {
            side,
            candidates,
            take_profit: Selection {
                label: tp.label,
                multiplier: self.config.clamp_target(tp.distance),
                score: tp.score,
            },
            stop_loss: Selection {
                label: sl.label,
                multiplier: self.config.clamp_stop(sl.distance),
                score: sl.score,
            },
        }
    }
}

/// `(level in the profit direction, level in the loss direction)` pairs.
fn side_levels(side: Side) -> ([CandidateLabel; 2], [CandidateLabel; 2]) {
    match side {
        Side::Long => (
            [CandidateLabel::R1, CandidateLabel::R2],
            [CandidateLabel::S1, CandidateLabel::S2],
        ),
        Side::Short => (
            [CandidateLabel::S1, CandidateLabel::S2],
            [CandidateLabel::R1, CandidateLabel::R2],
        ),
    }
}

fn fib_distance(row: &StructuralFeatureRow, label: CandidateLabel) -> f64 {
    row.get(label.level()).abs()
}

fn sr_distance(row: &StructuralFeatureRow, label: CandidateLabel) -> f64 {
    row.get(label.level()).clamp(0.0, SR_DISTANCE_CAP)
}

fn take_profit_candidates(
    row: &StructuralFeatureRow,
    ctx: &ScoringContext,
    side: Side,
) -> [Candidate; TP_CANDIDATES] {
    let bias = ctx.bias(side);
    let (profit_levels, _) = side_levels(side);
    // the nearest level in the trade direction caps the extensions
    let opposing = sr_distance(row, profit_levels[0]);

    let extension = |label: CandidateLabel| {
        let d = fib_distance(row, label);
        let blocked = if opposing < d { 1.0 } else { 0.0 };
        let score = clamp01(
            0.35 * ctx.tp_reach(d) + 0.35 * bias + 0.15 * ctx.obv_reliability
                - 0.30 * blocked
                - 0.20 * ctx.sr_strength,
        );
        Candidate {
            label,
            distance: d + DISTANCE_EPSILON,
            score,
        }
    };
    let level = |label: CandidateLabel, w: [f64; 4]| {
        let d = sr_distance(row, label);
        let score = clamp01(
            w[0] * ctx.tp_reach(d) + w[1] * bias + w[2] * ctx.obv_reliability
                - w[3] * ctx.sr_strength,
        );
        Candidate {
            label,
            distance: d + DISTANCE_EPSILON,
            score,
        }
    };

    [
        extension(CandidateLabel::F127),
        extension(CandidateLabel::F161),
        extension(CandidateLabel::F200),
        level(profit_levels[0], [0.30, 0.40, 0.10, 0.35]),
        level(profit_levels[1], [0.25, 0.35, 0.10, 0.30]),
    ]
}

fn stop_loss_candidates(
    row: &StructuralFeatureRow,
    ctx: &ScoringContext,
    side: Side,
) -> [Candidate; SL_CANDIDATES] {
    let (_, loss_levels) = side_levels(side);
    let level = |label: CandidateLabel, bonus: f64| {
        let d = sr_distance(row, label);
        Candidate {
            label,
            distance: d + DISTANCE_EPSILON,
            score: ctx.sl_reach(d, bonus),
        }
    };
    let retracement = |label: CandidateLabel, bonus: f64| {
        let d = fib_distance(row, label);
        Candidate {
            label,
            distance: d + DISTANCE_EPSILON,
            score: ctx.sl_reach(d, bonus),
        }
    };

    [
        level(loss_levels[0], 0.20 * ctx.sr_strength),
        level(loss_levels[1], 0.15 * ctx.sr_strength),
        retracement(CandidateLabel::Ret236, RETRACEMENT_BONUS[0]),
        retracement(CandidateLabel::Ret382, RETRACEMENT_BONUS[1]),
        retracement(CandidateLabel::Ret500, RETRACEMENT_BONUS[2]),
        retracement(CandidateLabel::Ret618, RETRACEMENT_BONUS[3]),
        retracement(CandidateLabel::Ret786, RETRACEMENT_BONUS[4]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::StructureLevel;

    fn labels<const N: usize>(set: &[Candidate; N]) -> Vec<&'static str> {
        set.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn candidate_order_is_canonical() {
        let scorer = CandidateScorer::default();
        let s = scorer.score_bar(&StructuralFeatureRow::default(), &RegimeSignals::default());
        assert_eq!(
            labels(&s.long.candidates.take_profit),
            ["F127", "F161", "F200", "R1", "R2"]
        );
        assert_eq!(
            labels(&s.short.candidates.take_profit),
            ["F127", "F161", "F200", "S1", "S2"]
        );
        assert_eq!(
            labels(&s.long.candidates.stop_loss),
            ["S1", "S2", "RET236", "RET382", "RET500", "RET618", "RET786"]
        );
        assert_eq!(labels(&s.short.candidates.stop_loss)[..2], ["R1", "R2"]);
    }

    #[test]
    fn all_zero_row_ties_resolve_to_earliest_and_clamp_to_bounds() {
        let scorer = CandidateScorer::default();
        let s = scorer.score_bar(&StructuralFeatureRow::default(), &RegimeSignals::default());
        assert_eq!(s.long.take_profit.label, CandidateLabel::F127);
        assert_eq!(s.long.stop_loss.label, CandidateLabel::S1);
        assert_eq!(s.short.stop_loss.label, CandidateLabel::R1);
        assert_eq!(s.long.take_profit.multiplier, 0.8);
        assert_eq!(s.long.stop_loss.multiplier, 0.5);
        assert_eq!(s.preferred, Side::Long);
    }

    #[test]
    fn downtrend_confidence_still_supports_long_targets() {
        let row = StructuralFeatureRow::from_pairs(&[
            (StructureLevel::FibExt127, 1.0),
            (StructureLevel::Resistance1, 2.0),
        ]);
        let signals = RegimeSignals {
            trend_conf: 1.0,
            trend_dir: -1.0,
            ..RegimeSignals::with_confidence(0.8)
        };
        let s = CandidateScorer::default().score_bar(&row, &signals);
        // allow_far .79, reach .352053, bias .5, not blocked
        let f127 = s.long.candidates.take_profit[0].score;
        assert!((f127 - 0.298218).abs() < 1e-6, "got {f127}");
    }

    #[test]
    fn distances_use_abs_for_fib_and_cap_for_levels() {
        let row = StructuralFeatureRow::from_pairs(&[
            (StructureLevel::FibExt127, -2.0),
            (StructureLevel::Resistance1, -1.0),
            (StructureLevel::Resistance2, 60.0),
        ]);
        let scorer = CandidateScorer::default();
        let s = scorer.score_bar(&row, &RegimeSignals::default());
        let tp = &s.long.candidates.take_profit;
        assert!((tp[0].distance - (2.0 + DISTANCE_EPSILON)).abs() < 1e-12);
        assert!((tp[3].distance - DISTANCE_EPSILON).abs() < 1e-12);
        assert!((tp[4].distance - (SR_DISTANCE_CAP + DISTANCE_EPSILON)).abs() < 1e-12);
    }

    #[test]
    fn closer_opposing_level_blocks_extensions() {
        let row = StructuralFeatureRow::from_pairs(&[
            (StructureLevel::FibExt127, 2.0),
            (StructureLevel::Resistance1, 1.0),
            (StructureLevel::Support1, 5.0),
        ]);
        let s = CandidateScorer::default().score_bar(&row, &RegimeSignals::default());
        let long_f127 = s.long.candidates.take_profit[0].score;
        let short_f127 = s.short.candidates.take_profit[0].score;
        // only the long side is capped by a closer R1
        assert_eq!(long_f127, 0.0);
        assert!(short_f127 > 0.0);
    }

    #[test]
    fn winners_clamp_to_upper_bounds() {
        let row = StructuralFeatureRow::from_pairs(&[
            (StructureLevel::FibExt127, 10.0),
            (StructureLevel::FibExt161, 12.0),
            (StructureLevel::FibExt200, 15.0),
            (StructureLevel::Resistance1, 20.0),
            (StructureLevel::Resistance2, 30.0),
            (StructureLevel::Support1, 8.0),
            (StructureLevel::Support2, 9.0),
            (StructureLevel::FibRet236, 7.0),
            (StructureLevel::FibRet382, 7.5),
            (StructureLevel::FibRet500, 8.0),
            (StructureLevel::FibRet618, 8.5),
            (StructureLevel::FibRet786, 9.0),
        ]);
        let s = CandidateScorer::default().score_bar(&row, &RegimeSignals::default());
        assert_eq!(s.long.take_profit.multiplier, 3.0);
        assert_eq!(s.long.stop_loss.multiplier, 1.6);
    }

    #[test]
    fn negative_conviction_prefers_short() {
        let signals = RegimeSignals::with_confidence(-0.6);
        let s = CandidateScorer::default().score_bar(&StructuralFeatureRow::default(), &signals);
        assert_eq!(s.preferred, Side::Short);
        assert_eq!(s.suggested().side, Side::Short);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let row = StructuralFeatureRow::from_pairs(&[
            (StructureLevel::FibExt127, 1.0),
            (StructureLevel::Support1, 0.5),
        ]);
        let signals = RegimeSignals {
            sr_strength: 1.0,
            range_chop_flag: 1.0,
            ..RegimeSignals::with_confidence(1.0)
        };
        let s = CandidateScorer::default().score_bar(&row, &signals);
        for c in s.long.candidates.take_profit.iter().chain(&s.long.candidates.stop_loss) {
            assert!((0.0..=1.0).contains(&c.score), "{c:?}");
        }
    }

    #[test]
    fn series_length_must_match() {
        let scorer = CandidateScorer::default();
        let rows = vec![StructuralFeatureRow::default(); 3];
        let signals = vec![RegimeSignals::default(); 2];
        assert!(matches!(
            scorer.score_series(&rows, &signals),
            Err(CoreError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn config_rejects_inverted_bounds() {
        let bad = ScoringConfig {
            tp_min: 3.0,
            tp_max: 1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(ScoringConfig::default().validate().is_ok());
    }
}
