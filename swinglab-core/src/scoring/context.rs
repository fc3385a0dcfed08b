//! Scoring context: regime gates, directional bias and reach transforms.

use crate::domain::Side;
use crate::math::{clamp01, tanh_scaled};
use crate::regime::RegimeSignals;

/// Saturation scale of the take-profit reach transform.
const TP_REACH_SCALE: f64 = 4.0;
/// Saturation scale of the stop-loss reach transform.
const SL_REACH_SCALE: f64 = 3.0;

/// Per-bar gates derived once from the regime signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    /// How far a target may reasonably reach.
    pub allow_far: f64,
    /// Penalty on every target for adverse context.
    pub context_risk: f64,
    /// Preference for tight stops when conviction is low.
    pub base_risk: f64,
    pub long_bias: f64,
    pub short_bias: f64,
    pub chop: f64,
    pub obv_reliability: f64,
    pub sr_strength: f64,
}

impl ScoringContext {
    pub fn from_signals(s: &RegimeSignals) -> Self {
        let chop = s.range_chop_flag;
        let allow_far = clamp01(
            0.55 * s.conf_str + 0.35 * s.trend_conf + 0.10 * s.obv_pressure
                - 0.30 * chop
                - 0.20 * s.bb_breakout_risky,
        );
        let context_risk = clamp01(
            0.35 * chop
                + 0.25 * s.bb_breakout_risky
                + 0.20 * s.macd_conflict
                + 0.20 * s.rsi_fade_risky,
        );
        let base_risk = clamp01(1.0 - (0.6 * s.conf_str + 0.4 * s.trend_conf));

        // trend confidence feeds both sides; direction comes from the oscillators
        let long_bias =
            clamp01(0.5 * s.trend_conf + 0.25 * s.macd_bullish + 0.25 * s.rsi_long_bias);
        let short_bias =
            clamp01(0.5 * s.trend_conf + 0.25 * s.macd_bearish + 0.25 * s.rsi_short_bias);

        Self {
            allow_far,
            context_risk,
            base_risk,
            long_bias,
            short_bias,
            chop,
            obv_reliability: s.obv_reliability,
            sr_strength: s.sr_strength,
        }
    }

    pub fn bias(&self, side: Side) -> f64 {
        match side {
            Side::Long => self.long_bias,
            Side::Short => self.short_bias,
        }
    }

    /// Reachability of a target `distance` volatility units away.
    pub fn tp_reach(&self, distance: f64) -> f64 {
        let t = tanh_scaled(distance, TP_REACH_SCALE);
        clamp01(self.allow_far * t + (1.0 - self.allow_far) * (1.0 - t) - 0.3 * self.context_risk)
    }

    /// Suitability of a stop `distance` away, plus a structural `bonus`.
    pub fn sl_reach(&self, distance: f64, bonus: f64) -> f64 {
        let t = tanh_scaled(distance, SL_REACH_SCALE);
        clamp01(self.base_risk * (1.0 - t) + (1.0 - self.base_risk) * t + bonus - 0.25 * self.chop)
    }
}
