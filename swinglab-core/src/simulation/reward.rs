//! Reward shaping for a simulated trade.
//!
//! PnL is normalized by entry volatility, losses are amplified, then
//! conviction and target/stop geometry nudge the value before news damping
//! and a sentiment term. The result is always finite and within `±clip`.

use crate::domain::TradeOutcome;
use crate::error::{CoreError, CoreResult};
use crate::math::sign;
use crate::regime::RegimeSignals;
use serde::{Deserialize, Serialize};

/// Guard added to denominators.
const DENOM_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Multiplier applied to negative normalized PnL.
    pub loss_multiplier: f64,
    pub conviction_weight: f64,
    /// Weight of the target/stop ratio term.
    pub geometry_weight: f64,
    /// Fractional damping at full news intensity.
    pub news_damping: f64,
    pub sentiment_weight: f64,
    pub clip: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            loss_multiplier: 1.5,
            conviction_weight: 0.5,
            geometry_weight: 0.2,
            news_damping: 0.2,
            sentiment_weight: 0.1,
            clip: 3.0,
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let weights = [
            ("reward.loss_multiplier", self.loss_multiplier),
            ("reward.conviction_weight", self.conviction_weight),
            ("reward.geometry_weight", self.geometry_weight),
            ("reward.news_damping", self.news_damping),
            ("reward.sentiment_weight", self.sentiment_weight),
        ];
        for (name, w) in weights {
            if !(w.is_finite() && w >= 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {w}"
                )));
            }
        }
        if !(self.clip.is_finite() && self.clip > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "reward.clip must be positive, got {}",
                self.clip
            )));
        }
        Ok(())
    }
}

/// Everything the reward needs, decoupled from the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardInputs {
    pub pnl: f64,
    pub volatility: f64,
    /// Signed confidence at entry.
    pub confidence: f64,
    /// Absolute target distance in price units.
    pub target_distance: f64,
    /// Absolute stop distance in price units.
    pub stop_distance: f64,
    pub sentiment: f64,
    pub news_intensity: f64,
}

impl RewardInputs {
    /// Inputs for `outcome`, with context taken from the entry bar's signals.
    pub fn from_outcome(outcome: &TradeOutcome, signals: &RegimeSignals) -> Self {
        Self {
            pnl: outcome.realized_pnl,
            volatility: outcome.entry_volatility,
            confidence: signals.confidence,
            target_distance: outcome.target_distance_abs(),
            stop_distance: outcome.stop_distance_abs(),
            sentiment: signals.sentiment,
            news_intensity: signals.news_intensity,
        }
    }
}

/// Intermediate terms, kept for logging and export.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub normalized_pnl: f64,
    pub conviction: f64,
    pub geometry: f64,
    pub reward: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RewardFunction {
    config: RewardConfig,
}

impl RewardFunction {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn reward(&self, inputs: &RewardInputs) -> f64 {
        self.breakdown(inputs).reward
    }

    pub fn breakdown(&self, inputs: &RewardInputs) -> RewardBreakdown {
        let c = &self.config;
        let pnl_sign = sign(inputs.pnl);

        let mut normalized_pnl = inputs.pnl / (inputs.volatility + DENOM_EPSILON);
        if normalized_pnl < 0.0 {
            normalized_pnl *= c.loss_multiplier;
        }
        let conviction = c.conviction_weight * inputs.confidence * pnl_sign;
        let direction = if inputs.pnl > 0.0 { 1.0 } else { -1.0 };
        let geometry = c.geometry_weight
            * (inputs.target_distance / (inputs.stop_distance + DENOM_EPSILON))
            * direction;

        let base = normalized_pnl + conviction + geometry;
        let shaped = base * (1.0 - c.news_damping * inputs.news_intensity)
            + c.sentiment_weight * inputs.sentiment * pnl_sign;

        let reward = if shaped.is_nan() {
            0.0
        } else {
            shaped.clamp(-c.clip, c.clip)
        };
        RewardBreakdown {
            normalized_pnl,
            conviction,
            geometry,
            reward,
        }
    }
}

/// Reward with the default weights.
pub fn reward(inputs: &RewardInputs) -> f64 {
    RewardFunction::default().reward(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    fn inputs(pnl: f64) -> RewardInputs {
        RewardInputs {
            pnl,
            volatility: 2.0,
            confidence: 0.5,
            target_distance: 3.0,
            stop_distance: 1.5,
            ..Default::default()
        }
    }

    #[test]
    fn winning_trade() {
        // 1.0 + 0.25 + 0.4
        assert_approx(reward(&inputs(2.0)), 1.65);
    }

    #[test]
    fn losing_trade_is_amplified() {
        // -1.5 - 0.25 - 0.4
        assert_approx(reward(&inputs(-2.0)), -2.15);
    }

    #[test]
    fn flat_trade_only_pays_geometry_penalty() {
        assert_approx(reward(&inputs(0.0)), -0.4);
    }

    #[test]
    fn news_damps_and_sentiment_nudges() {
        let r = reward(&RewardInputs {
            news_intensity: 1.0,
            sentiment: 1.0,
            ..inputs(2.0)
        });
        // 1.65 * 0.8 + 0.1
        assert_approx(r, 1.42);
    }

    #[test]
    fn output_is_clipped_and_finite() {
        assert_eq!(reward(&inputs(100.0)), 3.0);
        assert_eq!(reward(&inputs(-100.0)), -3.0);
        let nan = reward(&RewardInputs {
            pnl: f64::NAN,
            ..inputs(0.0)
        });
        assert_eq!(nan, 0.0);
        let inf = reward(&RewardInputs {
            volatility: -DENOM_EPSILON,
            ..inputs(1.0)
        });
        assert!(inf.is_finite());
    }

    #[test]
    fn breakdown_exposes_terms() {
        let b = RewardFunction::default().breakdown(&inputs(-2.0));
        assert_approx(b.normalized_pnl, -1.5);
        assert_approx(b.conviction, -0.25);
        assert_approx(b.geometry, -0.4);
    }

    #[test]
    fn config_rejects_negative_clip() {
        let bad = RewardConfig {
            clip: -1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
