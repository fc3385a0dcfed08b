//! Regime and reliability signals, precomputed upstream.
//!
//! These arrive as plain columns; this module only names them, derives the
//! confidence direction/strength pair when needed, and clamps flag-like
//! values into [0, 1].

use crate::math::{clamp01, finite_or_zero, sign};
use serde::{Deserialize, Serialize};

/// Number of regime columns, and of regime entries in an observation.
pub const REGIME_COUNT: usize = 20;

/// Per-bar context consumed by the scorer, the reward and the episode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegimeSignals {
    /// Signed final entry confidence in [-1, 1] (`conf_entry_final`).
    pub confidence: f64,
    /// Direction of conviction: -1, 0 or +1.
    pub conf_dir: f64,
    /// Strength of conviction in [0, 1].
    pub conf_str: f64,

    pub trend_conf: f64,
    pub trend_dir: f64,
    pub vol_comfort: f64,
    pub regime_trending: f64,
    pub range_chop_flag: f64,
    pub bb_breakout_risky: f64,

    pub macd_bullish: f64,
    pub macd_bearish: f64,
    pub macd_conflict: f64,
    pub rsi_long_bias: f64,
    pub rsi_short_bias: f64,
    pub rsi_fade_risky: f64,

    pub obv_pressure: f64,
    pub obv_reliability: f64,
    /// Optional strength of the nearest support/resistance, 0 when unknown.
    pub sr_strength: f64,

    /// Sentiment in [-1, 1]; neutral 0.
    pub sentiment: f64,
    /// News intensity in [0, 1]; neutral 0.
    pub news_intensity: f64,
}

impl RegimeSignals {
    /// Input column names, in observation order.
    pub const COLUMNS: [&'static str; REGIME_COUNT] = [
        "conf_entry_final",
        "conf_dir",
        "conf_str",
        "trend_conf",
        "trend_dir",
        "vol_comfort",
        "regime_trending",
        "range_chop_flag",
        "bb_breakout_risky",
        "macd_bullish",
        "macd_bearish",
        "macd_conflict",
        "rsi_long_bias",
        "rsi_short_bias",
        "rsi_fade_risky",
        "obv_pressure",
        "obv_reliability",
        "sr_strength",
        "sentiment",
        "news_vol",
    ];

    /// Neutral signals carrying only a signed confidence.
    pub fn with_confidence(confidence: f64) -> Self {
        Self {
            confidence,
            conf_dir: sign(confidence),
            conf_str: clamp01(confidence.abs()),
            ..Self::default()
        }
        .sanitized()
    }

    /// Build from a column lookup; absent columns default to 0.
    ///
    /// `conf_dir`/`conf_str` are taken as given when both columns exist,
    /// otherwise derived from `conf_entry_final`.
    pub fn from_columns<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<f64>,
    {
        let col = |name: &str| get(name).unwrap_or(0.0);
        let confidence = col("conf_entry_final");
        let (conf_dir, conf_str) = match (get("conf_dir"), get("conf_str")) {
            (Some(dir), Some(strength)) => (dir, strength),
            _ => (confidence, confidence.abs()),
        };
        Self {
            confidence,
            conf_dir,
            conf_str,
            trend_conf: col("trend_conf"),
            // trend_score is the upstream fallback when trend_dir is absent
            trend_dir: get("trend_dir").unwrap_or_else(|| col("trend_score")),
            vol_comfort: col("vol_comfort"),
            regime_trending: col("regime_trending"),
            range_chop_flag: col("range_chop_flag"),
            bb_breakout_risky: col("bb_breakout_risky"),
            macd_bullish: col("macd_bullish"),
            macd_bearish: col("macd_bearish"),
            macd_conflict: col("macd_conflict"),
            rsi_long_bias: col("rsi_long_bias"),
            rsi_short_bias: col("rsi_short_bias"),
            rsi_fade_risky: col("rsi_fade_risky"),
            obv_pressure: col("obv_pressure"),
            obv_reliability: col("obv_reliability"),
            sr_strength: col("sr_strength"),
            sentiment: col("sentiment"),
            news_intensity: col("news_vol"),
        }
        .sanitized()
    }

    /// Directions to {-1, 0, 1}, flags to [0, 1], non-finite to 0.
    pub fn sanitized(self) -> Self {
        Self {
            confidence: finite_or_zero(self.confidence).clamp(-1.0, 1.0),
            conf_dir: sign(self.conf_dir),
            conf_str: clamp01(self.conf_str),
            trend_conf: clamp01(self.trend_conf),
            trend_dir: sign(self.trend_dir),
            vol_comfort: clamp01(self.vol_comfort),
            regime_trending: clamp01(self.regime_trending),
            range_chop_flag: clamp01(self.range_chop_flag),
            bb_breakout_risky: clamp01(self.bb_breakout_risky),
            macd_bullish: clamp01(self.macd_bullish),
            macd_bearish: clamp01(self.macd_bearish),
            macd_conflict: clamp01(self.macd_conflict),
            rsi_long_bias: clamp01(self.rsi_long_bias),
            rsi_short_bias: clamp01(self.rsi_short_bias),
            rsi_fade_risky: clamp01(self.rsi_fade_risky),
            obv_pressure: clamp01(self.obv_pressure),
            obv_reliability: clamp01(self.obv_reliability),
            sr_strength: clamp01(self.sr_strength),
            sentiment: finite_or_zero(self.sentiment).clamp(-1.0, 1.0),
            news_intensity: clamp01(self.news_intensity),
        }
    }

    /// Values in [`RegimeSignals::COLUMNS`] order.
    pub fn values(&self) -> [f64; REGIME_COUNT] {
        [
            self.confidence,
            self.conf_dir,
            self.conf_str,
            self.trend_conf,
            self.trend_dir,
            self.vol_comfort,
            self.regime_trending,
            self.range_chop_flag,
            self.bb_breakout_risky,
            self.macd_bullish,
            self.macd_bearish,
            self.macd_conflict,
            self.rsi_long_bias,
            self.rsi_short_bias,
            self.rsi_fade_risky,
            self.obv_pressure,
            self.obv_reliability,
            self.sr_strength,
            self.sentiment,
            self.news_intensity,
        ]
    }
}
