//! TradingEpisode — the stepping driver an external learner interacts with.
//!
//! One decision per step. `NoTrade` advances a single bar; an entry is
//! simulated to completion, rewarded, and the cursor jumps past its exit.
//! The learner itself lives behind [`DecisionPolicy`].

use crate::domain::{Side, TradeDecision, TradeOutcome};
use crate::error::{CoreError, CoreResult};
use crate::scoring::scorer::check_bounds;
use crate::simulation::{RewardBreakdown, RewardFunction, RewardInputs, TradeSimulator};
use crate::table::{FeatureTable, OBSERVATION_LEN};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    NoTrade,
    EnterLong,
    EnterShort,
}

impl ActionKind {
    pub fn side(self) -> Option<Side> {
        match self {
            ActionKind::NoTrade => None,
            ActionKind::EnterLong => Some(Side::Long),
            ActionKind::EnterShort => Some(Side::Short),
        }
    }
}

/// A discrete choice plus relative adjustments to the base multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub delta_tp: f64,
    pub delta_sl: f64,
}

impl Action {
    pub fn no_trade() -> Self {
        Self::new(ActionKind::NoTrade, 0.0, 0.0)
    }

    pub fn enter(side: Side) -> Self {
        let kind = match side {
            Side::Long => ActionKind::EnterLong,
            Side::Short => ActionKind::EnterShort,
        };
        Self::new(kind, 0.0, 0.0)
    }

    pub fn new(kind: ActionKind, delta_tp: f64, delta_sl: f64) -> Self {
        Self {
            kind,
            delta_tp,
            delta_sl,
        }
    }

    pub fn with_deltas(self, delta_tp: f64, delta_sl: f64) -> Self {
        Self {
            delta_tp,
            delta_sl,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Entries are suppressed when `|confidence|` is below this.
    pub conf_threshold: f64,
    pub max_delta_tp: f64,
    pub max_delta_sl: f64,
    /// Base multipliers come from the scorer when set, else the defaults.
    pub use_suggestions: bool,
    pub default_tp_mult: f64,
    pub default_sl_mult: f64,
    pub tp_bounds: (f64, f64),
    pub sl_bounds: (f64, f64),
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            conf_threshold: 0.30,
            max_delta_tp: 0.5,
            max_delta_sl: 0.3,
            use_suggestions: true,
            default_tp_mult: 1.2,
            default_sl_mult: 1.0,
            tp_bounds: (0.8, 3.0),
            sl_bounds: (0.5, 1.6),
        }
    }
}

impl EpisodeConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.conf_threshold) {
            return Err(CoreError::InvalidConfig(format!(
                "episode.conf_threshold must be in [0, 1], got {}",
                self.conf_threshold
            )));
        }
        for (name, v) in [
            ("episode.max_delta_tp", self.max_delta_tp),
            ("episode.max_delta_sl", self.max_delta_sl),
        ] {
            if !(v.is_finite() && (0.0..1.0).contains(&v)) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {v}"
                )));
            }
        }
        check_bounds("episode.tp", self.tp_bounds.0, self.tp_bounds.1)?;
        check_bounds("episode.sl", self.sl_bounds.0, self.sl_bounds.1)
    }
}

/// Details of the trade taken on a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepTrade {
    pub tp_mult: f64,
    pub sl_mult: f64,
    pub outcome: TradeOutcome,
    pub reward: RewardBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Bar the decision was taken on.
    pub bar_index: usize,
    pub reward: f64,
    pub done: bool,
    /// An entry was requested but the confidence gate turned it into `NoTrade`.
    pub gated: bool,
    pub trade: Option<StepTrade>,
}

/// External decision maker.
pub trait DecisionPolicy {
    fn decide(&mut self, observation: &[f64; OBSERVATION_LEN], bar_index: usize) -> Action;

    fn name(&self) -> &str;
}

pub struct TradingEpisode<'a> {
    table: &'a FeatureTable,
    config: EpisodeConfig,
    simulator: TradeSimulator,
    reward: RewardFunction,
    cursor: usize,
}

impl<'a> TradingEpisode<'a> {
    pub fn new(
        table: &'a FeatureTable,
        config: EpisodeConfig,
        simulator: TradeSimulator,
        reward: RewardFunction,
    ) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            table,
            config,
            simulator,
            reward,
            cursor: 0,
        })
    }

    pub fn reset(&mut self) -> usize {
        self.cursor = 0;
        self.cursor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Done once fewer than two bars remain after the cursor.
    pub fn is_done(&self) -> bool {
        self.cursor + 2 >= self.table.len()
    }

    pub fn observation(&self) -> Option<[f64; OBSERVATION_LEN]> {
        self.table.observation(self.cursor)
    }

    pub fn step(&mut self, action: Action) -> CoreResult<Step> {
        let bar_index = self.cursor;
        if self.is_done() {
            return Ok(Step {
                bar_index,
                reward: 0.0,
                done: true,
                gated: false,
                trade: None,
            });
        }

        let signals = &self.table.regime[bar_index];
        let gated =
            action.kind != ActionKind::NoTrade && signals.confidence.abs() < self.config.conf_threshold;
        let side = if gated { None } else { action.kind.side() };

        let Some(side) = side else {
            self.cursor += 1;
            return Ok(Step {
                bar_index,
                reward: 0.0,
                done: self.is_done(),
                gated,
                trade: None,
            });
        };

        let (base_tp, base_sl) = self.base_multipliers(bar_index, side);
        let c = &self.config;
        let delta_tp = clamp_delta(action.delta_tp, c.max_delta_tp);
        let delta_sl = clamp_delta(action.delta_sl, c.max_delta_sl);
        let tp_mult = (base_tp * (1.0 + delta_tp)).clamp(c.tp_bounds.0, c.tp_bounds.1);
        let sl_mult = (base_sl * (1.0 + delta_sl)).clamp(c.sl_bounds.0, c.sl_bounds.1);

        let decision = TradeDecision {
            bar_index,
            side,
            target_distance: tp_mult,
            stop_distance: sl_mult,
        };
        let outcome =
            self.simulator
                .simulate(&self.table.bars, &self.table.raw_volatility, &decision)?;
        let breakdown = self
            .reward
            .breakdown(&RewardInputs::from_outcome(&outcome, signals));

        trace!(
            bar = bar_index,
            side = %side,
            tp_mult,
            sl_mult,
            hit = outcome.hit.as_str(),
            reward = breakdown.reward,
            "episode trade"
        );

        self.cursor = (outcome.exit_bar_index + 1).min(self.table.len() - 1);
        Ok(Step {
            bar_index,
            reward: breakdown.reward,
            done: self.is_done(),
            gated: false,
            trade: Some(StepTrade {
                tp_mult,
                sl_mult,
                outcome,
                reward: breakdown,
            }),
        })
    }

    fn base_multipliers(&self, bar_index: usize, side: Side) -> (f64, f64) {
        if !self.config.use_suggestions {
            return (self.config.default_tp_mult, self.config.default_sl_mult);
        }
        let s = self.table.suggestions[bar_index].for_side(side);
        (s.take_profit.multiplier, s.stop_loss.multiplier)
    }
}

fn clamp_delta(delta: f64, max: f64) -> f64 {
    if delta.is_nan() {
        0.0
    } else {
        delta.clamp(-max, max)
    }
}

/// Totals for one full pass of a policy over an episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub policy: String,
    pub steps: usize,
    pub gated: usize,
    pub total_reward: f64,
    pub trades: Vec<StepTrade>,
}

/// Reset the episode and step `policy` until done.
pub fn run_episode<P>(episode: &mut TradingEpisode<'_>, policy: &mut P) -> CoreResult<EpisodeReport>
where
    P: DecisionPolicy + ?Sized,
{
    episode.reset();
    let mut report = EpisodeReport {
        policy: policy.name().to_string(),
        ..Default::default()
    };
    while !episode.is_done() {
        let Some(obs) = episode.observation() else {
            break;
        };
        let action = policy.decide(&obs, episode.cursor());
        let step = episode.step(action)?;
        report.steps += 1;
        report.gated += usize::from(step.gated);
        report.total_reward += step.reward;
        if let Some(trade) = step.trade {
            report.trades.push(trade);
        }
    }
    debug!(
        policy = %report.policy,
        steps = report.steps,
        trades = report.trades.len(),
        total_reward = report.total_reward,
        "episode finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{bars_from_closes_with_wick, ExitKind};
    use crate::regime::RegimeSignals;
    use crate::scoring::CandidateScorer;
    use crate::structure::StructuralFeatureEngine;

    fn rising_table(confidence: f64) -> FeatureTable {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        FeatureTable::build(
            "UP",
            bars_from_closes_with_wick(&closes, 0.1),
            vec![1.0; closes.len()],
            vec![RegimeSignals::with_confidence(confidence); closes.len()],
            &StructuralFeatureEngine::default(),
            &CandidateScorer::default(),
        )
        .unwrap()
    }

    fn episode(table: &FeatureTable, config: EpisodeConfig) -> TradingEpisode<'_> {
        TradingEpisode::new(table, config, TradeSimulator::default(), RewardFunction::default())
            .unwrap()
    }

    struct AlwaysLong;

    impl DecisionPolicy for AlwaysLong {
        fn decide(&mut self, _obs: &[f64; OBSERVATION_LEN], _bar: usize) -> Action {
            Action::enter(Side::Long)
        }

        fn name(&self) -> &str {
            "always_long"
        }
    }

    #[test]
    fn no_trade_advances_one_bar() {
        let table = rising_table(0.8);
        let mut ep = episode(&table, EpisodeConfig::default());
        let step = ep.step(Action::no_trade()).unwrap();
        assert_eq!(step.reward, 0.0);
        assert!(step.trade.is_none());
        assert_eq!(ep.cursor(), 1);
    }

    #[test]
    fn low_confidence_gates_entries() {
        let table = rising_table(0.1);
        let mut ep = episode(&table, EpisodeConfig::default());
        let step = ep.step(Action::enter(Side::Long)).unwrap();
        assert!(step.gated);
        assert!(step.trade.is_none());
        assert_eq!(ep.cursor(), 1);
    }

    #[test]
    fn entry_jumps_past_exit() {
        let table = rising_table(0.8);
        let config = EpisodeConfig {
            use_suggestions: false,
            ..Default::default()
        };
        let mut ep = episode(&table, config);
        let step = ep.step(Action::enter(Side::Long)).unwrap();
        let trade = step.trade.unwrap();
        // target 1.2 above a close rising 1 per bar is hit on bar 2
        assert_eq!(trade.outcome.hit, ExitKind::Target);
        assert_eq!(trade.outcome.exit_bar_index, 2);
        assert_eq!(ep.cursor(), 3);
        assert!(step.reward > 0.0);
    }

    #[test]
    fn deltas_are_clamped_before_bounds() {
        let table = rising_table(0.8);
        let config = EpisodeConfig {
            use_suggestions: false,
            ..Default::default()
        };
        let mut ep = episode(&table, config);
        let step = ep
            .step(Action::enter(Side::Long).with_deltas(5.0, -5.0))
            .unwrap();
        let trade = step.trade.unwrap();
        assert!((trade.tp_mult - 1.8).abs() < 1e-12);
        assert!((trade.sl_mult - 0.7).abs() < 1e-12);
    }

    #[test]
    fn runs_to_completion() {
        let table = rising_table(0.8);
        let mut ep = episode(&table, EpisodeConfig::default());
        let report = run_episode(&mut ep, &mut AlwaysLong).unwrap();
        assert!(ep.is_done());
        assert!(!report.trades.is_empty());
        assert_eq!(report.policy, "always_long");
        let terminal = ep.step(Action::no_trade()).unwrap();
        assert!(terminal.done);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let table = rising_table(0.8);
        let bad = EpisodeConfig {
            max_delta_tp: 1.5,
            ..Default::default()
        };
        assert!(TradingEpisode::new(&table, bad, TradeSimulator::default(), RewardFunction::default())
            .is_err());
    }
}
