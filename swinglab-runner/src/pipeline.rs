//! Per-asset pipeline and the multi-asset driver.
//!
//! Two entry points:
//! - `process_asset()`: load one CSV, build its feature table and, in
//!   simulate mode, run the decision batch and one policy episode.
//! - `run_assets()`: the same for many assets on the rayon pool, saving
//!   artifacts per asset. One failing asset does not stop the others.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use swinglab_core::domain::TradeDecision;
use swinglab_core::error::ensure_len;
use swinglab_core::episode::{run_episode, EpisodeReport, TradingEpisode};
use swinglab_core::scoring::{BarSuggestion, CandidateScorer};
use swinglab_core::simulation::{RewardFunction, TradeSimulator};
use swinglab_core::table::FeatureTable;
use swinglab_core::CoreError;
use thiserror::Error;
use tracing::{info, warn};

use crate::asset::{symbol_from_path, AssetClass};
use crate::batch::{simulate_batch, suggested_decisions, ScoredOutcome};
use crate::config::{ConfigError, PipelineConfig};
use crate::data_loader::{load_csv, LoadError, LoadedSeries};
use crate::export::{save_asset_artifacts, ExportError};
use crate::metrics::OutcomeSummary;
use crate::policy::build_policy;
use crate::rng::RngHierarchy;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Load(#[from] LoadError),
    #[error("engine error: {0}")]
    Core(#[from] CoreError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("cannot derive a symbol from {0}")]
    NoSymbol(PathBuf),
    #[error("duplicate symbol {symbol}: {path} would overwrite an earlier input")]
    DuplicateSymbol { symbol: String, path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Structural features and scorer columns only.
    Features,
    /// Features plus the decision batch and a policy episode.
    Simulate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInput {
    pub symbol: String,
    pub path: PathBuf,
}

impl AssetInput {
    /// Symbol taken from the file stem.
    pub fn from_path(path: &Path) -> Result<Self, RunError> {
        let symbol = symbol_from_path(path).ok_or_else(|| RunError::NoSymbol(path.to_path_buf()))?;
        Ok(Self {
            symbol,
            path: path.to_path_buf(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub batch: Vec<ScoredOutcome>,
    pub batch_summary: OutcomeSummary,
    pub episode: EpisodeReport,
    pub episode_trades: Vec<ScoredOutcome>,
    pub episode_summary: OutcomeSummary,
}

#[derive(Debug, Clone)]
pub struct AssetReport {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub dataset_hash: String,
    pub config_hash: String,
    pub atr_computed: bool,
    pub table: FeatureTable,
    pub simulation: Option<SimulationReport>,
}

/// Serializable digest of an [`AssetReport`], written as `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub bars: usize,
    pub pivots: usize,
    pub dataset_hash: String,
    pub config_hash: String,
    pub atr_computed: bool,
    pub batch: Option<OutcomeSummary>,
    pub episode_policy: Option<String>,
    pub episode_steps: Option<usize>,
    pub episode_gated: Option<usize>,
    pub episode: Option<OutcomeSummary>,
}

impl AssetReport {
    pub fn summary(&self) -> AssetSummary {
        let sim = self.simulation.as_ref();
        AssetSummary {
            symbol: self.symbol.clone(),
            asset_class: self.asset_class,
            bars: self.table.len(),
            pivots: self.table.pivots.len(),
            dataset_hash: self.dataset_hash.clone(),
            config_hash: self.config_hash.clone(),
            atr_computed: self.atr_computed,
            batch: sim.map(|s| s.batch_summary.clone()),
            episode_policy: sim.map(|s| s.episode.policy.clone()),
            episode_steps: sim.map(|s| s.episode.steps),
            episode_gated: sim.map(|s| s.episode.gated),
            episode: sim.map(|s| s.episode_summary.clone()),
        }
    }
}

/// Structural pass (sequential) then per-bar scoring (parallel).
pub fn build_table(series: LoadedSeries, config: &PipelineConfig) -> Result<FeatureTable, RunError> {
    let structure = config
        .feature_engine()
        .compute(&series.bars, &series.volatility)?;
    let scorer = CandidateScorer::new(config.scoring);
    ensure_len("regime signals", structure.rows.len(), series.regime.len())?;
    let suggestions: Vec<BarSuggestion> = structure
        .rows
        .par_iter()
        .zip(series.regime.par_iter())
        .map(|(row, signals)| scorer.score_bar(row, signals))
        .collect();
    Ok(FeatureTable::from_parts(
        series.symbol,
        series.bars,
        series.volatility,
        series.regime,
        structure,
        suggestions,
    )?)
}

/// Decision batch from the scorer's suggestions plus one policy episode.
pub fn simulate_table(
    table: &FeatureTable,
    config: &PipelineConfig,
    config_hash: &str,
) -> Result<SimulationReport, RunError> {
    let simulator = TradeSimulator::new(config.simulation);
    let reward = RewardFunction::new(config.reward);

    let decisions = suggested_decisions(table, config.episode.conf_threshold);
    let batch = simulate_batch(table, &decisions, &simulator, &reward)?;
    let batch_summary = summarize(&batch);

    let rng = RngHierarchy::new(config.run.seed).rng_for(config_hash, &table.symbol, 0);
    let mut policy = build_policy(config.run.policy, rng);
    let mut episode = TradingEpisode::new(table, config.episode, simulator, reward)?;
    let report = run_episode(&mut episode, policy.as_mut())?;
    let episode_trades: Vec<ScoredOutcome> = report
        .trades
        .iter()
        .map(|t| ScoredOutcome {
            decision: TradeDecision {
                bar_index: t.outcome.entry_bar_index,
                side: t.outcome.side,
                target_distance: t.tp_mult,
                stop_distance: t.sl_mult,
            },
            outcome: t.outcome,
            reward: t.reward.reward,
        })
        .collect();
    let episode_summary = summarize(&episode_trades);

    Ok(SimulationReport {
        batch,
        batch_summary,
        episode: report,
        episode_trades,
        episode_summary,
    })
}

fn summarize(scored: &[ScoredOutcome]) -> OutcomeSummary {
    let outcomes: Vec<_> = scored.iter().map(|s| s.outcome).collect();
    let rewards: Vec<f64> = scored.iter().map(|s| s.reward).collect();
    OutcomeSummary::compute(&outcomes, &rewards)
}

pub fn process_asset(
    input: &AssetInput,
    config: &PipelineConfig,
    config_hash: &str,
    mode: RunMode,
) -> Result<AssetReport, RunError> {
    let series = load_csv(&input.path, &input.symbol, config.run.atr_period)?;
    let dataset_hash = series.dataset_hash.clone();
    let atr_computed = series.atr_computed;
    let table = build_table(series, config)?;

    let simulation = match mode {
        RunMode::Features => None,
        RunMode::Simulate => Some(simulate_table(&table, config, config_hash)?),
    };

    info!(
        symbol = %input.symbol,
        bars = table.len(),
        pivots = table.pivots.len(),
        trades = simulation.as_ref().map_or(0, |s| s.batch.len()),
        "asset processed"
    );
    Ok(AssetReport {
        symbol: input.symbol.clone(),
        asset_class: AssetClass::detect(&input.symbol),
        dataset_hash,
        config_hash: config_hash.to_string(),
        atr_computed,
        table,
        simulation,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFailure {
    pub symbol: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub config_hash: String,
    pub mode: RunMode,
    pub assets: Vec<AssetSummary>,
    pub failures: Vec<AssetFailure>,
}

/// Process every input in parallel and save artifacts below `output_root`.
/// Results come back in input order.
pub fn run_assets(
    inputs: &[AssetInput],
    config: &PipelineConfig,
    mode: RunMode,
    output_root: &Path,
) -> Result<RunReport, RunError> {
    config.validate()?;
    let config_hash = config.config_hash()?;
    info!(
        assets = inputs.len(),
        config_hash = %config_hash,
        mode = ?mode,
        "run started"
    );

    // first input wins a symbol; later ones would share its output dir
    let mut seen = HashSet::new();
    let first_of_symbol: Vec<bool> = inputs
        .iter()
        .map(|input| seen.insert(input.symbol.as_str()))
        .collect();

    let results: Vec<Result<AssetSummary, RunError>> = inputs
        .par_iter()
        .zip(first_of_symbol.par_iter())
        .map(|(input, &first)| {
            if !first {
                return Err(RunError::DuplicateSymbol {
                    symbol: input.symbol.clone(),
                    path: input.path.clone(),
                });
            }
            let report = process_asset(input, config, &config_hash, mode)?;
            save_asset_artifacts(output_root, &report)?;
            Ok(report.summary())
        })
        .collect();

    let mut assets = Vec::new();
    let mut failures = Vec::new();
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(summary) => assets.push(summary),
            Err(e) => {
                warn!(symbol = %input.symbol, error = %e, "asset failed");
                failures.push(AssetFailure {
                    symbol: input.symbol.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    info!(ok = assets.len(), failed = failures.len(), "run finished");
    Ok(RunReport {
        config_hash,
        mode,
        assets,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::read_series;

    fn trending_csv(n: usize) -> String {
        let mut csv = String::from("close,high,low,conf_entry_final\n");
        for i in 0..n {
            let close = 100.0 + (i as f64 * 0.2).sin() * 6.0 + i as f64 * 0.1;
            csv.push_str(&format!("{close},{},{},0.6\n", close + 0.5, close - 0.5));
        }
        csv
    }

    #[test]
    fn table_from_loaded_series() {
        let series = read_series(trending_csv(80).as_bytes(), "AAPL", 14).unwrap();
        let table = build_table(series, &PipelineConfig::default()).unwrap();
        assert_eq!(table.len(), 80);
        assert_eq!(table.suggestions.len(), 80);
        assert!(!table.pivots.is_empty());
    }

    #[test]
    fn parallel_scoring_matches_sequential() {
        let config = PipelineConfig::default();
        let series = read_series(trending_csv(80).as_bytes(), "AAPL", 14).unwrap();
        let table = build_table(series.clone(), &config).unwrap();
        let sequential = FeatureTable::build(
            "AAPL",
            series.bars,
            series.volatility,
            series.regime,
            &config.feature_engine(),
            &CandidateScorer::new(config.scoring),
        )
        .unwrap();
        // warm-up ATR is NaN, so compare the derived columns
        assert_eq!(table.suggestions, sequential.suggestions);
        assert_eq!(table.structure, sequential.structure);
        assert_eq!(table.pivots, sequential.pivots);
        assert_eq!(table.volatility, sequential.volatility);
    }

    #[test]
    fn simulation_is_deterministic_per_seed() {
        let mut config = PipelineConfig::default();
        config.run.policy = crate::config::PolicyKind::Random;
        let series = read_series(trending_csv(120).as_bytes(), "ETHUSDT", 14).unwrap();
        let table = build_table(series, &config).unwrap();
        let hash = config.config_hash().unwrap();

        let a = simulate_table(&table, &config, &hash).unwrap();
        let b = simulate_table(&table, &config, &hash).unwrap();
        assert_eq!(a.episode, b.episode);
        assert_eq!(a.batch, b.batch);
        assert_eq!(a.batch_summary.trade_count, a.batch.len());
        assert_eq!(a.episode.policy, "random");
    }

    #[test]
    fn input_symbol_comes_from_file_stem() {
        let input = AssetInput::from_path(Path::new("data/SOLUSDT.csv")).unwrap();
        assert_eq!(input.symbol, "SOLUSDT");
        assert!(matches!(
            AssetInput::from_path(Path::new("/")),
            Err(RunError::NoSymbol(_))
        ));
    }
}
