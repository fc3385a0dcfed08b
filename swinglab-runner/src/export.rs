//! Artifact export — CSV feature tables, CSV trade tapes, JSON summaries.
//!
//! Writers render to strings first so tests can inspect them without
//! touching disk; `save_asset_artifacts` puts the files in the per-asset
//! layout.

use std::path::{Path, PathBuf};

use swinglab_core::regime::RegimeSignals;
use swinglab_core::structure::StructureLevel;
use swinglab_core::table::FeatureTable;
use thiserror::Error;
use tracing::info;

use crate::asset::features_dir;
use crate::batch::ScoredOutcome;
use crate::pipeline::AssetReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv writer: {0}")]
    Flush(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub const FEATURES_FILE: &str = "features.csv";
pub const OUTCOMES_FILE: &str = "outcomes.csv";
pub const EPISODE_FILE: &str = "episode_trades.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Scorer columns appended after the structural ones.
pub const SCORER_COLUMNS: [&str; 6] = [
    "tp_mult_suggested",
    "sl_mult_suggested",
    "tp_source",
    "sl_source",
    "tp_score_best",
    "sl_score_best",
];

const BAR_COLUMNS: [&str; 9] = [
    "open_time",
    "close_time",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "atr",
    "atr_used",
];

// ─── CSV export ─────────────────────────────────────────────────────

/// Full per-bar table: bar columns, regime inputs, structure, scorer output.
///
/// Non-finite raw `atr` values are written as empty cells so the file loads
/// back to the same series.
pub fn export_features_csv(table: &FeatureTable) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let header: Vec<&str> = BAR_COLUMNS
        .iter()
        .copied()
        .chain(RegimeSignals::COLUMNS)
        .chain(StructureLevel::ALL.iter().map(|l| l.column_name()))
        .chain(SCORER_COLUMNS)
        .collect();
    wtr.write_record(&header)?;

    for (i, bar) in table.bars.iter().enumerate() {
        let suggested = table.suggestions[i].suggested();
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(bar.open_time.to_rfc3339());
        record.push(bar.close_time.to_rfc3339());
        for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
            record.push(v.to_string());
        }
        record.push(finite_or_empty(table.raw_volatility[i]));
        record.push(table.volatility[i].to_string());
        record.extend(table.regime[i].values().iter().map(f64::to_string));
        record.extend(table.structure[i].values.iter().map(f64::to_string));
        record.push(suggested.take_profit.multiplier.to_string());
        record.push(suggested.stop_loss.multiplier.to_string());
        record.push(suggested.take_profit.label.to_string());
        record.push(suggested.stop_loss.label.to_string());
        record.push(suggested.take_profit.score.to_string());
        record.push(suggested.stop_loss.score.to_string());
        wtr.write_record(&record)?;
    }

    finish(wtr)
}

/// Trade tape of simulated decisions.
pub fn export_outcomes_csv(outcomes: &[ScoredOutcome]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_bar",
        "side",
        "target_mult",
        "stop_mult",
        "entry_price",
        "entry_volatility",
        "target_price",
        "stop_price",
        "exit_bar",
        "exit_price",
        "hit",
        "realized_pnl",
        "bars_held",
        "reward",
    ])?;
    for s in outcomes {
        let o = &s.outcome;
        wtr.write_record([
            o.entry_bar_index.to_string(),
            o.side.to_string(),
            format!("{:.4}", s.decision.target_distance),
            format!("{:.4}", s.decision.stop_distance),
            format!("{:.6}", o.entry_price),
            format!("{:.6}", o.entry_volatility),
            format!("{:.6}", o.target_price),
            format!("{:.6}", o.stop_price),
            o.exit_bar_index.to_string(),
            format!("{:.6}", o.exit_price),
            o.hit.as_str().to_string(),
            format!("{:.6}", o.realized_pnl),
            o.bars_held.to_string(),
            format!("{:.6}", s.reward),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

fn finite_or_empty(v: f64) -> String {
    if v.is_finite() {
        v.to_string()
    } else {
        String::new()
    }
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write one asset's artifacts under `<root>/<class>/<SYMBOL>/features/`:
/// - `features.csv` always
/// - `outcomes.csv`, `episode_trades.csv` when the run simulated trades
/// - `summary.json` always
///
/// Returns the directory written to.
pub fn save_asset_artifacts(root: &Path, report: &AssetReport) -> Result<PathBuf, ExportError> {
    let dir = features_dir(root, &report.symbol);
    std::fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
        path: dir.clone(),
        source,
    })?;

    write_file(&dir.join(FEATURES_FILE), &export_features_csv(&report.table)?)?;
    if let Some(sim) = &report.simulation {
        write_file(&dir.join(OUTCOMES_FILE), &export_outcomes_csv(&sim.batch)?)?;
        write_file(&dir.join(EPISODE_FILE), &export_outcomes_csv(&sim.episode_trades)?)?;
    }
    write_file(
        &dir.join(SUMMARY_FILE),
        &serde_json::to_string_pretty(&report.summary())?,
    )?;

    info!(symbol = %report.symbol, dir = %dir.display(), "artifacts saved");
    Ok(dir)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
