//! CSV loading for one asset's bar table.
//!
//! Required columns: `close`, `high`, `low`. Optional: `open`, `volume`,
//! `open_time`, `close_time` (RFC 3339 or epoch milliseconds), `atr`, and
//! any regime-signal column. Missing regime columns default to 0; a missing
//! `atr` column is replaced by a Wilder ATR computed from the bars.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use swinglab_core::domain::Bar;
use swinglab_core::indicators::Atr;
use swinglab_core::regime::RegimeSignals;
use thiserror::Error;
use tracing::{debug, warn};

/// Extra column names accepted for the regime lookups.
const REGIME_FALLBACK_COLUMNS: [&str; 1] = ["trend_score"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: invalid timestamp '{value}' in {column}")]
    InvalidTime {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("no data rows")]
    Empty,
}

/// One asset's bars with everything the pipeline needs per bar.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
    /// Raw volatility, either the `atr` column or the computed fallback.
    pub volatility: Vec<f64>,
    pub atr_computed: bool,
    pub regime: Vec<RegimeSignals>,
    /// Regime columns that were present in the header.
    pub regime_columns: Vec<String>,
    /// BLAKE3 over timestamps and OHLCV values.
    pub dataset_hash: String,
}

pub fn load_csv(path: &Path, symbol: &str, atr_period: usize) -> Result<LoadedSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let series = read_series(file, symbol, atr_period)?;
    debug!(
        symbol,
        path = %path.display(),
        bars = series.bars.len(),
        "loaded bar table"
    );
    Ok(series)
}

/// Parse a bar table from any reader.
pub fn read_series<R: Read>(
    reader: R,
    symbol: &str,
    atr_period: usize,
) -> Result<LoadedSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let columns: HashMap<String, usize> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect();
    let required = |name: &'static str| columns.get(name).copied().ok_or(LoadError::MissingColumn(name));
    let close_col = required("close")?;
    let high_col = required("high")?;
    let low_col = required("low")?;
    let open_col = columns.get("open").copied();
    let volume_col = columns.get("volume").copied();
    let open_time_col = columns.get("open_time").copied();
    let close_time_col = columns.get("close_time").copied();
    let atr_col = columns.get("atr").copied();

    let regime_columns: Vec<(&'static str, usize)> = RegimeSignals::COLUMNS
        .iter()
        .chain(REGIME_FALLBACK_COLUMNS.iter())
        .filter_map(|&name| columns.get(name).map(|&i| (name, i)))
        .collect();

    let mut rows = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let field = |col: usize| record.get(col).unwrap_or("");
        let close = parse_price(row, "close", field(close_col))?;
        let high = parse_price(row, "high", field(high_col))?;
        let low = parse_price(row, "low", field(low_col))?;
        let open = open_col.map(|c| parse_optional(row, "open", field(c))).transpose()?.flatten();
        let volume = volume_col
            .map(|c| parse_optional(row, "volume", field(c)))
            .transpose()?
            .flatten()
            .unwrap_or(0.0);
        let open_time = open_time_col
            .map(|c| parse_time(row, "open_time", field(c)))
            .transpose()?;
        let close_time = close_time_col
            .map(|c| parse_time(row, "close_time", field(c)))
            .transpose()?;
        let atr = atr_col
            .map(|c| parse_optional(row, "atr", field(c)))
            .transpose()?
            .flatten()
            .unwrap_or(f64::NAN);

        let mut regime_values: HashMap<&'static str, f64> = HashMap::new();
        for &(name, col) in &regime_columns {
            if let Some(v) = parse_optional(row, name, field(col))? {
                regime_values.insert(name, v);
            }
        }
        let regime = RegimeSignals::from_columns(|name| regime_values.get(name).copied());

        rows.push(RawRow {
            open,
            high,
            low,
            close,
            volume,
            open_time,
            close_time,
            atr,
            regime,
        });
    }
    if rows.is_empty() {
        return Err(LoadError::Empty);
    }

    let bars = build_bars(&rows);
    let (volatility, atr_computed) = if atr_col.is_some() {
        (rows.iter().map(|r| r.atr).collect(), false)
    } else {
        let atr = Atr::new(atr_period);
        warn!(
            symbol,
            column = %atr.name(),
            "input has no atr column, computing Wilder ATR"
        );
        (atr.compute(&bars), true)
    };

    Ok(LoadedSeries {
        symbol: symbol.to_string(),
        dataset_hash: dataset_hash(symbol, &bars),
        volatility,
        atr_computed,
        regime: rows.iter().map(|r| r.regime).collect(),
        regime_columns: regime_columns.iter().map(|(n, _)| n.to_string()).collect(),
        bars,
    })
}

struct RawRow {
    open: Option<f64>,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    open_time: Option<DateTime<Utc>>,
    close_time: Option<DateTime<Utc>>,
    atr: f64,
    regime: RegimeSignals,
}

/// Fill in open prices and bar times that the table did not carry.
fn build_bars(rows: &[RawRow]) -> Vec<Bar> {
    let base = DateTime::<Utc>::default();
    let interval = inferred_interval(rows);
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            let open_time = match (r.open_time, r.close_time) {
                (Some(t), _) => t,
                (None, Some(c)) => c - interval,
                (None, None) => base + interval * i as i32,
            };
            let close_time = r.close_time.unwrap_or(open_time + interval);
            let prev_close = i.checked_sub(1).map(|p| rows[p].close);
            Bar {
                index: i,
                open_time,
                close_time,
                open: r.open.or(prev_close).unwrap_or(r.close),
                high: r.high,
                low: r.low,
                close: r.close,
                volume: r.volume,
            }
        })
        .collect()
}

/// Spacing of the first two timestamps, one hour when unknown.
fn inferred_interval(rows: &[RawRow]) -> Duration {
    let stamp = |r: &RawRow| r.open_time.or(r.close_time);
    match rows {
        [a, b, ..] => match (stamp(a), stamp(b)) {
            (Some(x), Some(y)) if y > x => y - x,
            _ => Duration::hours(1),
        },
        _ => Duration::hours(1),
    }
}

fn parse_price(row: usize, column: &'static str, raw: &str) -> Result<f64, LoadError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Empty cells are `None`; unparsable text is an error.
fn parse_optional(row: usize, column: &str, raw: &str) -> Result<Option<f64>, LoadError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS+00:00`, or integer epoch milliseconds.
pub fn parse_time(row: usize, column: &'static str, raw: &str) -> Result<DateTime<Utc>, LoadError> {
    let parsed = if let Ok(ms) = raw.parse::<i64>() {
        DateTime::<Utc>::from_timestamp_millis(ms)
    } else {
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z"))
            .ok()
            .map(|t| t.with_timezone(&Utc))
    };
    parsed.ok_or_else(|| LoadError::InvalidTime {
        row,
        column,
        value: raw.to_string(),
    })
}

/// Deterministic BLAKE3 hash over the symbol and every bar.
pub fn dataset_hash(symbol: &str, bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    for bar in bars {
        hasher.update(&bar.open_time.timestamp_millis().to_le_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
