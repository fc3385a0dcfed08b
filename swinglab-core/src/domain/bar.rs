//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar for one fixed interval of a single series.
///
/// Bars are contiguous and strictly increasing in time; upstream fill
/// guarantees there are no gaps, so `index` doubles as the row position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub index: usize,
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
    }
}

/// Create synthetic bars from close prices (tests, benches, smoke runs).
///
/// open = prev_close (or close for the first bar), high = max(open, close) + 0.5,
/// low = min(open, close) - 0.5, one-hour intervals starting 2024-01-01 UTC.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    bars_from_closes_with_wick(closes, 0.5)
}

/// Like [`bars_from_closes`] with an explicit wick size above/below the body.
pub fn bars_from_closes_with_wick(closes: &[f64], wick: f64) -> Vec<Bar> {
    let base = DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap_or_default();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let open_time = base + chrono::Duration::hours(i as i64);
            Bar {
                index: i,
                open_time,
                close_time: open_time + chrono::Duration::hours(1),
                open,
                high: open.max(close) + wick,
                low: open.min(close) - wick,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        bars_from_closes(&[100.0, 103.0]).remove(1)
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = bar.low - 1.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn synthetic_bars_are_contiguous() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        for pair in bars.windows(2) {
            assert_eq!(pair[0].close_time, pair[1].open_time);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
