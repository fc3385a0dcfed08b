//! Errors raised for caller mistakes.
//!
//! Degenerate market data (missing volatility, too few pivots, zero swing
//! range, untouched barriers) is never an error; those cases resolve to
//! documented neutral values. Only malformed calls end up here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("empty bar series")]
    EmptySeries,

    #[error("length mismatch: {what} has {actual} values, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("entry bar {index} out of range for {len} bars")]
    EntryOutOfRange { index: usize, len: usize },

    #[error("invalid {what} distance: {value} (must be finite and >= 0)")]
    InvalidDistance { what: &'static str, value: f64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Check that a per-bar series lines up with the bar count.
pub fn ensure_len(what: &'static str, expected: usize, actual: usize) -> CoreResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(CoreError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_len_reports_mismatch() {
        assert!(ensure_len("atr", 3, 3).is_ok());
        let err = ensure_len("atr", 3, 2).unwrap_err();
        assert_eq!(err.to_string(), "length mismatch: atr has 2 values, expected 3");
    }
}
