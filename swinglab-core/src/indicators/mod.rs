//! Volatility indicators the engine can derive itself.
//!
//! Everything else (RSI, MACD, ADX, Bollinger...) arrives precomputed as
//! regime-signal columns.

pub mod atr;

pub use atr::{true_range, wilder_smooth, Atr};
