//! Domain types for SwingLab

pub mod bar;
pub mod pivot;
pub mod side;
pub mod trade;

pub use bar::{bars_from_closes, bars_from_closes_with_wick, Bar};
pub use pivot::{Pivot, PivotKind};
pub use side::Side;
pub use trade::{ExitKind, TradeDecision, TradeOutcome};
