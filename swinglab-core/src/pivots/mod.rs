//! Zig-zag pivot detection with a volatility-scaled reversal threshold.

pub mod detector;
pub mod list;
pub mod swing;

pub use detector::{detect_pivots, PivotConfig, PivotDetector};
pub use list::{PivotList, PivotUpdate};
pub use swing::{SwingDirection, SwingState, Transition};
