//! Structural market-geometry features: Fibonacci levels and nearest
//! support/resistance, in volatility units.

pub mod engine;
pub mod fib;
pub mod levels;
pub mod row;
pub mod support_resistance;

pub use engine::{FeatureConfig, StructuralFeatureEngine, StructuralFeatures};
pub use fib::{AbcPattern, FibProjection};
pub use levels::{StructureLevel, EXTENSION_RATIOS, LEVEL_COUNT, RETRACEMENT_RATIOS};
pub use row::{finalize_rows, RawStructure, StructuralFeatureRow};
pub use support_resistance::NearestLevels;
