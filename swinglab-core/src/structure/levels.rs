//! The twelve named structural levels and their output column names.

use serde::{Deserialize, Serialize};

/// Number of structural feature columns.
pub const LEVEL_COUNT: usize = 12;

/// Fibonacci extension ratios, in `StructureLevel` order.
pub const EXTENSION_RATIOS: [f64; 3] = [1.272, 1.618, 2.0];

/// Fibonacci retracement ratios, in `StructureLevel` order.
pub const RETRACEMENT_RATIOS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureLevel {
    FibExt127,
    FibExt161,
    FibExt200,
    FibRet236,
    FibRet382,
    FibRet500,
    FibRet618,
    FibRet786,
    Support1,
    Support2,
    Resistance1,
    Resistance2,
}

impl StructureLevel {
    /// Canonical column order.
    pub const ALL: [StructureLevel; LEVEL_COUNT] = [
        StructureLevel::FibExt127,
        StructureLevel::FibExt161,
        StructureLevel::FibExt200,
        StructureLevel::FibRet236,
        StructureLevel::FibRet382,
        StructureLevel::FibRet500,
        StructureLevel::FibRet618,
        StructureLevel::FibRet786,
        StructureLevel::Support1,
        StructureLevel::Support2,
        StructureLevel::Resistance1,
        StructureLevel::Resistance2,
    ];

    pub const EXTENSIONS: [StructureLevel; 3] = [
        StructureLevel::FibExt127,
        StructureLevel::FibExt161,
        StructureLevel::FibExt200,
    ];

    pub const RETRACEMENTS: [StructureLevel; 5] = [
        StructureLevel::FibRet236,
        StructureLevel::FibRet382,
        StructureLevel::FibRet500,
        StructureLevel::FibRet618,
        StructureLevel::FibRet786,
    ];

    /// Position in [`StructureLevel::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn column_name(self) -> &'static str {
        match self {
            StructureLevel::FibExt127 => "fib_ext_127",
            StructureLevel::FibExt161 => "fib_ext_161",
            StructureLevel::FibExt200 => "fib_ext_200",
            StructureLevel::FibRet236 => "fib_ret_236",
            StructureLevel::FibRet382 => "fib_ret_382",
            StructureLevel::FibRet500 => "fib_ret_500",
            StructureLevel::FibRet618 => "fib_ret_618",
            StructureLevel::FibRet786 => "fib_ret_786",
            StructureLevel::Support1 => "sr_support_1_dist",
            StructureLevel::Support2 => "sr_support_2_dist",
            StructureLevel::Resistance1 => "sr_resistance_1_dist",
            StructureLevel::Resistance2 => "sr_resistance_2_dist",
        }
    }

    pub fn is_fibonacci(self) -> bool {
        self.index() < 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_canonical_order() {
        for (i, level) in StructureLevel::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn column_names_are_unique() {
        let mut names: Vec<&str> = StructureLevel::ALL.iter().map(|l| l.column_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LEVEL_COUNT);
    }

    #[test]
    fn fibonacci_partition() {
        assert!(StructureLevel::FibRet786.is_fibonacci());
        assert!(!StructureLevel::Support1.is_fibonacci());
    }
}
