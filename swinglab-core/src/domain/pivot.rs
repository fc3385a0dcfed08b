//! Pivot — a confirmed swing extreme used as a geometric anchor.

use serde::{Deserialize, Serialize};

/// Whether a pivot is a swing high or a swing low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PivotKind {
    High,
    Low,
}

impl PivotKind {
    pub fn opposite(self) -> Self {
        match self {
            PivotKind::High => PivotKind::Low,
            PivotKind::Low => PivotKind::High,
        }
    }

    /// Single-letter tag used in logs and debug output ("H" / "L").
    pub fn tag(self) -> &'static str {
        match self {
            PivotKind::High => "H",
            PivotKind::Low => "L",
        }
    }
}

/// A typed swing extreme: kind, price and the bar it is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub kind: PivotKind,
    pub price: f64,
    pub bar_index: usize,
}

impl Pivot {
    pub fn high(price: f64, bar_index: usize) -> Self {
        Self {
            kind: PivotKind::High,
            price,
            bar_index,
        }
    }

    pub fn low(price: f64, bar_index: usize) -> Self {
        Self {
            kind: PivotKind::Low,
            price,
            bar_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flips_kind() {
        assert_eq!(PivotKind::High.opposite(), PivotKind::Low);
        assert_eq!(PivotKind::Low.opposite(), PivotKind::High);
    }

    #[test]
    fn constructors_set_kind() {
        assert_eq!(Pivot::high(10.0, 3).kind, PivotKind::High);
        assert_eq!(Pivot::low(9.0, 4).kind, PivotKind::Low);
        assert_eq!(PivotKind::Low.tag(), "L");
    }
}
