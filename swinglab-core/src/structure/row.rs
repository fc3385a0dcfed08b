//! Per-bar structural feature rows.

use super::levels::{StructureLevel, LEVEL_COUNT};
use serde::{Deserialize, Serialize};

/// Raw per-bar measurements before forward-fill; `None` means unavailable.
pub type RawStructure = [Option<f64>; LEVEL_COUNT];

/// Final, filled and clamped distances for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuralFeatureRow {
    pub values: [f64; LEVEL_COUNT],
}

impl StructuralFeatureRow {
    pub fn get(&self, level: StructureLevel) -> f64 {
        self.values[level.index()]
    }

    pub fn set(&mut self, level: StructureLevel, value: f64) {
        self.values[level.index()] = value;
    }

    /// `(column_name, value)` pairs in canonical order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        StructureLevel::ALL
            .iter()
            .map(move |&level| (level.column_name(), self.get(level)))
    }

    /// Build a row from explicit values (mostly for scorer tests and callers
    /// that load precomputed feature tables).
    pub fn from_pairs(pairs: &[(StructureLevel, f64)]) -> Self {
        let mut row = Self::default();
        for &(level, value) in pairs {
            row.set(level, value);
        }
        row
    }
}

/// Forward-fill each column, default leading gaps to 0, sanitize non-finite
/// values to 0 and clamp to `±clamp`.
pub fn finalize_rows(raw: &[RawStructure], clamp: f64) -> Vec<StructuralFeatureRow> {
    let mut carried: [Option<f64>; LEVEL_COUNT] = [None; LEVEL_COUNT];
    raw.iter()
        .map(|measured| {
            let mut row = StructuralFeatureRow::default();
            for (col, value) in measured.iter().enumerate() {
                if value.is_some() {
                    carried[col] = *value;
                }
                let v = carried[col].unwrap_or(0.0);
                let v = if v.is_finite() { v } else { 0.0 };
                row.values[col] = v.clamp(-clamp, clamp);
            }
            row
        })
        .collect()
}
