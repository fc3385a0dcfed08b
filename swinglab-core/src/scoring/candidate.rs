//! Candidate labels and fixed-size candidate sets.

use crate::structure::StructureLevel;
use serde::{Deserialize, Serialize};

/// Take-profit candidates per side.
pub const TP_CANDIDATES: usize = 5;
/// Stop-loss candidates per side.
pub const SL_CANDIDATES: usize = 7;

/// Structural origin of a candidate distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateLabel {
    F127,
    F161,
    F200,
    R1,
    R2,
    S1,
    S2,
    Ret236,
    Ret382,
    Ret500,
    Ret618,
    Ret786,
}

impl CandidateLabel {
    /// Label as written to the `tp_source` / `sl_source` columns.
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateLabel::F127 => "F127",
            CandidateLabel::F161 => "F161",
            CandidateLabel::F200 => "F200",
            CandidateLabel::R1 => "R1",
            CandidateLabel::R2 => "R2",
            CandidateLabel::S1 => "S1",
            CandidateLabel::S2 => "S2",
            CandidateLabel::Ret236 => "RET236",
            CandidateLabel::Ret382 => "RET382",
            CandidateLabel::Ret500 => "RET500",
            CandidateLabel::Ret618 => "RET618",
            CandidateLabel::Ret786 => "RET786",
        }
    }

    /// The structural column this candidate reads its distance from.
    pub fn level(self) -> StructureLevel {
        match self {
            CandidateLabel::F127 => StructureLevel::FibExt127,
            CandidateLabel::F161 => StructureLevel::FibExt161,
            CandidateLabel::F200 => StructureLevel::FibExt200,
            CandidateLabel::R1 => StructureLevel::Resistance1,
            CandidateLabel::R2 => StructureLevel::Resistance2,
            CandidateLabel::S1 => StructureLevel::Support1,
            CandidateLabel::S2 => StructureLevel::Support2,
            CandidateLabel::Ret236 => StructureLevel::FibRet236,
            CandidateLabel::Ret382 => StructureLevel::FibRet382,
            CandidateLabel::Ret500 => StructureLevel::FibRet500,
            CandidateLabel::Ret618 => StructureLevel::FibRet618,
            CandidateLabel::Ret786 => StructureLevel::FibRet786,
        }
    }

    pub fn is_fibonacci(self) -> bool {
        self.level().is_fibonacci()
    }
}

impl std::fmt::Display for CandidateLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored candidate. `distance` is in volatility units and never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: CandidateLabel,
    pub distance: f64,
    pub score: f64,
}

/// Index of the highest score; ties resolve to the earliest candidate.
pub fn argmax(candidates: &[Candidate]) -> usize {
    let mut best = 0;
    for (i, c) in candidates.iter().enumerate().skip(1) {
        if c.score > candidates[best].score {
            best = i;
        }
    }
    best
}

/// Both candidate sets of one side, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub take_profit: [Candidate; TP_CANDIDATES],
    pub stop_loss: [Candidate; SL_CANDIDATES],
}
