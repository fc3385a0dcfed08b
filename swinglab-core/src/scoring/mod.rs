//! Target/stop candidate scoring.
//!
//! Structural distances become five take-profit and seven stop-loss
//! candidates per side. Each is scored in [0, 1] from its reachability under
//! the current regime; the best of each set wins, earliest on ties.

pub mod candidate;
pub mod context;
pub mod scorer;

pub use candidate::{
    argmax, Candidate, CandidateLabel, CandidateSet, SL_CANDIDATES, TP_CANDIDATES,
};
pub use context::ScoringContext;
pub use scorer::{
    preferred_side, BarSuggestion, CandidateScorer, ScoringConfig, Selection, SideSuggestion,
    DISTANCE_EPSILON,
};
