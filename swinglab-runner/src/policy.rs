//! Baseline decision policies for offline episodes.
//!
//! The learner proper is external; these exist to exercise the episode
//! driver and give reference numbers.

use crate::config::PolicyKind;
use rand::rngs::StdRng;
use rand::Rng;
use swinglab_core::episode::{Action, ActionKind, DecisionPolicy};
use swinglab_core::structure::LEVEL_COUNT;
use swinglab_core::table::OBSERVATION_LEN;

/// Position of the signed confidence inside an observation.
pub const CONFIDENCE_INDEX: usize = LEVEL_COUNT;

/// Trade in the direction of the signed confidence, with no adjustments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidencePolicy;

impl DecisionPolicy for ConfidencePolicy {
    fn decide(&mut self, observation: &[f64; OBSERVATION_LEN], _bar_index: usize) -> Action {
        let conf = observation[CONFIDENCE_INDEX];
        let kind = if conf > 0.0 {
            ActionKind::EnterLong
        } else if conf < 0.0 {
            ActionKind::EnterShort
        } else {
            ActionKind::NoTrade
        };
        Action::new(kind, 0.0, 0.0)
    }

    fn name(&self) -> &str {
        "confidence"
    }
}

/// Uniform random actions and deltas in [-1, 1] (the episode clamps them).
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl DecisionPolicy for RandomPolicy {
    fn decide(&mut self, _observation: &[f64; OBSERVATION_LEN], _bar_index: usize) -> Action {
        let kind = match self.rng.gen_range(0..3) {
            0 => ActionKind::NoTrade,
            1 => ActionKind::EnterLong,
            _ => ActionKind::EnterShort,
        };
        Action::new(kind, self.rng.gen_range(-1.0..=1.0), self.rng.gen_range(-1.0..=1.0))
    }

    fn name(&self) -> &str {
        "random"
    }
}

pub fn build_policy(kind: PolicyKind, rng: StdRng) -> Box<dyn DecisionPolicy + Send> {
    match kind {
        PolicyKind::Confidence => Box::new(ConfidencePolicy),
        PolicyKind::Random => Box::new(RandomPolicy::new(rng)),
    }
}
