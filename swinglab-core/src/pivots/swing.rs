//! Swing state machine.
//!
//! ```text
//!            seed                     close > anchor: extend
//!   Unset ─────────▶ Up ◀──────────────────────────────┐
//!                    │ anchor - close > rev: High pivot │
//!                    ▼                                  │
//!                   Down ── close - anchor > rev: Low ──┘
//! ```
//!
//! The transition is a pure function of (state, bar index, close, reversal
//! threshold). The emitted pivot carries the swing's anchor price and is
//! attributed to the bar before the confirming bar.

use crate::domain::{Pivot, PivotKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingDirection {
    Unset,
    Up,
    Down,
}

/// Direction of the current swing and its most extreme close so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingState {
    pub direction: SwingDirection,
    pub anchor_price: f64,
}

/// What a single bar did to the swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// First bar: anchor initialised, direction seeded to `Up`.
    Seeded,
    /// Close moved beyond the anchor in the swing direction.
    Extended,
    /// Pullback smaller than the reversal threshold.
    Held,
    /// Pullback exceeded the threshold; the swing extreme is confirmed.
    Reversed(Pivot),
}

impl Transition {
    pub fn pivot(&self) -> Option<Pivot> {
        match self {
            Transition::Reversed(p) => Some(*p),
            _ => None,
        }
    }
}

impl Default for SwingState {
    fn default() -> Self {
        Self::unset()
    }
}

impl SwingState {
    pub const fn unset() -> Self {
        Self {
            direction: SwingDirection::Unset,
            anchor_price: 0.0,
        }
    }

    /// Advance the swing by one bar.
    pub fn step(self, bar_index: usize, close: f64, reversal: f64) -> (SwingState, Transition) {
        let prior_bar = bar_index.saturating_sub(1);
        match self.direction {
            SwingDirection::Unset => (
                SwingState {
                    direction: SwingDirection::Up,
                    anchor_price: close,
                },
                Transition::Seeded,
            ),
            SwingDirection::Up => {
                if close > self.anchor_price {
                    (self.with_anchor(close), Transition::Extended)
                } else if self.anchor_price - close > reversal {
                    let pivot = Pivot {
                        kind: PivotKind::High,
                        price: self.anchor_price,
                        bar_index: prior_bar,
                    };
                    (
                        SwingState {
                            direction: SwingDirection::Down,
                            anchor_price: close,
                        },
                        Transition::Reversed(pivot),
                    )
                } else {
                    (self, Transition::Held)
                }
            }
            SwingDirection::Down => {
                if close < self.anchor_price {
                    (self.with_anchor(close), Transition::Extended)
                } else if close - self.anchor_price > reversal {
                    let pivot = Pivot {
                        kind: PivotKind::Low,
                        price: self.anchor_price,
                        bar_index: prior_bar,
                    };
                    (
                        SwingState {
                            direction: SwingDirection::Up,
                            anchor_price: close,
                        },
                        Transition::Reversed(pivot),
                    )
                } else {
                    (self, Transition::Held)
                }
            }
        }
    }

    fn with_anchor(self, anchor_price: f64) -> Self {
        Self {
            anchor_price,
            ..self
        }
    }
}
