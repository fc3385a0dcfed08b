//! Trade simulation and reward.

pub mod barrier;
pub mod reward;

pub use barrier::{simulate_trade, IntrabarOrder, SimulationConfig, TradeSimulator};
pub use reward::{reward, RewardBreakdown, RewardConfig, RewardFunction, RewardInputs};
