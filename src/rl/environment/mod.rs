//! Trading Environment for RL Training
//!
//! A gym-like environment that replays historical bars so agents can be
//! trained without risking real capital.

mod traits;
mod trading;

pub use traits::{BoxSpace, Environment, EpisodeReport, RenderMode, StepInfo, StepResult};
pub use trading::{AccountSummary, EpisodeState, StockTradingEnv};
