pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod rl;

pub use config::AppConfig;
pub use domain::{Bar, Channel, PriceSeries, LOOKBACK_WINDOW};
pub use error::{GymError, Result};
pub use rl::{
    ActionVector, Environment, Observation, RenderMode, StepResult, StockTradingEnv,
    TradingEnvConfig,
};
