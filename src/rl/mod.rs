//! Reinforcement Learning Module
//!
//! Stock trading environment with a gym-style interface.
//!
//! # Features
//!
//! - **Observation**: 6×6 matrix of normalized lookback bars and account ratios
//! - **Action Space**: continuous `[action_type, amount]` decoded into buy/sell/hold
//! - **Environment**: reset/step/render over historical OHLCV bars
//! - **Runner**: drive episodes with any `Policy` and summarize the results

pub mod config;
pub mod core;
pub mod environment;
pub mod training;

// Config exports
pub use config::TradingEnvConfig;

// Core exports
pub use core::{
    flatten_observation, AccountState, ActionInterpreter, ActionVector, Observation,
    ObservationBuilder, TradeAction, TradeOutcome, ACTION_DIM, OBS_COLS, OBS_ROWS,
    TOTAL_FEATURES,
};

// Environment exports
pub use environment::{
    AccountSummary, BoxSpace, Environment, EpisodeReport, EpisodeState, RenderMode, StepInfo,
    StepResult, StockTradingEnv,
};

// Training exports
pub use training::{
    run_episode, run_episodes, summarize_episodes, EpisodeSummary, HoldPolicy, Policy,
    RandomPolicy, RunSummary,
};
