//! Core RL abstractions
//!
//! Account ledger, action interpretation and observation building.

pub mod account;
pub mod action;
pub mod observation;

pub use account::AccountState;
pub use action::{
    sample_fill_price, ActionInterpreter, ActionVector, TradeAction, TradeOutcome, ACTION_DIM,
    ACTION_HIGH, ACTION_LOW,
};
pub use observation::{
    flatten_observation, Observation, ObservationBuilder, OBS_COLS, OBS_ROWS, TOTAL_FEATURES,
};
