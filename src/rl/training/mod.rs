//! Training Infrastructure
//!
//! Policies and the episode runner an external learner plugs into.

pub mod policy;
pub mod runner;

pub use policy::{HoldPolicy, Policy, RandomPolicy};
pub use runner::{run_episode, run_episodes, summarize_episodes, EpisodeSummary, RunSummary};
