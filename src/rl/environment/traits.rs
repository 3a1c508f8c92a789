use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::trading::AccountSummary;
use crate::error::{GymError, Result};

/// Auxiliary per-step information (always empty for the stock environment)
pub type StepInfo = HashMap<String, f64>;

/// Continuous box-shaped space with per-element bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    /// Lower bound per element, row-major
    pub low: Vec<f64>,
    /// Upper bound per element, row-major
    pub high: Vec<f64>,
    pub shape: Vec<usize>,
}

impl BoxSpace {
    /// Space with explicit per-element bounds
    pub fn new(low: Vec<f64>, high: Vec<f64>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(low.len(), high.len());
        debug_assert_eq!(low.len(), shape.iter().product::<usize>());
        Self { low, high, shape }
    }

    /// Space with the same bounds for every element
    pub fn uniform(low: f64, high: f64, shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            low: vec![low; size],
            high: vec![high; size],
            shape,
        }
    }

    /// Number of scalar elements
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Check that `values` fit the bounds element-wise
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.size()
            && values
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (lo, hi))| *v >= *lo && *v <= *hi)
    }
}

impl std::fmt::Display for BoxSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lo = self.low.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = self.high.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        write!(f, "Box({}, {}, shape={:?})", lo, hi, self.shape)
    }
}

/// Result of taking a step in an environment
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult<O> {
    /// New observation after the action
    pub observation: O,
    /// Reward signal
    pub reward: f64,
    /// Whether the episode has ended
    pub done: bool,
    /// Additional info
    pub info: StepInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Print a report to stdout
    Human,
    /// Emit the report as a structured log event
    Log,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::Human
    }
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Log => "log",
        }
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = GymError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "log" => Ok(Self::Log),
            other => Err(GymError::Validation(format!(
                "invalid render mode '{}'; expected human|log",
                other
            ))),
        }
    }
}

/// Gym-style interaction contract consumed by a training loop
pub trait Environment {
    type Action;
    type Observation;

    /// Declared bounds of valid actions
    fn action_space(&self) -> BoxSpace;

    /// Declared bounds of observations
    fn observation_space(&self) -> BoxSpace;

    /// Nominal (min, max) reward
    fn reward_range(&self) -> (f64, f64);

    /// Start a new episode and return its first observation
    fn reset(&mut self) -> Self::Observation;

    /// Advance one step
    fn step(&mut self, action: &Self::Action) -> Result<StepResult<Self::Observation>>;

    /// Report the current state without mutating it
    fn render(&self, mode: RenderMode);

    /// Release resources held by the environment
    fn close(&mut self) {}
}

/// Account bookkeeping a runner reads back after an episode
pub trait EpisodeReport {
    /// Bar index the current episode started at
    fn episode_start(&self) -> usize;

    /// Account snapshot at the current step
    fn account_summary(&self) -> AccountSummary;
}
