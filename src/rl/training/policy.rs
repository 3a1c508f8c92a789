//! Policies that drive the environment outside of a learning algorithm.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rl::core::{ActionVector, Observation, TradeAction, ACTION_HIGH, ACTION_LOW};

/// Maps an observation to an action vector
#[cfg_attr(test, mockall::automock)]
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> ActionVector;

    fn name(&self) -> &'static str;
}

/// Samples uniformly inside the declared action space
pub struct RandomPolicy<R: Rng = StdRng> {
    rng: R,
}

impl RandomPolicy<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Policy for RandomPolicy<R> {
    fn act(&mut self, _observation: &Observation) -> ActionVector {
        [
            self.rng.gen_range(ACTION_LOW[0]..=ACTION_HIGH[0]),
            self.rng.gen_range(ACTION_LOW[1]..=ACTION_HIGH[1]),
        ]
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Never trades
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldPolicy;

impl Policy for HoldPolicy {
    fn act(&mut self, _observation: &Observation) -> ActionVector {
        TradeAction::Hold.to_vector()
    }

    fn name(&self) -> &'static str {
        "hold"
    }
}
