//! RL Configuration
//!
//! Configuration structs for the trading environment.

use serde::{Deserialize, Serialize};

use crate::error::{GymError, Result};

/// Trading environment configuration
///
/// Fixed at construction. The ceilings double as normalization constants for
/// the observation and, for `max_account_balance`, as the upper termination
/// threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingEnvConfig {
    /// Starting cash at every reset
    pub initial_balance: f64,
    /// Balance ceiling; exceeding it ends the episode
    pub max_account_balance: f64,
    /// Share-count scale for volume and holdings features
    pub max_num_shares: f64,
    /// Price scale for OHLC and cost-basis features
    pub max_share_price: f64,
    /// Reward horizon: reward ramps with elapsed steps up to this value
    pub max_steps: f64,
}

impl Default for TradingEnvConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            max_account_balance: 2_147_483_647.0,
            max_num_shares: 2_147_483_647.0,
            max_share_price: 5_000.0,
            max_steps: 20_000.0,
        }
    }
}

impl TradingEnvConfig {
    /// Reject constants that would make normalization or reward scaling meaningless
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("initial_balance", self.initial_balance),
            ("max_account_balance", self.max_account_balance),
            ("max_num_shares", self.max_num_shares),
            ("max_share_price", self.max_share_price),
            ("max_steps", self.max_steps),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(GymError::Validation(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }

        if self.initial_balance > self.max_account_balance {
            return Err(GymError::Validation(format!(
                "initial_balance {} exceeds max_account_balance {}",
                self.initial_balance, self.max_account_balance
            )));
        }

        Ok(())
    }

    /// Scale applied to the cumulative sales value feature
    pub fn max_sales_value(&self) -> f64 {
        self.max_num_shares * self.max_share_price
    }
}
