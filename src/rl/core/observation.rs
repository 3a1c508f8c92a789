//! State Representation
//!
//! Builds the normalized 6×6 observation matrix: five rows of lookback
//! prices/volume followed by one row of account ratios.

use super::account::AccountState;
use crate::domain::{Channel, PriceSeries, LOOKBACK_WINDOW};
use crate::rl::config::TradingEnvConfig;

/// Rows in an observation (5 market channels + 1 account row)
pub const OBS_ROWS: usize = 6;

/// Columns in an observation
pub const OBS_COLS: usize = LOOKBACK_WINDOW;

/// Total number of features once flattened
pub const TOTAL_FEATURES: usize = OBS_ROWS * OBS_COLS;

/// Normalized observation matrix
pub type Observation = [[f64; OBS_COLS]; OBS_ROWS];

/// Scales market and account state by the configured ceilings
///
/// Values are not clamped: state beyond a ceiling yields entries above 1.
#[derive(Debug, Clone)]
pub struct ObservationBuilder {
    max_share_price: f64,
    max_num_shares: f64,
    max_account_balance: f64,
    max_sales_value: f64,
}

impl ObservationBuilder {
    pub fn new(config: &TradingEnvConfig) -> Self {
        Self {
            max_share_price: config.max_share_price,
            max_num_shares: config.max_num_shares,
            max_account_balance: config.max_account_balance,
            max_sales_value: config.max_sales_value(),
        }
    }

    /// Observation for the window starting at `account.current_step`
    pub fn build(&self, series: &PriceSeries, account: &AccountState) -> Observation {
        let mut obs = [[0.0; OBS_COLS]; OBS_ROWS];

        for (row, channel) in obs.iter_mut().zip(Channel::all()) {
            let scale = if channel.is_price() {
                self.max_share_price
            } else {
                self.max_num_shares
            };
            let window = series.channel_window(account.current_step, *channel);
            for (slot, value) in row.iter_mut().zip(window) {
                *slot = value / scale;
            }
        }

        obs[OBS_ROWS - 1] = [
            account.balance / self.max_account_balance,
            account.max_net_worth / self.max_account_balance,
            account.shares_held / self.max_num_shares,
            account.average_share_cost / self.max_share_price,
            account.total_shares_sold / self.max_num_shares,
            account.total_sales_value / self.max_sales_value,
        ];

        obs
    }
}

/// Row-major flattening for policies that take a feature vector
pub fn flatten_observation(obs: &Observation) -> Vec<f32> {
    obs.iter().flatten().map(|v| *v as f32).collect()
}
