//! Account ledger for one episode.

use serde::{Deserialize, Serialize};

/// Mutable account state owned by the environment
///
/// Invariant: `average_share_cost` is 0 whenever `shares_held` is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    /// Cash balance
    pub balance: f64,
    /// Shares currently held
    pub shares_held: f64,
    /// Weighted average cost of held shares
    pub average_share_cost: f64,
    /// Shares sold over the episode
    pub total_shares_sold: f64,
    /// Proceeds of all sales over the episode
    pub total_sales_value: f64,
    /// Running maximum of net worth
    pub max_net_worth: f64,
    /// Index of the current bar in the price series
    pub current_step: usize,
}

impl AccountState {
    /// Fresh account for a new episode
    pub fn new(initial_balance: f64, start_step: usize) -> Self {
        Self {
            balance: initial_balance,
            shares_held: 0.0,
            average_share_cost: 0.0,
            total_shares_sold: 0.0,
            total_sales_value: 0.0,
            max_net_worth: initial_balance,
            current_step: start_step,
        }
    }

    /// Balance plus holdings marked at `price`
    pub fn net_worth(&self, price: f64) -> f64 {
        self.balance + self.shares_held * price
    }

    /// Spend `fraction` of the balance on shares at `price`
    ///
    /// Returns the number of shares bought. The cost basis becomes the
    /// share-weighted average of the old holdings and the new purchase; when
    /// the resulting holding is exactly zero the basis is 0.
    pub fn buy(&mut self, price: f64, fraction: f64) -> f64 {
        let total_possible = self.balance / price;
        let shares_bought = total_possible * fraction;
        let prev_cost = self.average_share_cost * self.shares_held;
        let additional_cost = shares_bought * price;
        let total_shares = self.shares_held + shares_bought;

        self.balance -= additional_cost;
        self.average_share_cost = if total_shares == 0.0 {
            0.0
        } else {
            (prev_cost + additional_cost) / total_shares
        };
        self.shares_held = total_shares;

        shares_bought
    }

    /// Sell `fraction` of current holdings at `price`
    ///
    /// Returns the number of shares sold.
    pub fn sell(&mut self, price: f64, fraction: f64) -> f64 {
        let shares_sold = self.shares_held * fraction;
        let proceeds = shares_sold * price;

        self.balance += proceeds;
        self.shares_held -= shares_sold;
        self.total_shares_sold += shares_sold;
        self.total_sales_value += proceeds;

        shares_sold
    }

    /// Update the net-worth peak and the empty-holdings cost invariant
    ///
    /// Returns net worth at `price`.
    pub fn mark_to_market(&mut self, price: f64) -> f64 {
        let net_worth = self.net_worth(price);
        if net_worth > self.max_net_worth {
            self.max_net_worth = net_worth;
        }
        if self.shares_held == 0.0 {
            self.average_share_cost = 0.0;
        }
        net_worth
    }
}

impl Default for AccountState {
    fn default() -> Self {
        Self::new(0.0, 0)
    }
}
