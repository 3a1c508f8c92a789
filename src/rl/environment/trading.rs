//! Trading Environment for RL Training
//!
//! Replays historical OHLCV bars behind a gym-like reset/step/render interface.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::traits::{BoxSpace, Environment, EpisodeReport, RenderMode, StepInfo, StepResult};
use crate::domain::PriceSeries;
use crate::error::{GymError, Result};
use crate::rl::config::TradingEnvConfig;
use crate::rl::core::{
    AccountState, ActionInterpreter, ActionVector, Observation, ObservationBuilder, ACTION_DIM,
    ACTION_HIGH, ACTION_LOW, OBS_COLS, OBS_ROWS,
};

/// Lifecycle of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeState {
    /// No episode has been started yet
    Uninitialized,
    /// Accepting steps
    Active,
    /// Terminated by the balance rule; only `reset` is valid
    Done,
}

impl EpisodeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Active => "active",
            Self::Done => "done",
        }
    }
}

/// Point-in-time account report, as printed by `render`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub step: usize,
    pub balance: f64,
    pub shares_held: f64,
    pub total_shares_sold: f64,
    pub average_share_cost: f64,
    pub total_sales_value: f64,
    /// Net worth with holdings marked at the current bar's open
    pub net_worth: f64,
    pub max_net_worth: f64,
    /// Net worth minus initial balance
    pub profit: f64,
}

impl std::fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Step: {}", self.step)?;
        writeln!(f, "Balance: {}", self.balance)?;
        writeln!(
            f,
            "Shares held: {} (Total sold: {})",
            self.shares_held, self.total_shares_sold
        )?;
        writeln!(
            f,
            "Avg cost for held shares: {} (Total sales value: {})",
            self.average_share_cost, self.total_sales_value
        )?;
        writeln!(
            f,
            "Net worth: {} (Max net worth: {})",
            self.net_worth, self.max_net_worth
        )?;
        write!(f, "Profit: {}", self.profit)
    }
}

/// Single-asset stock trading environment
///
/// Owns its account and random source; the price series is shared read-only.
pub struct StockTradingEnv<R: Rng = StdRng> {
    config: TradingEnvConfig,
    series: Arc<PriceSeries>,
    account: AccountState,
    start_step: usize,
    state: EpisodeState,
    interpreter: ActionInterpreter,
    observer: ObservationBuilder,
    rng: R,
}

impl StockTradingEnv<StdRng> {
    /// Create an environment seeded from OS entropy
    pub fn new(series: Arc<PriceSeries>, config: TradingEnvConfig) -> Result<Self> {
        Self::with_rng(series, config, StdRng::from_entropy())
    }

    /// Create a deterministic environment
    pub fn seeded(series: Arc<PriceSeries>, config: TradingEnvConfig, seed: u64) -> Result<Self> {
        Self::with_rng(series, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> StockTradingEnv<R> {
    /// Create an environment drawing fills and start indices from `rng`
    pub fn with_rng(series: Arc<PriceSeries>, config: TradingEnvConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let observer = ObservationBuilder::new(&config);

        Ok(Self {
            config,
            series,
            account: AccountState::default(),
            start_step: 0,
            state: EpisodeState::Uninitialized,
            interpreter: ActionInterpreter::new(),
            observer,
            rng,
        })
    }

    /// Start a new episode at an explicit bar index
    pub fn reset_at(&mut self, start_step: usize) -> Result<Observation> {
        let last = self.series.last_valid_index();
        if start_step > last {
            return Err(GymError::InvalidState(format!(
                "start step {} exceeds last valid index {}",
                start_step, last
            )));
        }
        Ok(self.begin_episode(start_step))
    }

    fn begin_episode(&mut self, start_step: usize) -> Observation {
        self.account = AccountState::new(self.config.initial_balance, start_step);
        self.start_step = start_step;
        self.state = EpisodeState::Active;

        info!(
            start_step,
            balance = self.account.balance,
            bars = self.series.len(),
            "Episode reset"
        );

        self.observation()
    }

    /// Observation for the current account and window
    pub fn observation(&self) -> Observation {
        self.observer.build(&self.series, &self.account)
    }

    /// Balance scaled by elapsed steps over the reward horizon
    fn calculate_reward(&self) -> f64 {
        let delay_modifier = self.account.current_step as f64 / self.config.max_steps;
        self.account.balance * delay_modifier
    }

    /// Episode ends when cash runs out or exceeds the balance ceiling
    fn check_done(&self) -> bool {
        self.account.balance <= 0.0 || self.account.balance > self.config.max_account_balance
    }

    /// Account report for the current step
    pub fn summary(&self) -> AccountSummary {
        let current_price = self.series.bar(self.account.current_step).open;
        let net_worth = self.account.net_worth(current_price);

        AccountSummary {
            step: self.account.current_step,
            balance: self.account.balance,
            shares_held: self.account.shares_held,
            total_shares_sold: self.account.total_shares_sold,
            average_share_cost: self.account.average_share_cost,
            total_sales_value: self.account.total_sales_value,
            net_worth,
            max_net_worth: self.account.max_net_worth,
            profit: net_worth - self.config.initial_balance,
        }
    }

    pub fn account(&self) -> &AccountState {
        &self.account
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn config(&self) -> &TradingEnvConfig {
        &self.config
    }

    pub fn series(&self) -> &Arc<PriceSeries> {
        &self.series
    }
}

impl<R: Rng> Environment for StockTradingEnv<R> {
    type Action = ActionVector;
    type Observation = Observation;

    fn action_space(&self) -> BoxSpace {
        BoxSpace::new(ACTION_LOW.to_vec(), ACTION_HIGH.to_vec(), vec![ACTION_DIM])
    }

    fn observation_space(&self) -> BoxSpace {
        BoxSpace::uniform(0.0, 1.0, vec![OBS_ROWS, OBS_COLS])
    }

    fn reward_range(&self) -> (f64, f64) {
        (0.0, self.config.max_account_balance)
    }

    fn reset(&mut self) -> Observation {
        let start_step = self.rng.gen_range(0..=self.series.last_valid_index());
        self.begin_episode(start_step)
    }

    fn step(&mut self, action: &ActionVector) -> Result<StepResult<Observation>> {
        match self.state {
            EpisodeState::Active => {}
            EpisodeState::Uninitialized => {
                return Err(GymError::InvalidState(
                    "step called before reset".to_string(),
                ))
            }
            EpisodeState::Done => {
                return Err(GymError::InvalidState(
                    "episode is done; call reset before stepping".to_string(),
                ))
            }
        }

        let bar = *self.series.bar(self.account.current_step);
        let outcome = self
            .interpreter
            .apply(&mut self.account, &bar, *action, &mut self.rng);

        self.account.current_step += 1;
        if self.account.current_step > self.series.last_valid_index() {
            debug!("Reached end of series, wrapping to first bar");
            self.account.current_step = 0;
        }

        let reward = self.calculate_reward();
        let done = self.check_done();

        debug!(
            step = self.account.current_step,
            action = outcome.action.name(),
            fill_price = outcome.fill_price,
            shares = outcome.shares_traded,
            balance = self.account.balance,
            net_worth = outcome.net_worth,
            reward,
            done,
            "Environment step"
        );

        if done {
            self.state = EpisodeState::Done;
            warn!(
                balance = self.account.balance,
                ceiling = self.config.max_account_balance,
                "Episode terminated by balance rule"
            );
        }

        Ok(StepResult {
            observation: self.observation(),
            reward,
            done,
            info: StepInfo::new(),
        })
    }

    fn render(&self, mode: RenderMode) {
        let summary = self.summary();
        match mode {
            RenderMode::Human => println!("{}", summary),
            RenderMode::Log => info!(
                step = summary.step,
                balance = summary.balance,
                shares_held = summary.shares_held,
                total_shares_sold = summary.total_shares_sold,
                average_share_cost = summary.average_share_cost,
                total_sales_value = summary.total_sales_value,
                net_worth = summary.net_worth,
                max_net_worth = summary.max_net_worth,
                profit = summary.profit,
                state = self.state.as_str(),
                "Account"
            ),
        }
    }
}

impl<R: Rng> EpisodeReport for StockTradingEnv<R> {
    fn episode_start(&self) -> usize {
        self.start_step
    }

    fn account_summary(&self) -> AccountSummary {
        self.summary()
    }
}
