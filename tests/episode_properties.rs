//! End-to-end properties of the trading environment over synthetic and flat series.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use stock_gym::data::generate_sample_bars;
use stock_gym::rl::EpisodeState;
use stock_gym::{
    Bar, Environment, GymError, PriceSeries, RenderMode, StockTradingEnv, TradingEnvConfig,
};

const BUY_ALL: [f64; 2] = [0.5, 1.0];
const SELL_ALL: [f64; 2] = [1.5, 1.0];
const HOLD: [f64; 2] = [2.5, 0.0];

fn flat_series(n: usize, price: f64) -> Arc<PriceSeries> {
    let start = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
    let bars = (0..n as i64)
        .map(|i| Bar::new(start + Duration::days(i), price, price, price, price, 1_000.0))
        .collect();
    Arc::new(PriceSeries::new(bars).unwrap())
}

fn random_series(n: usize, seed: u64) -> Arc<PriceSeries> {
    let mut rng = StdRng::seed_from_u64(seed);
    Arc::new(PriceSeries::new(generate_sample_bars(n, 120.0, 0.04, &mut rng)).unwrap())
}

fn random_action(rng: &mut StdRng) -> [f64; 2] {
    [rng.gen_range(0.0..3.0), rng.gen_range(0.0..=1.0)]
}

#[test]
fn test_reset_observation_is_finite_for_every_start() {
    let series = random_series(40, 1);
    let mut env = StockTradingEnv::seeded(series.clone(), TradingEnvConfig::default(), 1).unwrap();

    for start in 0..=series.last_valid_index() {
        let obs = env.reset_at(start).unwrap();
        assert_eq!(obs.len(), 6);
        assert!(obs.iter().all(|row| row.len() == 6));
        assert!(obs.iter().flatten().all(|v| v.is_finite()));
    }
}

#[test]
fn test_random_walk_invariants() {
    let mut env = StockTradingEnv::seeded(random_series(80, 2), TradingEnvConfig::default(), 2)
        .unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..5 {
        env.reset();
        let mut last_max = env.account().max_net_worth;

        for _ in 0..200 {
            let result = env.step(&random_action(&mut rng)).unwrap();
            let account = env.account();

            assert!(result.observation.iter().flatten().all(|v| v.is_finite()));
            assert!(account.max_net_worth >= last_max);
            if account.shares_held == 0.0 {
                assert_eq!(account.average_share_cost, 0.0);
            }
            last_max = account.max_net_worth;

            if result.done {
                break;
            }
        }
    }
}

#[test]
fn test_summary_is_idempotent() {
    let mut env = StockTradingEnv::seeded(random_series(30, 3), TradingEnvConfig::default(), 3)
        .unwrap();
    env.reset();
    env.step(&[0.5, 0.4]).unwrap();

    let first = env.summary();
    env.render(RenderMode::Log);
    env.render(RenderMode::Human);
    assert_eq!(env.summary(), first);
    assert_eq!(env.summary().to_string(), first.to_string());
}

#[test]
fn test_step_wraps_at_last_valid_index() {
    let series = flat_series(10, 50.0);
    let last = series.last_valid_index();
    let mut env = StockTradingEnv::seeded(series, TradingEnvConfig::default(), 4).unwrap();

    env.reset_at(last).unwrap();
    env.step(&HOLD).unwrap();
    assert_eq!(env.account().current_step, 0);

    env.step(&HOLD).unwrap();
    assert_eq!(env.account().current_step, 1);
}

#[test]
fn test_hold_only_episode_leaves_account_unchanged() {
    let mut env = StockTradingEnv::seeded(random_series(50, 5), TradingEnvConfig::default(), 5)
        .unwrap();
    env.reset();

    for _ in 0..300 {
        let result = env.step(&HOLD).unwrap();
        assert!(!result.done);
    }

    let account = env.account();
    assert_eq!(account.balance, 10_000.0);
    assert_eq!(account.shares_held, 0.0);
    assert_eq!(account.total_shares_sold, 0.0);
    assert_eq!(account.max_net_worth, 10_000.0);
    assert_eq!(env.state(), EpisodeState::Active);
}

#[test]
fn test_buy_all_at_flat_price_terminates() {
    let mut env = StockTradingEnv::seeded(flat_series(20, 100.0), TradingEnvConfig::default(), 6)
        .unwrap();
    env.reset_at(0).unwrap();

    let bought = env.step(&BUY_ALL).unwrap();
    assert!(bought.done);
    assert_eq!(bought.reward, 0.0);

    let account = env.account();
    assert_eq!(account.shares_held, 100.0);
    assert_eq!(account.balance, 0.0);
    assert_eq!(account.average_share_cost, 100.0);
    assert_eq!(account.max_net_worth, 10_000.0);
    assert_eq!(env.summary().net_worth, 10_000.0);
    assert_eq!(env.summary().profit, 0.0);

    env.reset_at(0).unwrap();
    assert_eq!(env.account().shares_held, 0.0);
    assert_eq!(env.account().balance, 10_000.0);
}

#[test]
fn test_partial_buy_then_sell_restores_balance() {
    let mut env = StockTradingEnv::seeded(flat_series(20, 100.0), TradingEnvConfig::default(), 7)
        .unwrap();
    env.reset_at(0).unwrap();

    let result = env.step(&[0.2, 0.5]).unwrap();
    assert!(!result.done);
    assert_eq!(env.account().shares_held, 50.0);
    assert_eq!(env.account().balance, 5_000.0);
    assert_eq!(env.account().average_share_cost, 100.0);

    let result = env.step(&SELL_ALL).unwrap();
    assert!(!result.done);
    let account = env.account();
    assert_eq!(account.balance, 10_000.0);
    assert_eq!(account.shares_held, 0.0);
    assert_eq!(account.average_share_cost, 0.0);
    assert_eq!(account.total_shares_sold, 50.0);
    assert_eq!(account.total_sales_value, 5_000.0);
    assert_eq!(account.current_step, 2);
    assert_eq!(result.reward, 10_000.0 * 2.0 / 20_000.0);
}

#[test]
fn test_step_outside_active_episode_is_rejected() {
    let mut env = StockTradingEnv::seeded(flat_series(12, 10.0), TradingEnvConfig::default(), 8)
        .unwrap();
    assert!(matches!(env.step(&HOLD), Err(GymError::InvalidState(_))));

    env.reset();
    assert!(env.step(&BUY_ALL).unwrap().done);
    assert_eq!(env.state(), EpisodeState::Done);
    assert!(matches!(env.step(&HOLD), Err(GymError::InvalidState(_))));

    env.reset();
    assert_eq!(env.state(), EpisodeState::Active);
    assert!(env.step(&HOLD).is_ok());
}

#[test]
fn test_down_bar_fills_between_close_and_open() {
    let start = NaiveDate::from_ymd_opt(2022, 2, 1).unwrap();
    let bars = (0..8)
        .map(|i| Bar::new(start + Duration::days(i), 120.0, 125.0, 75.0, 80.0, 2_000.0))
        .collect();
    let series = Arc::new(PriceSeries::new(bars).unwrap());
    let mut env = StockTradingEnv::seeded(series, TradingEnvConfig::default(), 9).unwrap();

    for _ in 0..20 {
        env.reset();
        env.step(&[0.1, 0.5]).unwrap();
        let fill = env.account().average_share_cost;
        assert!((80.0..=120.0).contains(&fill), "fill {} outside [80, 120]", fill);
    }
}

#[test]
fn test_zero_amount_buy_keeps_cost_basis_defined() {
    let mut env = StockTradingEnv::seeded(flat_series(12, 30.0), TradingEnvConfig::default(), 10)
        .unwrap();
    env.reset_at(0).unwrap();

    let result = env.step(&[0.3, 0.0]).unwrap();
    assert!(!result.done);
    assert_eq!(env.account().average_share_cost, 0.0);
    assert_eq!(env.account().shares_held, 0.0);
    assert!(!env.account().average_share_cost.is_nan());
}

#[test]
fn test_declared_spaces() {
    let env =
        StockTradingEnv::seeded(flat_series(6, 1.0), TradingEnvConfig::default(), 11).unwrap();

    let action = env.action_space();
    assert_eq!(action.shape, vec![2]);
    assert!(action.contains(&[0.0, 0.0]));
    assert!(action.contains(&[3.0, 1.0]));
    assert!(!action.contains(&[3.5, 0.5]));

    assert_eq!(env.observation_space().shape, vec![6, 6]);
    assert_eq!(env.reward_range(), (0.0, 2_147_483_647.0));
}

#[test]
fn test_seeded_environments_agree() {
    let series = random_series(60, 12);
    let mut a = StockTradingEnv::seeded(series.clone(), TradingEnvConfig::default(), 42).unwrap();
    let mut b = StockTradingEnv::seeded(series, TradingEnvConfig::default(), 42).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    assert_eq!(a.reset(), b.reset());
    for _ in 0..50 {
        let action = random_action(&mut rng);
        let ra = a.step(&action).unwrap();
        let rb = b.step(&action).unwrap();
        assert_eq!(ra, rb);
        if ra.done {
            break;
        }
    }
}
