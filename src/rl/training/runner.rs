//! Episode Runner
//!
//! Drives the environment with a policy and collects per-episode statistics.

use serde::Serialize;
use tracing::info;

use super::policy::Policy;
use crate::error::Result;
use crate::rl::core::{ActionVector, Observation};
use crate::rl::environment::{Environment, EpisodeReport, RenderMode};

/// Result of a single episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    /// Episode index within the run
    pub episode: usize,
    /// Bar index the episode started at
    pub start_step: usize,
    /// Steps taken
    pub length: usize,
    /// Sum of rewards
    pub total_reward: f64,
    /// Whether the balance rule ended the episode
    pub terminated: bool,
    pub final_balance: f64,
    pub final_net_worth: f64,
    pub max_net_worth: f64,
    /// Final net worth minus initial balance
    pub profit: f64,
}

/// Aggregate statistics over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub num_episodes: usize,
    pub avg_reward: f64,
    pub avg_length: f64,
    pub avg_profit: f64,
    pub total_profit: f64,
    pub best_profit: f64,
    pub worst_profit: f64,
    /// Episodes ended by the balance rule
    pub terminated_episodes: usize,
    /// Fraction of episodes with positive profit
    pub episode_win_rate: f64,
    pub episodes: Vec<EpisodeSummary>,
}

/// Run one episode until the environment reports done or `max_steps` is reached
pub fn run_episode<E, P>(
    env: &mut E,
    policy: &mut P,
    episode: usize,
    max_steps: usize,
    render: Option<RenderMode>,
) -> Result<EpisodeSummary>
where
    E: Environment<Action = ActionVector, Observation = Observation> + EpisodeReport,
    P: Policy + ?Sized,
{
    let mut obs = env.reset();
    let start_step = env.episode_start();
    let mut total_reward = 0.0;
    let mut length = 0;
    let mut terminated = false;

    while length < max_steps {
        let action = policy.act(&obs);
        let result = env.step(&action)?;
        total_reward += result.reward;
        length += 1;
        obs = result.observation;

        if let Some(mode) = render {
            env.render(mode);
        }

        if result.done {
            terminated = true;
            break;
        }
    }

    let account = env.account_summary();

    Ok(EpisodeSummary {
        episode,
        start_step,
        length,
        total_reward,
        terminated,
        final_balance: account.balance,
        final_net_worth: account.net_worth,
        max_net_worth: account.max_net_worth,
        profit: account.profit,
    })
}

/// Run `num_episodes` episodes back to back with the same policy
pub fn run_episodes<E, P>(
    env: &mut E,
    policy: &mut P,
    num_episodes: usize,
    max_steps: usize,
    render: Option<RenderMode>,
) -> Result<Vec<EpisodeSummary>>
where
    E: Environment<Action = ActionVector, Observation = Observation> + EpisodeReport,
    P: Policy + ?Sized,
{
    let mut results = Vec::with_capacity(num_episodes);

    for episode in 0..num_episodes {
        let result = run_episode(env, policy, episode, max_steps, render)?;

        info!(
            "Episode {}/{} ({}): start={}, steps={}, reward={:.2}, profit={:.2}, terminated={}",
            episode + 1,
            num_episodes,
            policy.name(),
            result.start_step,
            result.length,
            result.total_reward,
            result.profit,
            result.terminated
        );

        results.push(result);
    }

    Ok(results)
}

/// Calculate run summary statistics
pub fn summarize_episodes(results: &[EpisodeSummary]) -> RunSummary {
    if results.is_empty() {
        return RunSummary::default();
    }

    let n = results.len() as f64;

    let avg_reward = results.iter().map(|r| r.total_reward).sum::<f64>() / n;
    let avg_length = results.iter().map(|r| r.length as f64).sum::<f64>() / n;
    let total_profit: f64 = results.iter().map(|r| r.profit).sum();
    let best_profit = results
        .iter()
        .map(|r| r.profit)
        .fold(f64::NEG_INFINITY, f64::max);
    let worst_profit = results.iter().map(|r| r.profit).fold(f64::INFINITY, f64::min);
    let winning_episodes = results.iter().filter(|r| r.profit > 0.0).count();

    RunSummary {
        num_episodes: results.len(),
        avg_reward,
        avg_length,
        avg_profit: total_profit / n,
        total_profit,
        best_profit,
        worst_profit,
        terminated_episodes: results.iter().filter(|r| r.terminated).count(),
        episode_win_rate: winning_episodes as f64 / n,
        episodes: results.to_vec(),
    }
}
