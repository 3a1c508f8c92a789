use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::data::{generate_sample_bars, load_bars_from_csv};
use crate::domain::PriceSeries;
use crate::error::Result;
use crate::rl::{
    run_episodes, summarize_episodes, Environment, HoldPolicy, Policy, RandomPolicy, RenderMode,
    RunSummary, StockTradingEnv, TradingEnvConfig,
};

#[derive(Parser, Debug)]
#[command(name = "stock-gym")]
#[command(version = "0.1.0")]
#[command(about = "Stock trading environment for reinforcement learning", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory (default.toml plus an optional STOCK_GYM_PROFILE file)
    #[arg(short, long, default_value = "config")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run episodes against historical or synthetic bars
    Run(RunArgs),

    /// Print the declared action/observation spaces
    Spaces,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// CSV file with Date,Open,High,Low,Close,Volume columns
    #[arg(short, long, conflicts_with = "sample_bars")]
    pub data: Option<PathBuf>,

    /// Generate this many synthetic bars instead of loading a file
    #[arg(long)]
    pub sample_bars: Option<usize>,

    /// Number of episodes (overrides config)
    #[arg(short, long)]
    pub episodes: Option<usize>,

    /// Step cap per episode (overrides config)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// RNG seed (overrides config)
    #[arg(long, env = "STOCK_GYM_SEED")]
    pub seed: Option<u64>,

    /// Policy driving the environment
    #[arg(short, long, value_enum, default_value = "random")]
    pub policy: PolicyKind,

    /// Render the account after every step
    #[arg(long)]
    pub render: bool,

    /// Write the run summary as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Random,
    Hold,
}

const DEFAULT_SAMPLE_BARS: usize = 1_000;

/// Load bars from `--data` or synthesize them
fn build_series(args: &RunArgs, seed: Option<u64>) -> Result<PriceSeries> {
    let bars = match &args.data {
        Some(path) => load_bars_from_csv(path)?,
        None => {
            let n = args.sample_bars.unwrap_or(DEFAULT_SAMPLE_BARS);
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };
            info!("Generating {} synthetic bars", n);
            generate_sample_bars(n, 100.0, 0.02, &mut rng)
        }
    };
    PriceSeries::new(bars)
}

/// Run episodes as configured and return the summary
pub fn run_simulation(args: &RunArgs, app: &AppConfig) -> Result<RunSummary> {
    let episodes = args.episodes.unwrap_or(app.run.episodes);
    let max_steps = args.max_steps.unwrap_or(app.run.max_steps_per_episode);
    let seed = args.seed.or(app.run.seed);

    let series = Arc::new(build_series(args, seed)?);
    let mut env = match seed {
        Some(s) => StockTradingEnv::seeded(series, app.env.clone(), s)?,
        None => StockTradingEnv::new(series, app.env.clone())?,
    };

    let mut policy: Box<dyn Policy> = match args.policy {
        PolicyKind::Random => match seed {
            Some(s) => Box::new(RandomPolicy::seeded(s.wrapping_add(1))),
            None => Box::new(RandomPolicy::from_entropy()),
        },
        PolicyKind::Hold => Box::new(HoldPolicy),
    };

    info!(
        episodes,
        max_steps,
        policy = policy.name(),
        bars = env.series().len(),
        "Starting run"
    );

    let render = args.render.then_some(RenderMode::Human);
    let results = run_episodes(&mut env, policy.as_mut(), episodes, max_steps, render)?;
    env.close();

    let summary = summarize_episodes(&results);

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        info!("Wrote run summary to {}", path.display());
    }

    Ok(summary)
}

pub fn print_run_summary(summary: &RunSummary) {
    let rows = [
        ("Episodes:", summary.num_episodes.to_string()),
        ("Avg Reward:", format!("{:.2}", summary.avg_reward)),
        ("Avg Length:", format!("{:.1}", summary.avg_length)),
        ("Avg Profit:", format!("{:.2}", summary.avg_profit)),
        ("Best Profit:", format!("{:.2}", summary.best_profit)),
        ("Worst Profit:", format!("{:.2}", summary.worst_profit)),
        ("Terminated:", summary.terminated_episodes.to_string()),
        ("Episode Win %:", format!("{:.1}%", summary.episode_win_rate * 100.0)),
    ];

    println!("╔══════════════════════════════════════════════╗");
    println!("║  {:<44}║", "Run Summary");
    println!("╠══════════════════════════════════════════════╣");
    for (label, value) in rows {
        println!("║  {:<16}{:>14}{:14}║", label, value, "");
    }
    println!("╚══════════════════════════════════════════════╝");
}

/// Print the spaces of an environment built from `config`
pub fn show_spaces(config: &TradingEnvConfig) -> Result<()> {
    // Spaces do not depend on the data; a flat placeholder series suffices
    let mut rng = StdRng::seed_from_u64(0);
    let series = Arc::new(PriceSeries::new(generate_sample_bars(6, 1.0, 0.0, &mut rng))?);
    let env = StockTradingEnv::seeded(series, config.clone(), 0)?;
    let (reward_lo, reward_hi) = env.reward_range();

    println!("Action space:      {}", env.action_space());
    println!("  [0] action type: [0, 1) buy, [1, 2) sell, [2, 3] hold");
    println!("  [1] amount:      fraction of balance (buy) or holdings (sell)");
    println!("Observation space: {}", env.observation_space());
    println!("Reward range:      ({}, {})", reward_lo, reward_hi);
    Ok(())
}
