use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::rl::TradingEnvConfig;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub env: TradingEnvConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Episodes to run
    #[serde(default = "default_episodes")]
    pub episodes: usize,
    /// Step cap per episode (the environment itself only ends on the balance rule)
    #[serde(default = "default_max_steps_per_episode")]
    pub max_steps_per_episode: usize,
    /// Seed for the environment and random policy; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_episodes() -> usize {
    10
}

fn default_max_steps_per_episode() -> usize {
    2_000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            episodes: default_episodes(),
            max_steps_per_episode: default_max_steps_per_episode(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: TradingEnvConfig::default(),
            run: RunConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        let profile =
            std::env::var("STOCK_GYM_PROFILE").unwrap_or_else(|_| "development".to_string());

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("run.episodes", default_episodes() as i64)?
            .set_default(
                "run.max_steps_per_episode",
                default_max_steps_per_episode() as i64,
            )?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/evaluation.toml)
            .add_source(File::from(config_dir.join(profile)).required(false))
            // Override with environment variables (STOCK_GYM_ENV__INITIAL_BALANCE, etc.)
            .add_source(
                Environment::with_prefix("STOCK_GYM")
                    .separator("__")
                    .try_parsing(true),
            );

        let app: AppConfig = builder.build()?.try_deserialize()?;
        app.env.validate()?;
        Ok(app)
    }
}
