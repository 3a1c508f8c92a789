use clap::Parser;
use stock_gym::cli::{self, Cli, Commands};
use stock_gym::config::{AppConfig, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;

    match &cli.command {
        Commands::Run(args) => {
            init_logging(&config.logging);
            info!("Loaded config from {}", cli.config.display());
            let summary = cli::run_simulation(args, &config)?;
            cli::print_run_summary(&summary);
        }
        Commands::Spaces => {
            init_logging_simple();
            cli::show_spaces(&config.env)?;
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn init_logging_simple() {
    // Minimal logging for informational commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
