use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use snake_fruits::game::GameConfig;
use snake_fruits::modes::HumanMode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "snake_fruits")]
#[command(version, about = "Snake game for the terminal")]
struct Cli {
    /// TOML file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Milliseconds between game steps
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for reproducible food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Tracing filter, e.g. "info", "debug"
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_toml(path)?,
        None => GameConfig::default(),
    };

    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&cli.log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = build_config(&cli)?;
    tracing::info!(?config, "starting");

    let mut human_mode = HumanMode::new(config)?;
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["snake_fruits"]);
        assert_eq!(build_config(&cli).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "snake_fruits",
            "--grid-size",
            "12",
            "--tick-ms",
            "90",
            "--seed",
            "5",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.tick_interval_ms, 90);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = Cli::parse_from(["snake_fruits", "--grid-size", "2"]);
        assert!(build_config(&cli).is_err());
    }
}
