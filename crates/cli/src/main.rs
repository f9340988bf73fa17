mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::cli::{CliArgs, Command};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    burner_core::config::load_dotenv();
    let config = burner_core::Config::from_env();
    debug!(profile = config.profile_label(), "configuration loaded");

    let today = chrono::Local::now().date_naive();
    let default_csv = config.storage.tasks_csv.clone();

    let output = match args.command {
        Command::Recalc { csv } => commands::recalc(&csv.unwrap_or(default_csv), today)?,
        Command::Focus { csv, limit } => commands::focus(
            &csv.unwrap_or(default_csv),
            limit.unwrap_or(config.board.focus_limit),
            today,
        )?,
        Command::Seed { csv, state, force } => commands::seed(
            &csv.unwrap_or(default_csv),
            &state.unwrap_or_else(|| config.storage.state_path.clone()),
            force,
        )?,
    };

    println!("{}", output);
    Ok(())
}
