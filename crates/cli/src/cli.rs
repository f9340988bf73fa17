use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Local Kanban Burner CLI.
///
/// Recalculates the derived columns of the task sheet and shows which active
/// tasks need attention first. Paths and the focus limit default to the
/// environment configuration (`TASKS_CSV`, `STATE_PATH`, `FOCUS_LIMIT`).
#[derive(Parser, Debug)]
#[command(name = "kb", about = "Kanban Burner local CLI")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recalculate computed fields in the task sheet
    Recalc {
        /// Path to tasks CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show top focus candidates
    Focus {
        /// Path to tasks CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Number of tasks to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Build the JSON board state from the task sheet
    Seed {
        /// Path to tasks CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Path of the board state to write
        #[arg(long)]
        state: Option<PathBuf>,

        /// Overwrite an existing board state
        #[arg(long)]
        force: bool,
    },
}
