//! Subcommand bodies. Each returns the text to print so it can be tested
//! without capturing stdout.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use burner_core::format::format_hours;
use burner_core::{metrics, rank_focus, TaskRecord};
use burner_storage::{StateStore, StoreError, TaskSheet};

pub fn recalc(csv: &Path, today: NaiveDate) -> Result<String> {
    let mut sheet = TaskSheet::open(csv)
        .with_context(|| format!("failed to load {}", csv.display()))?;
    let count = sheet.recalculate(today);
    sheet
        .save()
        .with_context(|| format!("failed to write {}", csv.display()))?;
    Ok(format!("updated {} tasks in {}", count, csv.display()))
}

/// Rank the sheet as of `today`. Derived fields are recomputed in memory only;
/// the sheet on disk is left alone.
pub fn focus(csv: &Path, limit: usize, today: NaiveDate) -> Result<String> {
    let sheet = TaskSheet::open(csv)
        .with_context(|| format!("failed to load {}", csv.display()))?;
    let mut tasks = sheet.tasks();
    metrics::recalculate_all(&mut tasks, today);

    let top = rank_focus(&tasks, limit);
    if top.is_empty() {
        return Ok("no active tasks".to_string());
    }

    let mut out = String::from("Top focus tasks:");
    for (idx, task) in top.iter().enumerate() {
        write!(out, "\n{}", focus_line(idx + 1, task))?;
    }
    Ok(out)
}

pub fn focus_line(position: usize, task: &TaskRecord) -> String {
    format!(
        "{}. [{}] {} {} | score={} | catchup={}h | alloc_gap={}h/wk",
        position,
        task.status,
        task.id,
        task.title,
        task.burner_score,
        format_hours(task.catch_up_hours),
        format_hours(task.allocation_gap),
    )
}

pub fn seed(csv: &Path, state_path: &Path, force: bool) -> Result<String> {
    let store = StateStore::new(state_path, csv);
    if store.exists() && !force {
        return Err(StoreError::AlreadyExists(state_path.to_path_buf()))
            .context("pass --force to replace the board state");
    }

    let mut state = store.seed()?;
    store
        .save(&mut state)
        .with_context(|| format!("failed to write {}", state_path.display()))?;
    info!("Seeded {} from {}", state_path.display(), csv.display());
    Ok(format!(
        "seeded {} tasks into {}",
        state.tasks.len(),
        state_path.display()
    ))
}
