//! JSON board-state persistence.
//!
//! The state file lives at `{DATA_DIR}/state.json`. When it does not exist yet
//! the board is seeded from the task sheet (or from defaults when there is no
//! sheet either) and written out immediately.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use burner_core::task::{Status, TaskRecord};
use burner_core::BoardState;

use crate::error::StoreError;
use crate::sheet::TaskSheet;

/// Domain given to seeded tasks whose sheet cell is blank.
const SEED_DOMAIN: &str = "Research";

pub struct StateStore {
    state_path: PathBuf,
    seed_csv: PathBuf,
}

impl StateStore {
    pub fn new(state_path: impl Into<PathBuf>, seed_csv: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
            seed_csv: seed_csv.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn exists(&self) -> bool {
        self.state_path.exists()
    }

    /// Load the board, seeding and saving it first if the file is absent.
    pub fn load(&self) -> Result<BoardState, StoreError> {
        if self.exists() {
            let data = std::fs::read_to_string(&self.state_path)?;
            let state: BoardState = serde_json::from_str(&data)?;
            return Ok(state);
        }

        let mut state = self.seed()?;
        self.save(&mut state)?;
        Ok(state)
    }

    /// Stamp `updated_at`, write the board, and return the new timestamp.
    pub fn save(&self, state: &mut BoardState) -> Result<String, StoreError> {
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stamp = state.touch();
        let data = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.state_path, data)?;
        info!("Saved board state ({} tasks) to {}", state.tasks.len(), self.state_path.display());
        Ok(stamp)
    }

    /// Build a fresh board from the task sheet without touching the state file.
    pub fn seed(&self) -> Result<BoardState, StoreError> {
        if !self.seed_csv.exists() {
            warn!(
                "No task sheet at {}, starting from an empty board",
                self.seed_csv.display()
            );
            return Ok(BoardState::default());
        }
        let sheet = TaskSheet::open(&self.seed_csv)?;
        info!("Seeding board state from {}", sheet.path().display());
        Ok(seed_from_sheet(&sheet))
    }
}

/// Board with default budgets and one task per sheet row.
///
/// Blank domains become `Research` and blank statuses become `Backlog`.
pub fn seed_from_sheet(sheet: &TaskSheet) -> BoardState {
    let tasks = sheet.tasks().into_iter().map(seed_task).collect();
    let mut state = BoardState::with_tasks(tasks);
    state.touch();
    state
}

fn seed_task(mut task: TaskRecord) -> TaskRecord {
    if task.domain.trim().is_empty() {
        task.domain = SEED_DOMAIN.to_string();
    }
    if task.status == Status::Other(String::new()) {
        task.status = Status::Backlog;
    }
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SHEET: &str = "\
Task ID,Title,Domain,Status,Allocated Hours/Week,Owner,Sprint
KB-1,Paper,Teaching,Doing,4,me,S1
KB-2,Untriaged,,,2.5,,S2
";

    fn store_in(dir: &Path) -> StateStore {
        StateStore::new(dir.join("data").join("state.json"), dir.join("tasks.csv"))
    }

    #[test]
    fn load_seeds_from_sheet_and_persists() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("tasks.csv"), SHEET).unwrap();
        let store = store_in(tmp.path());
        assert!(!store.exists());

        let state = store.load().unwrap();
        assert!(store.exists());
        assert_eq!(state.tasks.len(), 2);
        assert_eq!(state.tasks[0].domain, "Teaching");
        assert_eq!(state.tasks[1].domain, "Research");
        assert_eq!(state.tasks[1].status, Status::Backlog);
        assert_eq!(state.tasks[1].allocated_hours, 2.5);
        assert_eq!(state.tasks[0].extra["Sprint"], json!("S1"));
        assert_eq!(state.budgets["Research"], 15.0);
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn load_without_sheet_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let state = store.load().unwrap();
        assert!(state.tasks.is_empty());
        assert_eq!(state.budgets.len(), 5);
        assert!(store.exists());
    }

    #[test]
    fn existing_state_wins_over_sheet() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("tasks.csv"), SHEET).unwrap();
        let store = store_in(tmp.path());

        let mut state = BoardState::from_payload(json!({
            "budgets": {"Research": 1},
            "tasks": [{"id": "only"}],
            "daily_hours": 6,
        }))
        .unwrap();
        store.save(&mut state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].id, "only");
        assert_eq!(loaded.budgets.len(), 1);
        assert_eq!(loaded.daily_hours(), Some(6.0));
    }

    #[test]
    fn save_stamps_updated_at() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let mut state = BoardState::default();
        let stamp = store.save(&mut state).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.state_path()).unwrap()).unwrap();
        assert_eq!(raw["updated_at"], json!(stamp));
    }

    #[test]
    fn sheet_columns_named_like_fields_reload() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("tasks.csv"),
            "Task ID,Title,owner,status\nKB-1,Paper,Grace,blocked\n",
        )
        .unwrap();
        let store = store_in(tmp.path());

        let seeded = store.load().unwrap();
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.tasks, seeded.tasks);
        assert_eq!(reloaded.tasks[0].owner, "");
        assert_eq!(reloaded.tasks[0].extra["owner (sheet)"], json!("Grace"));
        assert_eq!(reloaded.tasks[0].extra["status (sheet)"], json!("blocked"));
    }

    #[test]
    fn non_string_updated_at_in_file_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        std::fs::create_dir_all(tmp.path().join("data")).unwrap();
        std::fs::write(
            store.state_path(),
            r#"{"budgets": {"Research": 15}, "tasks": [], "updated_at": false}"#,
        )
        .unwrap();
        let state = store.load().unwrap();
        assert_eq!(state.updated_at, None);
        assert_eq!(state.budgets["Research"], 15.0);
    }

    #[test]
    fn corrupt_state_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        std::fs::create_dir_all(tmp.path().join("data")).unwrap();
        std::fs::write(store.state_path(), "{not json").unwrap();
        assert!(matches!(store.load().unwrap_err(), StoreError::Json(_)));
    }
}
