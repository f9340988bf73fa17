use chrono::NaiveDate;
use tokio::sync::Mutex;

use burner_core::Config;
use burner_storage::StateStore;

/// Shared server state.
///
/// Every handler that reads or rewrites the board holds `store` for the whole
/// load/modify/save cycle, so overlapping requests never interleave.
pub struct AppState {
    pub config: Config,
    pub store: Mutex<StateStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = StateStore::new(&config.storage.state_path, &config.storage.tasks_csv);
        Self {
            config,
            store: Mutex::new(store),
        }
    }

    /// Reference date for recalculation.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
