use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ranking::DEFAULT_FOCUS_LIMIT;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Source of raw config values; the process environment in production.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt(lookup: Lookup<'_>, profile: &str, key: &str) -> Option<String> {
    let get = |k: &str| lookup(k).filter(|s| !s.is_empty());
    if !profile.is_empty() {
        if let Some(v) = get(&format!("{}_{}", profile, key)) {
            return Some(v);
        }
    }
    get(key)
}

fn profiled_or(lookup: Lookup<'_>, profile: &str, key: &str, default: &str) -> String {
    profiled_opt(lookup, profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_parse<T: std::str::FromStr>(lookup: Lookup<'_>, profile: &str, key: &str, default: T) -> T {
    profiled_opt(lookup, profile, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub board: BoardConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `BURNER_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_lookup("BURNER_PROFILE").unwrap_or_default();
        Self::from_lookup(&profile, &env_lookup)
    }

    /// Build config for a named profile from an arbitrary key lookup.
    pub fn from_lookup(profile: &str, lookup: Lookup<'_>) -> Self {
        let p = profile.trim().to_uppercase();
        Self {
            server: ServerConfig::from_profiled(lookup, &p),
            storage: StorageConfig::from_profiled(lookup, &p),
            board: BoardConfig::from_profiled(lookup, &p),
            profile: p,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:   {}:{}", self.server.host, self.server.port);
        tracing::info!("  tasks:    {}", self.storage.tasks_csv.display());
        tracing::info!("  state:    {}", self.storage.state_path.display());
        tracing::info!("  web:      {}", self.storage.web_dir.display());
        tracing::info!(
            "  board:    focus_limit={}, daily_hours={}",
            self.board.focus_limit,
            self.board.daily_hours
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_profiled(lookup: Lookup<'_>, p: &str) -> Self {
        Self {
            host: profiled_or(lookup, p, "HOST", "127.0.0.1"),
            port: profiled_parse(lookup, p, "PORT", 8765),
            cors_origin: profiled_or(lookup, p, "CORS_ORIGIN", "*"),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Hand-edited task sheet.
    pub tasks_csv: PathBuf,
    /// JSON board state written by the server.
    pub state_path: PathBuf,
    /// Static front-end files.
    pub web_dir: PathBuf,
}

impl StorageConfig {
    fn from_profiled(lookup: Lookup<'_>, p: &str) -> Self {
        let data_dir = PathBuf::from(profiled_or(lookup, p, "DATA_DIR", "data"));
        let tasks_csv = profiled_opt(lookup, p, "TASKS_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("tasks.csv"));
        let state_path = profiled_opt(lookup, p, "STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("state.json"));
        Self {
            tasks_csv,
            state_path,
            web_dir: PathBuf::from(profiled_or(lookup, p, "WEB_DIR", "web")),
            data_dir,
        }
    }
}

// ── Board ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub focus_limit: usize,
    /// Working hours per weekday, used when the board state has none.
    pub daily_hours: f64,
}

impl BoardConfig {
    fn from_profiled(lookup: Lookup<'_>, p: &str) -> Self {
        Self {
            focus_limit: profiled_parse(lookup, p, "FOCUS_LIMIT", DEFAULT_FOCUS_LIMIT),
            daily_hours: profiled_parse(lookup, p, "DAILY_HOURS", 8.0),
        }
    }
}
