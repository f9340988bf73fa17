//! Focus ranking and budget rollup endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use burner_core::budget::{capacity_summary, domain_allocation, CapacitySummary, DomainAllocation};
use burner_core::format::format_hours;
use burner_core::{rank_focus, TaskRecord};

use crate::state::AppState;

use super::{bad_request, internal, ApiError};

/// Raw query; `limit` is parsed by [`FocusParams::resolve_limit`].
#[derive(Debug, Deserialize)]
pub struct FocusParams {
    pub limit: Option<String>,
}

impl FocusParams {
    fn resolve_limit(&self, default: usize) -> Result<usize, ApiError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                bad_request(format!("limit must be a non-negative integer, got '{}'", raw))
            }),
        }
    }
}

/// Hours rendered for display; the numeric fields stay at full precision.
#[derive(Debug, Serialize)]
pub struct FocusDisplay {
    pub catch_up_hours: String,
    pub required_hours_per_week: String,
    pub allocation_gap: String,
}

#[derive(Debug, Serialize)]
pub struct FocusItem {
    pub rank: usize,
    pub id: String,
    pub title: String,
    pub domain: String,
    pub status: String,
    pub burner_score: i64,
    pub catch_up_hours: f64,
    pub required_hours_per_week: f64,
    pub allocation_gap: f64,
    pub display: FocusDisplay,
}

impl FocusItem {
    fn new(rank: usize, task: &TaskRecord) -> Self {
        Self {
            rank,
            id: task.id.clone(),
            title: task.title.clone(),
            domain: task.domain.clone(),
            status: task.status.to_string(),
            burner_score: task.burner_score,
            catch_up_hours: task.catch_up_hours,
            required_hours_per_week: task.required_hours_per_week,
            allocation_gap: task.allocation_gap,
            display: FocusDisplay {
                catch_up_hours: format_hours(task.catch_up_hours),
                required_hours_per_week: format_hours(task.required_hours_per_week),
                allocation_gap: format_hours(task.allocation_gap),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FocusResponse {
    pub limit: usize,
    pub active: usize,
    pub tasks: Vec<FocusItem>,
    pub updated_at: String,
}

/// Recalculate as of today, persist, and return the top `limit` active tasks.
pub async fn focus(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FocusParams>,
) -> Result<Json<FocusResponse>, ApiError> {
    let limit = params.resolve_limit(state.config.board.focus_limit)?;
    let today = state.today();

    let store = state.store.lock().await;
    let mut board = store.load().map_err(internal)?;
    board.recalculate(today);
    let updated_at = store.save(&mut board).map_err(internal)?;

    let active = board.tasks.iter().filter(|t| !t.is_done()).count();
    let tasks = rank_focus(&board.tasks, limit)
        .into_iter()
        .enumerate()
        .map(|(i, task)| FocusItem::new(i + 1, task))
        .collect();

    Ok(Json(FocusResponse {
        limit,
        active,
        tasks,
        updated_at,
    }))
}

#[derive(Debug, Serialize)]
pub struct BudgetsResponse {
    pub daily_hours: f64,
    pub capacity: CapacitySummary,
    pub domains: Vec<DomainAllocation>,
}

/// Weekly capacity vs. domain budgets, and budgets vs. allocated task hours.
pub async fn budgets(State(state): State<Arc<AppState>>) -> Result<Json<BudgetsResponse>, ApiError> {
    let store = state.store.lock().await;
    let board = store.load().map_err(internal)?;

    let daily_hours = board
        .daily_hours()
        .unwrap_or(state.config.board.daily_hours);
    Ok(Json(BudgetsResponse {
        daily_hours,
        capacity: capacity_summary(daily_hours, &board.budgets),
        domains: domain_allocation(&board.tasks, &board.budgets),
    }))
}
