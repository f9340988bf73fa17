//! Metric engine: derived scheduling fields from raw task attributes.
//!
//! Every function here is pure and total. Values keep full precision; only
//! [`crate::format`] rounds for display.

use chrono::NaiveDate;
use tracing::debug;

use crate::task::TaskRecord;

/// `impact + urgency - effort`, saturating at the `i64` bounds.
pub fn burner_score(impact: i64, urgency: i64, effort: i64) -> i64 {
    impact.saturating_add(urgency).saturating_sub(effort)
}

/// Whole weeks (to 2 decimals) since the task was frozen.
///
/// Zero when the task is not paused or has no freeze date. A freeze date in
/// the future clamps to zero.
pub fn paused_weeks(paused: bool, freeze_date: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(freeze) = freeze_date.filter(|_| paused) else {
        return 0.0;
    };
    let days = (today - freeze).num_days().max(0);
    round2(days as f64 / 7.0)
}

/// Remaining work plus drift accrued while paused plus the cost to restart.
pub fn catch_up_hours(
    remaining_base_work: f64,
    paused_weeks: f64,
    drift_rate: f64,
    restart_overhead: f64,
) -> f64 {
    remaining_base_work + paused_weeks * drift_rate + restart_overhead
}

/// Weekly pace needed to clear `catch_up_hours` by the deadline.
///
/// Without a deadline there is no pacing pressure (0). When the deadline is
/// today or already past, the whole catch-up amount is returned unscaled.
pub fn required_hours_per_week(
    catch_up_hours: f64,
    deadline: Option<NaiveDate>,
    today: NaiveDate,
) -> f64 {
    let Some(deadline) = deadline else {
        return 0.0;
    };
    let days_left = (deadline - today).num_days();
    if days_left <= 0 {
        catch_up_hours
    } else {
        catch_up_hours / (days_left as f64 / 7.0)
    }
}

/// Budgeted minus required hours/week. Negative means under-resourced.
pub fn allocation_gap(allocated_hours_per_week: f64, required_hours_per_week: f64) -> f64 {
    allocated_hours_per_week - required_hours_per_week
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Overwrite every derived field of `task` as of `today`.
pub fn recalculate(task: &mut TaskRecord, today: NaiveDate) {
    task.burner_score = burner_score(task.impact, task.urgency, task.effort);
    task.paused_weeks = paused_weeks(task.paused, task.freeze_date, today);
    task.catch_up_hours = catch_up_hours(
        task.remaining_base_work,
        task.paused_weeks,
        task.drift_rate,
        task.restart_overhead,
    );
    task.required_hours_per_week =
        required_hours_per_week(task.catch_up_hours, task.deadline, today);
    task.allocation_gap = allocation_gap(task.allocated_hours, task.required_hours_per_week);
    task.updated_at = Some(today);

    debug!(
        task = %task.id,
        score = task.burner_score,
        catch_up = task.catch_up_hours,
        gap = task.allocation_gap,
        "recalculated"
    );
}

/// Recalculate a whole record set. Returns the number of records touched.
pub fn recalculate_all(tasks: &mut [TaskRecord], today: NaiveDate) -> usize {
    for task in tasks.iter_mut() {
        recalculate(task, today);
    }
    tasks.len()
}
