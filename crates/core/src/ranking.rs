//! Focus ranking: which active tasks need attention first.

use std::cmp::Ordering;

use crate::task::{Status, TaskRecord};

/// Default number of focus tasks shown.
pub const DEFAULT_FOCUS_LIMIT: usize = 3;

/// Rank given to statuses outside the known workflow.
pub const UNKNOWN_STATUS_RANK: u8 = 99;

/// Lower rank means more urgent.
pub fn status_rank(status: &Status) -> u8 {
    match status {
        Status::Doing => 0,
        Status::Ready => 1,
        Status::Backlog => 2,
        Status::Done => 3,
        Status::Other(_) => UNKNOWN_STATUS_RANK,
    }
}

/// Lexicographic focus key; compare ascending, smaller sorts first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusKey {
    pub status_rank: u8,
    pub allocation_gap: f64,
    pub burner_score: i64,
    pub urgency: i64,
    pub effort: i64,
}

impl FocusKey {
    pub fn of(task: &TaskRecord) -> Self {
        Self {
            status_rank: status_rank(&task.status),
            allocation_gap: task.allocation_gap,
            burner_score: task.burner_score,
            urgency: task.urgency,
            effort: task.effort,
        }
    }

    /// Status tier, then most negative gap, then higher score, then higher
    /// urgency, then lower effort.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.status_rank
            .cmp(&other.status_rank)
            .then_with(|| cmp_f64(self.allocation_gap, other.allocation_gap))
            .then_with(|| other.burner_score.cmp(&self.burner_score))
            .then_with(|| other.urgency.cmp(&self.urgency))
            .then_with(|| self.effort.cmp(&other.effort))
    }
}

/// Numeric order that treats `-0.0 == 0.0` and stays total if a NaN slips in.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Top `limit` non-Done tasks in focus order.
///
/// The sort is stable, so tasks with identical keys keep their input order.
pub fn rank_focus(tasks: &[TaskRecord], limit: usize) -> Vec<&TaskRecord> {
    let mut candidates: Vec<(FocusKey, &TaskRecord)> = tasks
        .iter()
        .filter(|t| !t.is_done())
        .map(|t| (FocusKey::of(t), t))
        .collect();

    candidates.sort_by(|a, b| a.0.compare(&b.0));
    candidates.truncate(limit);
    candidates.into_iter().map(|(_, t)| t).collect()
}
