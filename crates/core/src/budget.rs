//! Weekly capacity and per-domain budget rollups.

use indexmap::IndexMap;
use serde::Serialize;

use crate::task::TaskRecord;

/// Working days per week (Mon-Fri).
pub const WORK_DAYS_PER_WEEK: f64 = 5.0;

pub fn weekly_capacity(daily_hours: f64) -> f64 {
    daily_hours * WORK_DAYS_PER_WEEK
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacitySummary {
    pub capacity: f64,
    pub budgeted: f64,
    /// Capacity left after budgets; negative means over-committed.
    pub unassigned: f64,
}

pub fn capacity_summary(daily_hours: f64, budgets: &IndexMap<String, f64>) -> CapacitySummary {
    let capacity = weekly_capacity(daily_hours);
    let budgeted: f64 = budgets.values().sum();
    CapacitySummary {
        capacity,
        budgeted,
        unassigned: capacity - budgeted,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainAllocation {
    pub domain: String,
    pub budget: f64,
    pub allocated: f64,
    pub remaining: f64,
    pub active_tasks: usize,
}

/// Budget vs. hours allocated to active (non-Done) tasks, per domain.
///
/// Domains follow budget order; task domains without a budget are appended in
/// first-seen order with a zero budget.
pub fn domain_allocation(
    tasks: &[TaskRecord],
    budgets: &IndexMap<String, f64>,
) -> Vec<DomainAllocation> {
    let mut rows: IndexMap<&str, DomainAllocation> = budgets
        .iter()
        .map(|(domain, budget)| {
            (
                domain.as_str(),
                DomainAllocation {
                    domain: domain.clone(),
                    budget: *budget,
                    allocated: 0.0,
                    remaining: 0.0,
                    active_tasks: 0,
                },
            )
        })
        .collect();

    for task in tasks.iter().filter(|t| !t.is_done()) {
        let row = rows
            .entry(task.domain.as_str())
            .or_insert_with(|| DomainAllocation {
                domain: task.domain.clone(),
                budget: 0.0,
                allocated: 0.0,
                remaining: 0.0,
                active_tasks: 0,
            });
        row.allocated += task.allocated_hours;
        row.active_tasks += 1;
    }

    rows.into_values()
        .map(|mut row| {
            row.remaining = row.budget - row.allocated;
            row
        })
        .collect()
}
