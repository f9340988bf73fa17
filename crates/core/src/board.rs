//! Board state: the JSON document behind the web front-end.

use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BurnerError;
use crate::metrics;
use crate::parse::lenient;
use crate::task::TaskRecord;

/// Budget categories and their default weekly hours.
pub const DEFAULT_BUDGETS: &[(&str, f64)] = &[
    ("Research", 15.0),
    ("Teaching", 20.0),
    ("Service", 5.0),
    ("Admin", 3.0),
    ("Other", 0.0),
];

pub fn default_budgets() -> IndexMap<String, f64> {
    DEFAULT_BUDGETS
        .iter()
        .map(|(domain, hours)| (domain.to_string(), *hours))
        .collect()
}

/// Weekly budgets per domain plus the full task list.
///
/// Top-level keys other than `budgets`, `tasks` and `updated_at` belong to the
/// front-end (timers, week keys, daily hours) and are carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    #[serde(default = "default_budgets", deserialize_with = "lenient::hours_map")]
    pub budgets: IndexMap<String, f64>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            budgets: default_budgets(),
            tasks: Vec::new(),
            updated_at: None,
            extra: IndexMap::new(),
        }
    }
}

impl BoardState {
    pub fn with_tasks(tasks: Vec<TaskRecord>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    /// Validate an incoming replacement document.
    ///
    /// The payload must be a JSON object that carries both `budgets` and
    /// `tasks`; anything else is rejected before it can overwrite the board.
    pub fn from_payload(payload: Value) -> Result<Self, BurnerError> {
        let has_required = payload
            .as_object()
            .is_some_and(|obj| obj.contains_key("budgets") && obj.contains_key("tasks"));
        if !has_required {
            return Err(BurnerError::InvalidPayload(
                "payload must include budgets and tasks".into(),
            ));
        }
        serde_json::from_value(payload).map_err(|e| BurnerError::InvalidPayload(e.to_string()))
    }

    /// Recalculate every task as of `today`. Returns the number touched.
    pub fn recalculate(&mut self, today: NaiveDate) -> usize {
        metrics::recalculate_all(&mut self.tasks, today)
    }

    /// Stamp `updated_at` with the current UTC time and return it.
    pub fn touch(&mut self) -> String {
        let now = Utc::now().to_rfc3339();
        self.updated_at = Some(now.clone());
        now
    }

    /// Hours available per working day, if the front-end stored one.
    pub fn daily_hours(&self) -> Option<f64> {
        self.extra.get("daily_hours").map(lenient::value_to_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_has_budget_categories() {
        let state = BoardState::default();
        let domains: Vec<&str> = state.budgets.keys().map(String::as_str).collect();
        assert_eq!(domains, vec!["Research", "Teaching", "Service", "Admin", "Other"]);
        assert_eq!(state.budgets["Teaching"], 20.0);
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn payload_requires_budgets_and_tasks() {
        let err = BoardState::from_payload(json!({"tasks": []})).unwrap_err();
        assert!(matches!(err, BurnerError::InvalidPayload(_)));
        assert_eq!(err.to_string(), "invalid payload: payload must include budgets and tasks");

        assert!(BoardState::from_payload(json!([1, 2])).is_err());
        assert!(BoardState::from_payload(json!({"budgets": {}})).is_err());
    }

    #[test]
    fn payload_round_trips_front_end_keys() {
        let payload = json!({
            "budgets": {"Research": "12", "Teaching": 18},
            "tasks": [{"id": "KB-1", "status": "Doing", "allocated_hours": 4}],
            "daily_hours": 7.5,
            "active_timer": null,
        });
        let state = BoardState::from_payload(payload).unwrap();
        assert_eq!(state.budgets["Research"], 12.0);
        assert_eq!(state.tasks[0].allocated_hours, 4.0);
        assert_eq!(state.daily_hours(), Some(7.5));

        let out = serde_json::to_value(&state).unwrap();
        assert_eq!(out["daily_hours"], json!(7.5));
        assert!(out.as_object().unwrap().contains_key("active_timer"));
    }

    #[test]
    fn non_string_updated_at_reads_as_absent() {
        for stamp in [json!(false), json!(1718000000), json!({"at": 1})] {
            let state = BoardState::from_payload(json!({
                "budgets": {},
                "tasks": [],
                "updated_at": stamp,
            }))
            .unwrap();
            assert_eq!(state.updated_at, None);
        }

        let state: BoardState =
            serde_json::from_str(r#"{"budgets": {}, "tasks": [], "updated_at": "2024-06-15T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(state.updated_at.as_deref(), Some("2024-06-15T00:00:00Z"));
    }

    #[test]
    fn touch_sets_timestamp() {
        let mut state = BoardState::default();
        let stamp = state.touch();
        assert_eq!(state.updated_at.as_deref(), Some(stamp.as_str()));
    }
}
