use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::format::format_hours;
use crate::parse::{self, lenient};

/// Column headers of the tabular task sheet.
pub mod columns {
    pub const ID: &str = "Task ID";
    pub const TITLE: &str = "Title";
    pub const DOMAIN: &str = "Domain";
    pub const STATUS: &str = "Status";
    pub const IMPACT: &str = "Impact";
    pub const URGENCY: &str = "Urgency";
    pub const EFFORT: &str = "Effort";
    pub const RISK: &str = "Risk";
    pub const PAUSED: &str = "Paused";
    pub const FREEZE_DATE: &str = "Freeze Date";
    pub const PROGRESS: &str = "Progress %";
    pub const NEXT_STEP: &str = "Next Step";
    pub const DRIFT_RATE: &str = "Drift Rate (hrs/week)";
    pub const RESTART_OVERHEAD: &str = "Restart Overhead (hrs)";
    pub const REMAINING_BASE_WORK: &str = "Remaining Base Work (hrs)";
    pub const ALLOCATED_HOURS: &str = "Allocated Hours/Week";
    pub const DEADLINE: &str = "Deadline";
    pub const DEFERRAL_NOTE: &str = "Deferral Risk Note";
    pub const OWNER: &str = "Owner";

    pub const BURNER_SCORE: &str = "Burner Score";
    pub const PAUSED_WEEKS: &str = "Paused Weeks";
    pub const CATCH_UP_HOURS: &str = "Catch-up Hours";
    pub const REQUIRED_HOURS: &str = "Required Hours/Week";
    pub const ALLOCATION_GAP: &str = "Allocation Gap (hrs/week)";
    pub const UPDATED_AT: &str = "Updated At";

    /// Every column the task record understands, in sheet order.
    pub const KNOWN: &[&str] = &[
        ID,
        TITLE,
        DOMAIN,
        STATUS,
        IMPACT,
        URGENCY,
        EFFORT,
        RISK,
        PAUSED,
        FREEZE_DATE,
        PROGRESS,
        NEXT_STEP,
        DRIFT_RATE,
        RESTART_OVERHEAD,
        REMAINING_BASE_WORK,
        ALLOCATED_HOURS,
        DEADLINE,
        DEFERRAL_NOTE,
        OWNER,
        BURNER_SCORE,
        PAUSED_WEEKS,
        CATCH_UP_HOURS,
        REQUIRED_HOURS,
        ALLOCATION_GAP,
        UPDATED_AT,
    ];

    /// Keys the record serializes under; a sheet column spelled like one of
    /// these must not land in `extra` verbatim.
    pub const JSON_FIELDS: &[&str] = &[
        "id",
        "title",
        "domain",
        "status",
        "impact",
        "urgency",
        "effort",
        "risk",
        "paused",
        "freeze_date",
        "progress_percent",
        "next_step",
        "drift_rate",
        "restart_overhead",
        "remaining_base_work",
        "allocated_hours",
        "deadline",
        "deferral_note",
        "owner",
        "burner_score",
        "paused_weeks",
        "catch_up_hours",
        "required_hours_per_week",
        "allocation_gap",
        "updated_at",
    ];

    /// Suffix given to unknown sheet columns that clash with [`JSON_FIELDS`].
    pub const CLASH_SUFFIX: &str = " (sheet)";

    /// Columns owned by the metric engine.
    pub const DERIVED: &[&str] = &[
        BURNER_SCORE,
        PAUSED_WEEKS,
        CATCH_UP_HOURS,
        REQUIRED_HOURS,
        ALLOCATION_GAP,
        UPDATED_AT,
    ];
}

// ── Status ────────────────────────────────────────────────────

/// Kanban column of a task. Unrecognized text is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Backlog,
    Ready,
    Doing,
    Done,
    Other(String),
}

impl Status {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Backlog" => Status::Backlog,
            "Ready" => Status::Ready,
            "Doing" => Status::Doing,
            "Done" => Status::Done,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Backlog => "Backlog",
            Status::Ready => "Ready",
            Status::Doing => "Doing",
            Status::Done => "Done",
            Status::Other(s) => s,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Status::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::text(deserializer)?;
        Ok(Status::parse(&raw))
    }
}

// ── Task record ───────────────────────────────────────────────

/// One unit of trackable work.
///
/// Known fields are typed; anything else the source carried lives in `extra`
/// and is written back untouched. The fields after `owner` are derived and
/// only ever written by [`crate::metrics::recalculate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub domain: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub impact: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub urgency: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub effort: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub risk: i64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub paused: bool,
    #[serde(
        default,
        deserialize_with = "lenient::date",
        serialize_with = "lenient::serialize_date"
    )]
    pub freeze_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub progress_percent: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub next_step: String,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub drift_rate: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub restart_overhead: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub remaining_base_work: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub allocated_hours: f64,
    #[serde(
        default,
        deserialize_with = "lenient::date",
        serialize_with = "lenient::serialize_date"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deferral_note: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub owner: String,

    #[serde(default, deserialize_with = "lenient::i64")]
    pub burner_score: i64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub paused_weeks: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub catch_up_hours: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub required_hours_per_week: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub allocation_gap: f64,
    #[serde(
        default,
        deserialize_with = "lenient::date",
        serialize_with = "lenient::serialize_date"
    )]
    pub updated_at: Option<NaiveDate>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl TaskRecord {
    /// Build a record from one sheet row keyed by column header.
    ///
    /// Missing or malformed cells fall back to their type default; columns
    /// that are not part of the record land in `extra` as strings. An unknown
    /// column named like a record field (`owner`, `status`) is stored under
    /// `"{name} (sheet)"` so the JSON form never repeats a key.
    pub fn from_row(row: &IndexMap<String, String>) -> Self {
        let cell = |key: &str| row.get(key).map(String::as_str).unwrap_or("");
        let text = |key: &str| cell(key).to_string();

        let extra = row
            .iter()
            .filter(|(k, _)| !columns::KNOWN.contains(&k.as_str()))
            .map(|(k, v)| (extra_key(k), serde_json::Value::String(v.clone())))
            .collect();

        Self {
            id: text(columns::ID),
            title: text(columns::TITLE),
            domain: text(columns::DOMAIN),
            status: Status::parse(cell(columns::STATUS)),
            impact: parse::int_or(cell(columns::IMPACT), 0),
            urgency: parse::int_or(cell(columns::URGENCY), 0),
            effort: parse::int_or(cell(columns::EFFORT), 0),
            risk: parse::int_or(cell(columns::RISK), 0),
            paused: parse::parse_flag(cell(columns::PAUSED)),
            freeze_date: parse::parse_date(cell(columns::FREEZE_DATE)).ok(),
            progress_percent: parse::float_or(cell(columns::PROGRESS), 0.0),
            next_step: text(columns::NEXT_STEP),
            drift_rate: parse::float_or(cell(columns::DRIFT_RATE), 0.0),
            restart_overhead: parse::float_or(cell(columns::RESTART_OVERHEAD), 0.0),
            remaining_base_work: parse::float_or(cell(columns::REMAINING_BASE_WORK), 0.0),
            allocated_hours: parse::float_or(cell(columns::ALLOCATED_HOURS), 0.0),
            deadline: parse::parse_date(cell(columns::DEADLINE)).ok(),
            deferral_note: text(columns::DEFERRAL_NOTE),
            owner: text(columns::OWNER),
            burner_score: parse::int_or(cell(columns::BURNER_SCORE), 0),
            paused_weeks: parse::float_or(cell(columns::PAUSED_WEEKS), 0.0),
            catch_up_hours: parse::float_or(cell(columns::CATCH_UP_HOURS), 0.0),
            required_hours_per_week: parse::float_or(cell(columns::REQUIRED_HOURS), 0.0),
            allocation_gap: parse::float_or(cell(columns::ALLOCATION_GAP), 0.0),
            updated_at: parse::parse_date(cell(columns::UPDATED_AT)).ok(),
            extra,
        }
    }

    /// Derived columns rendered for the sheet. Hours use display formatting.
    pub fn derived_cells(&self) -> [(&'static str, String); 6] {
        [
            (columns::BURNER_SCORE, self.burner_score.to_string()),
            (columns::PAUSED_WEEKS, format_hours(self.paused_weeks)),
            (columns::CATCH_UP_HOURS, format_hours(self.catch_up_hours)),
            (columns::REQUIRED_HOURS, format_hours(self.required_hours_per_week)),
            (columns::ALLOCATION_GAP, format_hours(self.allocation_gap)),
            (
                columns::UPDATED_AT,
                self.updated_at.as_ref().map(parse::format_date).unwrap_or_default(),
            ),
        ]
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

fn extra_key(column: &str) -> String {
    if columns::JSON_FIELDS.contains(&column) {
        format!("{}{}", column, columns::CLASH_SUFFIX)
    } else {
        column.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn status_parse_and_display() {
        assert_eq!(Status::parse(" Doing "), Status::Doing);
        assert_eq!(Status::parse("done"), Status::Other("done".into()));
        assert_eq!(Status::parse("Blocked").to_string(), "Blocked");
        assert!(Status::Done.is_done());
    }

    #[test]
    fn from_row_typed_fields() {
        let r = row(&[
            (columns::ID, "KB-1"),
            (columns::TITLE, "Write paper"),
            (columns::STATUS, "Doing"),
            (columns::IMPACT, "5"),
            (columns::URGENCY, "4.8"),
            (columns::EFFORT, "oops"),
            (columns::PAUSED, "Yes"),
            (columns::FREEZE_DATE, "2024-01-01"),
            (columns::DEADLINE, "not a date"),
            (columns::ALLOCATED_HOURS, "6.5"),
            ("Sprint", "S3"),
        ]);
        let task = TaskRecord::from_row(&r);

        assert_eq!(task.id, "KB-1");
        assert_eq!(task.status, Status::Doing);
        assert_eq!(task.impact, 5);
        assert_eq!(task.urgency, 4);
        assert_eq!(task.effort, 0);
        assert!(task.paused);
        assert_eq!(task.freeze_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(task.deadline, None);
        assert_eq!(task.allocated_hours, 6.5);
        assert_eq!(task.extra.get("Sprint"), Some(&serde_json::json!("S3")));
        assert_eq!(task.extra.len(), 1);
    }

    #[test]
    fn from_row_renames_columns_named_like_fields() {
        let r = row(&[
            (columns::ID, "KB-1"),
            (columns::OWNER, "Ada"),
            ("owner", "Grace"),
            ("status", "blocked"),
        ]);
        let task = TaskRecord::from_row(&r);
        assert_eq!(task.owner, "Ada");
        assert_eq!(task.extra.get("owner (sheet)"), Some(&serde_json::json!("Grace")));
        assert_eq!(task.extra.get("status (sheet)"), Some(&serde_json::json!("blocked")));
        assert!(!task.extra.contains_key("owner"));

        let json = serde_json::to_string(&task).unwrap();
        let back: TaskRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn json_fields_match_serialized_keys() {
        let value = serde_json::to_value(TaskRecord::default()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut fields = columns::JSON_FIELDS.to_vec();
        keys.sort_unstable();
        fields.sort_unstable();
        assert_eq!(keys, fields);
    }

    #[test]
    fn json_keeps_unknown_keys() {
        let json = r#"{
            "id": "KB-2",
            "title": "Grade exams",
            "status": "Review",
            "impact": "3",
            "freeze_date": "",
            "daily_plan": [1, 2, 0, 0, 0]
        }"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, Status::Other("Review".into()));
        assert_eq!(task.impact, 3);
        assert_eq!(task.freeze_date, None);
        assert_eq!(task.extra.get("daily_plan"), Some(&serde_json::json!([1, 2, 0, 0, 0])));

        let out = serde_json::to_value(&task).unwrap();
        assert_eq!(out["status"], "Review");
        assert_eq!(out["freeze_date"], "");
        assert_eq!(out["daily_plan"], serde_json::json!([1, 2, 0, 0, 0]));
    }

    #[test]
    fn derived_cells_are_display_formatted() {
        let task = TaskRecord {
            burner_score: -2,
            paused_weeks: 0.0,
            catch_up_hours: 12.5,
            required_hours_per_week: 10.0 / 3.0,
            allocation_gap: -1.0,
            updated_at: NaiveDate::from_ymd_opt(2024, 5, 6),
            ..Default::default()
        };
        let cells = task.derived_cells();
        assert_eq!(cells[0], (columns::BURNER_SCORE, "-2".to_string()));
        assert_eq!(cells[1].1, "0");
        assert_eq!(cells[2].1, "12.5");
        assert_eq!(cells[3].1, "3.33");
        assert_eq!(cells[4].1, "-1");
        assert_eq!(cells[5].1, "2024-05-06");
    }
}
