//! Parse-with-default coercion for hand-edited task fields.
//!
//! Task sheets are partially filled by hand, so a malformed cell never fails
//! the record: it degrades to its type default. Every parser reports *why* it
//! fell back through [`Parsed`], which keeps the fallback branch visible.

use chrono::NaiveDate;

/// ISO calendar date format used by every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Truthy spellings accepted for boolean columns (compared case-insensitively).
const TRUTHY: &[&str] = &["yes", "y", "true", "1"];

/// Outcome of coercing one raw text value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed<T> {
    /// The text parsed cleanly.
    Value(T),
    /// The text was empty or whitespace only.
    Empty,
    /// The text was present but could not be parsed.
    Invalid,
}

impl<T> Parsed<T> {
    /// Take the parsed value, or `default` for both fallback branches.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Parsed::Value(v) => v,
            Parsed::Empty | Parsed::Invalid => default,
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Parsed::Value(v) => Some(v),
            Parsed::Empty | Parsed::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Parsed::Invalid)
    }
}

/// Parse a float. Non-finite results (`inf`, `NaN`) count as invalid.
pub fn parse_f64(raw: &str) -> Parsed<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Parsed::Empty;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Parsed::Value(v),
        _ => Parsed::Invalid,
    }
}

/// Parse an integer. The text is read as a float and truncated toward zero,
/// so `"3.9"` is 3 and `"-2.5"` is -2.
pub fn parse_i64(raw: &str) -> Parsed<i64> {
    match parse_f64(raw) {
        Parsed::Value(v) => truncate_to_i64(v),
        Parsed::Empty => Parsed::Empty,
        Parsed::Invalid => Parsed::Invalid,
    }
}

pub(crate) fn truncate_to_i64(v: f64) -> Parsed<i64> {
    let t = v.trunc();
    if t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Parsed::Value(t as i64)
    } else {
        Parsed::Invalid
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Parsed<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Parsed::Empty;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(d) => Parsed::Value(d),
        Err(_) => Parsed::Invalid,
    }
}

/// Boolean flag: only the truthy spellings are true, everything else is false.
pub fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();
    TRUTHY.iter().any(|t| raw.eq_ignore_ascii_case(t))
}

pub fn float_or(raw: &str, default: f64) -> f64 {
    parse_f64(raw).unwrap_or(default)
}

pub fn int_or(raw: &str, default: i64) -> i64 {
    parse_i64(raw).unwrap_or(default)
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapters that apply the same coercions to JSON values, which may
/// arrive as numbers, strings, booleans or null depending on who wrote them.
pub mod lenient {
    use chrono::NaiveDate;
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use super::{format_date, parse_date, parse_f64, parse_flag, parse_i64, truncate_to_i64};

    pub(crate) fn value_to_f64(value: &Value) -> f64 {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
            Value::String(s) => parse_f64(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value_to_f64(&value))
    }

    pub fn i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let parsed = match &value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => return Ok(i),
                None => n.as_f64().map(truncate_to_i64),
            },
            Value::String(s) => Some(parse_i64(s)),
            _ => None,
        };
        Ok(parsed.map(|p| p.unwrap_or(0)).unwrap_or(0))
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::Bool(b) => *b,
            Value::String(s) => parse_flag(s),
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => false,
        })
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// Strings pass through; any other value reads as absent.
    pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::String(s) => parse_date(s).ok(),
            _ => None,
        })
    }

    /// Absent dates are written as `""`, matching what the web client sends.
    pub fn serialize_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&format_date(d)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn hours_map<'de, D>(deserializer: D) -> Result<IndexMap<String, f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| {
                    let hours = value_to_f64(&v);
                    (k, hours)
                })
                .collect(),
            _ => IndexMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_fallback_branches() {
        assert_eq!(parse_f64(" 2.5 "), Parsed::Value(2.5));
        assert_eq!(parse_f64(""), Parsed::Empty);
        assert_eq!(parse_f64("   "), Parsed::Empty);
        assert_eq!(parse_f64("abc"), Parsed::Invalid);
        assert_eq!(parse_f64("inf"), Parsed::Invalid);
        assert_eq!(parse_f64("NaN"), Parsed::Invalid);
        assert_eq!(float_or("n/a", 1.5), 1.5);
    }

    #[test]
    fn int_truncates_toward_zero() {
        assert_eq!(parse_i64("3.9"), Parsed::Value(3));
        assert_eq!(parse_i64("-2.5"), Parsed::Value(-2));
        assert_eq!(parse_i64("7"), Parsed::Value(7));
        assert_eq!(parse_i64("1e3"), Parsed::Value(1000));
        assert!(parse_i64("high").is_invalid());
        assert_eq!(int_or("", 4), 4);
        assert!(parse_i64("1e300").is_invalid());
    }

    #[test]
    fn flag_spellings() {
        for raw in ["yes", "Y", "TRUE", " 1 ", "y"] {
            assert!(parse_flag(raw), "{raw} should be truthy");
        }
        for raw in ["no", "", "0", "paused", "false"] {
            assert!(!parse_flag(raw), "{raw} should be falsy");
        }
    }

    #[test]
    fn dates() {
        assert_eq!(
            parse_date("2024-03-01").ok(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_date(""), Parsed::Empty);
        assert!(parse_date("2024-13-40").is_invalid());
        assert!(parse_date("03/01/2024").is_invalid());
    }

    #[test]
    fn lenient_json_values() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(deserialize_with = "lenient::f64")]
            hours: f64,
            #[serde(deserialize_with = "lenient::i64")]
            impact: i64,
            #[serde(deserialize_with = "lenient::flag")]
            paused: bool,
            #[serde(deserialize_with = "lenient::date")]
            deadline: Option<NaiveDate>,
            #[serde(deserialize_with = "lenient::text")]
            owner: String,
        }

        let row: Row = serde_json::from_str(
            r#"{"hours": "4.5", "impact": 3.7, "paused": "yes", "deadline": "bad", "owner": null}"#,
        )
        .unwrap();
        assert_eq!(row.hours, 4.5);
        assert_eq!(row.impact, 3);
        assert!(row.paused);
        assert_eq!(row.deadline, None);
        assert_eq!(row.owner, "");

        let row: Row = serde_json::from_str(
            r#"{"hours": null, "impact": "x", "paused": 1, "deadline": "2025-01-02", "owner": 7}"#,
        )
        .unwrap();
        assert_eq!(row.hours, 0.0);
        assert_eq!(row.impact, 0);
        assert!(row.paused);
        assert_eq!(row.deadline, NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(row.owner, "7");
    }
}
