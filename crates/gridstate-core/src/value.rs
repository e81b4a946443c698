//! Field lookup and value coercion for row records
//!
//! Rows are arbitrary JSON records. Filters compare them after coercing both
//! sides to a common shape (lower-cased text, a float, a date key or a
//! boolean). Anything that fails to coerce becomes NaN, so ordered
//! comparisons against it are false and inequality is true.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::FilterType;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Resolve a dotted path (`address.city`, `tags.0`) inside a record.
///
/// A literal key containing dots wins over path traversal.
pub fn lookup<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(value) = row.as_object().and_then(|map| map.get(path)) {
        return Some(value);
    }

    path.split('.').try_fold(row, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// String form of a field value, `undefined` for a missing field
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => format_float(f),
            _ => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Whole floats print without a fractional part (`2.0` -> `2`)
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Lower-cased text used by text filters
pub fn text_key(value: Option<&Value>) -> String {
    stringify(value).to_lowercase()
}

/// Parse user-typed numeric input, accepting `,` as the decimal separator.
///
/// Like a lenient float parser, the longest numeric prefix is taken
/// (`"12 kg"` -> 12). Returns NaN when nothing parses.
pub fn parse_number(text: &str) -> f64 {
    let normalized = text.replace(',', ".");
    let trimmed = normalized.trim();

    if let Ok(n) = trimmed.parse::<f64>() {
        return n;
    }

    trimmed
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| {
            let prefix = &trimmed[..end];
            // Rust accepts "inf"/"nan" spellings a prefix scan should not
            if prefix.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
                return None;
            }
            prefix.parse::<f64>().ok()
        })
        .unwrap_or(f64::NAN)
}

/// Numeric form of a field value; NaN when it is not numeric
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    }
}

/// Boolean form of a field value; `None` when it is not boolean-like
pub fn to_bool(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parse a date or timestamp string. Strings without an offset are UTC.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

/// Date form of a field value: strings are parsed, numbers are epoch millis
pub fn to_datetime(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value {
        Some(Value::String(s)) => parse_datetime(s),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Ordered key for temporal comparison.
///
/// `date` compares calendar days, `date-time` compares instants in
/// milliseconds. NaN when the value is not a date.
pub fn temporal_key(datetime: Option<DateTime<Utc>>, filter_type: FilterType) -> f64 {
    match (datetime, filter_type) {
        (Some(dt), FilterType::Date) => dt.date_naive().num_days_from_ce() as f64,
        (Some(dt), _) => dt.timestamp_millis() as f64,
        (None, _) => f64::NAN,
    }
}

/// Three-way comparison on raw field values used by the sort stage.
///
/// Values of the same kind compare naturally. Different kinds are ranked
/// missing < null < bool < number < string < array < object so the order
/// stays total; arrays and objects compare equal among themselves.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}
