//! Scalar coercion: strings, numbers, flags, and upstream sentinels.
//!
//! Upstream sends numbers as strings about as often as not, and marks an
//! unknown coordinate with `-1.0` instead of `null`. All of that is folded
//! into `Option` here.

use chrono::NaiveDateTime;
use serde_json::Value;

use super::ragged::Record;

/// Upstream's "no coordinate" marker.
pub(crate) const COORDINATE_SENTINEL: f64 = -1.0;

/// Largest magnitude an `f64` holds without losing integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

const UPSTREAM_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Renders a scalar as text. Blank strings, `null`, arrays and objects give `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub(crate) fn text(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(scalar_text)
}

/// The first of `keys` that holds text.
pub(crate) fn first_text(record: &Record, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(record, key))
}

/// Required label fields: absent becomes the empty string.
pub(crate) fn text_or_empty(record: &Record, key: &str) -> String {
    text(record, key).unwrap_or_default()
}

/// Parses a finite number from a JSON number or numeric string.
#[must_use]
pub(crate) fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Parses a latitude or longitude.
///
/// The `-1.0` sentinel and zero both mean "unknown"; a literal 0,0
/// coordinate is never reported.
#[must_use]
pub(crate) fn coordinate(value: Option<&Value>) -> Option<f64> {
    number(value).filter(|v| {
        (v - COORDINATE_SENTINEL).abs() > f64::EPSILON && v.abs() > f64::EPSILON
    })
}

/// Whole-number ordinals. Upstream sends `2`, `2.0`, `"2"` and `"2.0"`
/// interchangeably; a fractional value is not an ordinal.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn integer(value: Option<&Value>) -> Option<i64> {
    let exact = match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    exact.or_else(|| {
        number(value)
            .filter(|v| v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER)
            .map(|v| v as i64)
    })
}

/// Boolean-ish upstream flags. Anything unrecognized is `false`.
pub(crate) fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        ),
        _ => false,
    }
}

/// Parses the `YYYY-MM-DD HH:MM[:SS]` timestamps upstream uses.
#[must_use]
pub(crate) fn parse_upstream_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    UPSTREAM_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
