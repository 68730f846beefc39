//! Caller-supplied parameter normalization.
//!
//! Runs before any upstream call so malformed input is rejected without
//! spending a network round trip. Dates go upstream as `YYYYMMDD`, times as
//! `HHMM`.

use chrono::NaiveDateTime;
use thiserror::Error;

pub const DEFAULT_MAX_JOURNEYS: u32 = 5;
pub const MAX_JOURNEYS_LIMIT: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("malformed date \"{0}\": expected YYYY-MM-DD or YYYYMMDD")]
    MalformedDate(String),

    #[error("malformed time \"{0}\": expected HH:MM or HHMM")]
    MalformedTime(String),

    #[error("missing required parameter: {0}")]
    Missing(&'static str),
}

/// Normalizes `YYYY-MM-DD` or `YYYYMMDD` to `YYYYMMDD`.
///
/// # Errors
///
/// Returns [`ParamError::MalformedDate`] unless exactly eight digits remain
/// once dashes are removed.
pub fn normalize_date(raw: &str) -> Result<String, ParamError> {
    digits_only(raw, '-', 8).ok_or_else(|| ParamError::MalformedDate(raw.to_string()))
}

/// Normalizes `HH:MM` or `HHMM` to `HHMM`.
///
/// # Errors
///
/// Returns [`ParamError::MalformedTime`] unless exactly four digits remain
/// once colons are removed.
pub fn normalize_time(raw: &str) -> Result<String, ParamError> {
    digits_only(raw, ':', 4).ok_or_else(|| ParamError::MalformedTime(raw.to_string()))
}

/// Normalizes `raw` when present, otherwise formats the date part of `now`.
///
/// # Errors
///
/// Returns [`ParamError::MalformedDate`] for a present but malformed value.
pub fn date_or_default(raw: Option<&str>, now: NaiveDateTime) -> Result<String, ParamError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => normalize_date(value),
        None => Ok(now.format("%Y%m%d").to_string()),
    }
}

/// Normalizes `raw` when present, otherwise formats the time part of `now`.
///
/// # Errors
///
/// Returns [`ParamError::MalformedTime`] for a present but malformed value.
pub fn time_or_default(raw: Option<&str>, now: NaiveDateTime) -> Result<String, ParamError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => normalize_time(value),
        None => Ok(now.format("%H%M").to_string()),
    }
}

/// Like [`date_or_default`] but leaves an omitted date omitted.
///
/// # Errors
///
/// Returns [`ParamError::MalformedDate`] for a present but malformed value.
pub fn optional_date(raw: Option<&str>) -> Result<Option<String>, ParamError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize_date)
        .transpose()
}

/// Trims an opaque stop, line, or trip code and rejects it when empty.
///
/// # Errors
///
/// Returns [`ParamError::Missing`] naming `param` when the code is absent or blank.
pub fn require_code(raw: Option<&str>, param: &'static str) -> Result<String, ParamError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or(ParamError::Missing(param))
}

/// Applies the default and bounds for the journey option count.
#[must_use]
pub fn clamp_max_journeys(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_MAX_JOURNEYS)
        .clamp(1, MAX_JOURNEYS_LIMIT)
}

fn digits_only(raw: &str, separator: char, len: usize) -> Option<String> {
    let digits: String = raw.trim().chars().filter(|c| *c != separator).collect();
    (digits.len() == len && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap()
    }

    #[test]
    fn normalize_date_accepts_both_forms() {
        assert_eq!(normalize_date("2024-03-15").unwrap(), "20240315");
        assert_eq!(normalize_date("20240315").unwrap(), "20240315");
        assert_eq!(normalize_date(" 2024-03-15 ").unwrap(), "20240315");
    }

    #[test]
    fn normalize_date_rejects_wrong_digit_counts() {
        assert_eq!(
            normalize_date("2024031"),
            Err(ParamError::MalformedDate("2024031".to_string()))
        );
        assert!(normalize_date("202403150").is_err());
        assert!(normalize_date("2024-03-1").is_err());
    }

    #[test]
    fn normalize_date_rejects_non_digits() {
        assert!(normalize_date("2024/03/15").is_err());
        assert!(normalize_date("tomorrow").is_err());
        assert!(normalize_date("").is_err());
    }

    #[test]
    fn normalize_time_accepts_both_forms() {
        assert_eq!(normalize_time("08:00").unwrap(), "0800");
        assert_eq!(normalize_time("0800").unwrap(), "0800");
    }

    #[test]
    fn normalize_time_rejects_wrong_digit_counts() {
        assert!(normalize_time("8:00").is_err());
        assert!(normalize_time("08:000").is_err());
        assert!(normalize_time("ab:cd").is_err());
    }

    #[test]
    fn defaults_come_from_supplied_clock() {
        assert_eq!(date_or_default(None, morning()).unwrap(), "20240315");
        assert_eq!(time_or_default(None, morning()).unwrap(), "0805");
        assert_eq!(date_or_default(Some(""), morning()).unwrap(), "20240315");
    }

    #[test]
    fn present_values_override_defaults() {
        assert_eq!(
            date_or_default(Some("2024-12-24"), morning()).unwrap(),
            "20241224"
        );
        assert_eq!(time_or_default(Some("17:45"), morning()).unwrap(), "1745");
        assert!(time_or_default(Some("7:45"), morning()).is_err());
    }

    #[test]
    fn optional_date_stays_absent() {
        assert_eq!(optional_date(None).unwrap(), None);
        assert_eq!(
            optional_date(Some("2024-03-15")).unwrap().as_deref(),
            Some("20240315")
        );
        assert!(optional_date(Some("15-03-24")).is_err());
    }

    #[test]
    fn require_code_trims_and_rejects_blank() {
        assert_eq!(require_code(Some(" UN "), "from_stop").unwrap(), "UN");
        assert_eq!(
            require_code(Some("  "), "from_stop"),
            Err(ParamError::Missing("from_stop"))
        );
        assert_eq!(
            require_code(None, "to_stop"),
            Err(ParamError::Missing("to_stop"))
        );
    }

    #[test]
    fn clamp_max_journeys_applies_default_and_bounds() {
        assert_eq!(clamp_max_journeys(None), 5);
        assert_eq!(clamp_max_journeys(Some(0)), 1);
        assert_eq!(clamp_max_journeys(Some(3)), 3);
        assert_eq!(clamp_max_journeys(Some(50)), 10);
    }
}
