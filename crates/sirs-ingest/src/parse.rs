//! Cell-level parsing for identifiers, chart times and values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse an identifier.
///
/// Accepts integer text and integral float text (`"200001.0"`), which is how
/// dataframe tools write integer columns that once held a null.
pub fn parse_identifier(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

/// Parse a chart time as UTC.
///
/// Naive timestamps are UTC wall-clock time. RFC 3339 values with an offset
/// are converted to UTC. A bare date is midnight.
pub fn parse_charttime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Outcome of parsing a value cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueCell {
    /// A finite reading.
    Present(f64),
    /// Empty or `NaN`: no reading.
    Absent,
    /// Anything else.
    Invalid,
}

pub fn parse_value(value: &str) -> ValueCell {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return ValueCell::Absent;
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => ValueCell::Present(number),
        _ => ValueCell::Invalid,
    }
}
