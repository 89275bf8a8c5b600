//! Field coercion helpers used when re-rendering stored answers
//!
//! Both helpers are total: a stored value that cannot be matched or parsed
//! degrades to a default so a malformed record never blocks the form.

use crate::value::{FieldValue, TIME_FORMAT};
use chrono::{Local, NaiveTime, Timelike};
use std::fmt::Display;

/// Position of `stored` within `options`, or `default`
///
/// Comparison is on the string form of both sides, so a stored date or
/// integer matches an option label that prints the same way.
pub fn resolve_default_index<T: Display>(
    options: &[T],
    stored: Option<&FieldValue>,
    default: usize,
) -> usize {
    let Some(stored) = stored else {
        return default;
    };
    let needle = stored.to_string();
    options
        .iter()
        .position(|o| o.to_string() == needle)
        .unwrap_or(default)
}

/// Time of day held by `stored`, or the current wall-clock minute
pub fn resolve_time_value(stored: Option<&FieldValue>) -> NaiveTime {
    resolve_time_value_or(stored, current_minute())
}

/// Time of day held by `stored`, or `fallback`
///
/// Accepts a native time value or a string in `HH:MM:SS` form.
pub fn resolve_time_value_or(stored: Option<&FieldValue>, fallback: NaiveTime) -> NaiveTime {
    match stored {
        Some(FieldValue::Time(t)) => *t,
        Some(FieldValue::Text(s) | FieldValue::Choice(s)) => {
            NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).unwrap_or(fallback)
        }
        _ => fallback,
    }
}

/// Local wall-clock time truncated to the minute
#[must_use]
pub fn current_minute() -> NaiveTime {
    let now = Local::now().time();
    NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now)
}
