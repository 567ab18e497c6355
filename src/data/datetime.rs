// src/data/datetime.rs

//! Functions to find the datetime stamp that begins a log line,
//! e.g. `[2020-01-01 00:00:01 UTC]`, parse it, and compare it to the
//! user-passed datetime filter.
//!
//! Log lines without a leading datetime stamp are continuation lines of the
//! prior log message.

use crate::e_wrn;

#[doc(hidden)]
pub use ::chrono::{DateTime, NaiveDateTime, Utc};
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime typing and patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A _strftime_ format string, passed to [`NaiveDateTime::parse_from_str`].
///
/// [`NaiveDateTime::parse_from_str`]: https://docs.rs/chrono/0.4.40/chrono/naive/struct.NaiveDateTime.html#method.parse_from_str
#[allow(non_camel_case_types)]
pub type DateTimePattern_str = str;

/// All log datetimes are UTC.
pub type DateTimeL = DateTime<Utc>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// The _strftime_ pattern of a log line datetime stamp, including the
/// enclosing brackets.
pub const TIMESTAMP_PATTERN: &DateTimePattern_str = "[%Y-%m-%d %H:%M:%S UTC]";

/// The _strftime_ pattern of the user-passed `--after` value. The value is
/// presumed UTC.
pub const CLI_AFTER_PATTERN: &DateTimePattern_str = "%Y-%m-%d %H:%M:%S";

lazy_static! {
    /// Matches a bracketed datetime stamp anchored at the line beginning.
    static ref TIMESTAMP_REGEX: Regex = Regex::new(
        r"^(\[[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2} UTC\])"
    ).unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Return the bracketed datetime stamp that begins `line`, brackets included.
/// Return `None` if `line` does not begin with a datetime stamp.
pub fn extract_timestamp(line: &str) -> Option<&str> {
    TIMESTAMP_REGEX
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|match_| match_.as_str())
}

/// Parse a bracketed datetime stamp, e.g. `[2020-01-01 00:00:01 UTC]`.
pub fn datetime_parse_timestamp(timestamp: &str) -> DateTimeLOpt {
    match NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_PATTERN) {
        Ok(val) => Some(val.and_utc()),
        Err(_err) => {
            defñ!("parse_from_str({:?}) failed {}", timestamp, _err);

            None
        }
    }
}

/// Is the datetime of `timestamp` at or after `after`?
///
/// A `timestamp` that fails to parse is not after; a warning is printed.
pub fn is_after_time(timestamp: &str, after: &DateTimeL) -> bool {
    match datetime_parse_timestamp(timestamp) {
        Some(dt) => dt >= *after,
        None => {
            e_wrn!("unable to parse datetime {:?}", timestamp);

            false
        }
    }
}

/// Parse the user-passed `--after` string, e.g. `"2020-01-02 12:00:00"`.
pub fn datetime_parse_after(data: &str) -> Result<DateTimeL, String> {
    match NaiveDateTime::parse_from_str(data.trim(), CLI_AFTER_PATTERN) {
        Ok(val) => Ok(val.and_utc()),
        Err(_err) => Err(
            format!("Invalid time format {:?} - Must be YYYY-MM-DD HH:MM:SS", data)
        ),
    }
}

/// Seconds elapsed from datetime stamp `beg` to datetime stamp `end`.
///
/// Returns `0.0` if either is empty or fails to parse.
pub fn timestamp_diff_secs(beg: &str, end: &str) -> f64 {
    if beg.is_empty() || end.is_empty() {
        return 0.0;
    }
    match (datetime_parse_timestamp(beg), datetime_parse_timestamp(end)) {
        (Some(dt_beg), Some(dt_end)) => {
            (dt_end - dt_beg).num_milliseconds() as f64 / 1000.0
        }
        _ => 0.0,
    }
}
