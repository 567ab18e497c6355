// src/data/request.rs

//! Request tokens, e.g. `P9001A1`, embedded in each log line, and the
//! [`RequestIdSet`] of tokens selected by the discovery pass.
//!
//! A request token follows the datetime stamp:
//!
//! ```text
//! [2020-01-01 00:00:01 UTC] P9001A1 INFO Started GET "/user-login?..."
//! ```
//!
//! Tokens like `P1234DJ5` (deferred job) or `P77PW2` (periodic worker) are
//! background jobs. All other tokens are foreground requests.

use std::collections::HashSet;

use ::lazy_static::lazy_static;
use ::regex::Regex;

/// A request token, e.g. `P9001A1`.
pub type RequestToken = String;

/// Unique set of [`RequestToken`]s.
pub type RequestIdSet = HashSet<RequestToken>;

lazy_static! {
    /// A request token immediately after the closing bracket of the datetime
    /// stamp and whitespace.
    static ref REQUEST_REGEX: Regex = Regex::new(
        r"\][[:space:]]+(P[0-9]+[A-Za-z]+[0-9]*) "
    ).unwrap();

    /// A reconfigure sub-request token, e.g. `P9001A1RA` for asynchronous or
    /// `P9001A1RS` for synchronous. Capture group 1 is the parent token.
    static ref REQUEST_RECONFIG_REGEX: Regex = Regex::new(
        r"\][[:space:]]+(P[0-9]+[A-Za-z]+[0-9]*)(?:RA|RS) "
    ).unwrap();

    /// Background job token sub-pattern.
    static ref JOB_REGEX: Regex = Regex::new(r"^P[0-9]+(DJ|PW)[0-9]*").unwrap();
}

/// Return the request token of the `line`, if any.
pub fn extract_request_id(line: &str) -> Option<&str> {
    REQUEST_REGEX
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|match_| match_.as_str())
}

/// Return the parent request token of a reconfigure sub-request token, if
/// any. e.g. `P9001A1` for a line with token `P9001A1RA`.
pub fn extract_request_id_reconfig(line: &str) -> Option<&str> {
    REQUEST_RECONFIG_REGEX
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|match_| match_.as_str())
}

/// Is the `request_id` a background job?
pub fn is_job(request_id: &str) -> bool {
    JOB_REGEX.is_match(request_id)
}
