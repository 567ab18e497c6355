// src/data/fields.rs

//! Field extractors; fixed patterns that each find one structured value
//! within a log line, e.g. the HTTP method of a `Started` line or the
//! `ActiveRecord` duration of a `Completed` line.
//!
//! Extractors are declared in table [`FIELD_EXTRACTORS`] as
//! `{name, pattern, capture group, decoder}`. Each pattern is compiled once.
//!
//! Also the message-stripping transform used for "message only" printing.

use crate::de_wrn;

use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Regular expression pattern, passed to [`regex::Regex::new`].
///
/// [`regex::Regex::new`]: https://docs.rs/regex/1.11.1/regex/struct.Regex.html#method.new
pub type RegexPattern = str;

/// `Started GET "/user-login?...` request route start line.
/// The path may end with `?` (query string) or `"`.
pub const PATTERN_ROUTE: &RegexPattern = r#" INFO Started ([A-Z]+) "/([-a-zA-Z0-9_/]+)(\?|")"#;
pub const PATTERN_COMPUTER: &RegexPattern = r"workstation=(.*?)&";
pub const PATTERN_USER: &RegexPattern = r"username=(.*?)&";
/// `Completed 200 OK in 12.5ms (Views: 3.0ms | ActiveRecord: 2.0ms)`
pub const PATTERN_COMPLETED: &RegexPattern =
    r" Completed ([0-9]+) [A-Za-z ]+ in ([0-9.]+)ms \(Views: ([0-9.]+)ms \| ActiveRecord: ([0-9.]+)ms\)";
/// `Acquired 'vcenter' adapter 1 of 5 for 'host' in 0.25`, seconds
pub const PATTERN_ADAPTER_VCENTER: &RegexPattern =
    r"Acquired 'vcenter' adapter ([0-9]+) of ([0-9]+) for '.*?' in ([0-9.]+)";
/// `Acquired 'esx' adapter 1 of 5 for 'host' in 0.25`, seconds
pub const PATTERN_ADAPTER_ESX: &RegexPattern =
    r"Acquired 'esx' adapter ([0-9]+) of ([0-9]+) for '.*?' in ([0-9.]+)";
/// `Task total time: 2.5s (execution time 1.5s)`
pub const PATTERN_TASK: &RegexPattern = r"Task total time: ([0-9.]+)s \(execution time ([0-9.]+)s\)";
/// `NTLM authorization took: 15.2ms`
pub const PATTERN_SESSION: &RegexPattern = r" NTLM authorization took: ([0-9.]+)ms";
/// `Volumes will be mounted asynchronously`
pub const PATTERN_MOUNT_TYPE: &RegexPattern = r"Volumes will be mounted ([A-Za-z]+)";
/// legacy reconfigure task marker, `execute_task` or `process_task`
pub const PATTERN_RECONFIG_LEGACY: &RegexPattern = r" RvSphere: Waking up in ReconfigVm#([a-z_]+) ";
/// result of a legacy reconfigure task
pub const PATTERN_RECONFIG_RESULT: &RegexPattern = r#" with result "([a-z]+)""#;
/// NTLM authentication window begins
pub const PATTERN_NTLM_START: &RegexPattern = r" Authenticating URL ";
/// NTLM authentication window ends
pub const PATTERN_NTLM_END: &RegexPattern = r"NTLM authentication result:";
/// asynchronous reconfigure completed; mount seconds are at
/// [`MOUNT_ASYNC_FIELD_INDEX`]
pub const PATTERN_RECONFIG_ASYNC: &RegexPattern = r"Async completed for ([A-Z]+)";

/// Index of the whitespace-separated field holding the mount duration in
/// seconds of a [`PATTERN_RECONFIG_ASYNC`] line.
pub const MOUNT_ASYNC_FIELD_INDEX: usize = 18;

/// The free-text message after the request token and log level.
pub const PATTERN_MESSAGE: &RegexPattern = r" P[0-9]+.*?[A-Z]+ (.*)";
/// Runs of digits, and their attached identifier characters, replaced during
/// message stripping.
pub const PATTERN_STRIP: &RegexPattern = r"(_|-)?[0-9]+([_a-zA-Z0-9%!-]+)?";
/// Replacement for [`PATTERN_STRIP`] matches.
pub const STRIP_PLACEHOLDER: &str = "***";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// extractor table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Names of the structured values found by field extractors.
///
/// The discriminant is the index into [`FIELD_EXTRACTORS`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldName {
    Method = 0,
    Route,
    Computer,
    User,
    CompletedCode,
    CompletedRequestMs,
    CompletedViewMs,
    CompletedDbMs,
    AdapterVcenterNumber,
    AdapterVcenterSecs,
    AdapterEsxNumber,
    AdapterEsxSecs,
    TaskTotalSecs,
    TaskExecutionSecs,
    SessionMs,
    MountType,
    ReconfigLegacyStep,
    ReconfigLegacyResult,
}

/// How the captured text of a field is interpreted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldDecoder {
    Str,
    Float,
    Int,
}

/// A decoded field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Str(String),
    Float(f64),
    Int(i64),
}

impl FieldValue {
    /// The value as `i64`; `Float` values are truncated, `Str` values are `0`.
    pub fn as_i64(&self) -> i64 {
        match self {
            FieldValue::Int(val) => *val,
            FieldValue::Float(val) => *val as i64,
            FieldValue::Str(_) => 0,
        }
    }

    /// The value as `f64`; `Str` values are `0.0`.
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Float(val) => *val,
            FieldValue::Int(val) => *val as f64,
            FieldValue::Str(_) => 0.0,
        }
    }
}

/// One declared field extractor.
#[derive(Clone, Copy, Debug)]
pub struct FieldExtractor {
    pub name: FieldName,
    pub pattern: &'static RegexPattern,
    /// capture group index of the value
    pub group: usize,
    pub decoder: FieldDecoder,
}

pub const FIELD_EXTRACTORS_LEN: usize = 18;

/// All field extractors, ordered by [`FieldName`] discriminant.
pub const FIELD_EXTRACTORS: [FieldExtractor; FIELD_EXTRACTORS_LEN] = [
    FieldExtractor { name: FieldName::Method, pattern: PATTERN_ROUTE, group: 1, decoder: FieldDecoder::Str },
    FieldExtractor { name: FieldName::Route, pattern: PATTERN_ROUTE, group: 2, decoder: FieldDecoder::Str },
    FieldExtractor { name: FieldName::Computer, pattern: PATTERN_COMPUTER, group: 1, decoder: FieldDecoder::Str },
    FieldExtractor { name: FieldName::User, pattern: PATTERN_USER, group: 1, decoder: FieldDecoder::Str },
    FieldExtractor { name: FieldName::CompletedCode, pattern: PATTERN_COMPLETED, group: 1, decoder: FieldDecoder::Str },
    FieldExtractor { name: FieldName::CompletedRequestMs, pattern: PATTERN_COMPLETED, group: 2, decoder: FieldDecoder::Float },
    FieldExtractor { name: FieldName::CompletedViewMs, pattern: PATTERN_COMPLETED, group: 3, decoder: FieldDecoder::Float },
    FieldExtractor { name: FieldName::CompletedDbMs, pattern: PATTERN_COMPLETED, group: 4, decoder: FieldDecoder::Float },
    FieldExtractor { name: FieldName::AdapterVcenterNumber, pattern: PATTERN_ADAPTER_VCENTER, group: 1, decoder: FieldDecoder::Int },
    FieldExtractor { name: FieldName::AdapterVcenterSecs, pattern: PATTERN_ADAPTER_VCENTER, group: 3, decoder: FieldDecoder::Float },
    FieldExtractor { name: FieldName::AdapterEsxNumber, pattern: PATTERN_ADAPTER_ESX, group: 1, decoder: FieldDecoder::Int },
    FieldExtractor { name: FieldName::AdapterEsxSecs, pattern: PATTERN_ADAPTER_ESX, group: 3, decoder: FieldDecoder::Float },
    FieldExtractor { name: FieldName::TaskTotalSecs, pattern: PATTERN_TASK, group: 1, decoder: FieldDecoder::Float },
    FieldExtractor { name: FieldName::TaskExecutionSecs, pattern: PATTERN_TASK, group: 2, decoder: FieldDecoder::Float },
    FieldExtractor { name: FieldName::SessionMs, pattern: PATTERN_SESSION, group: 1, decoder: FieldDecoder::Float },
    FieldExtractor { name: FieldName::MountType, pattern: PATTERN_MOUNT_TYPE, group: 1, decoder: FieldDecoder::Str },
    FieldExtractor { name: FieldName::ReconfigLegacyStep, pattern: PATTERN_RECONFIG_LEGACY, group: 1, decoder: FieldDecoder::Str },
    FieldExtractor { name: FieldName::ReconfigLegacyResult, pattern: PATTERN_RECONFIG_RESULT, group: 1, decoder: FieldDecoder::Str },
];

lazy_static! {
    /// Compiled `FIELD_EXTRACTORS` patterns, same order.
    static ref FIELD_REGEXES: Vec<Regex> = FIELD_EXTRACTORS
        .iter()
        .map(|fe| Regex::new(fe.pattern).unwrap())
        .collect();

    static ref MESSAGE_REGEX: Regex = Regex::new(PATTERN_MESSAGE).unwrap();
    static ref STRIP_REGEX: Regex = Regex::new(PATTERN_STRIP).unwrap();
}

/// Return the [`FieldExtractor`] for `name`.
pub fn field_extractor(name: FieldName) -> &'static FieldExtractor {
    &FIELD_EXTRACTORS[name as usize]
}

/// Return the compiled pattern for `name`.
pub(crate) fn field_regex(name: FieldName) -> &'static Regex {
    &FIELD_REGEXES[name as usize]
}

/// Return the captured text of field `name` within `line`.
pub fn extract_str(name: FieldName, line: &str) -> Option<&str> {
    let fe = field_extractor(name);
    field_regex(name)
        .captures(line)
        .and_then(|captures| captures.get(fe.group))
        .map(|match_| match_.as_str())
}

/// Parse a captured number. Unparseable numbers are `0.0` (a warning is
/// printed in debug builds).
pub fn decode_f64(data: &str) -> f64 {
    match data.parse::<f64>() {
        Ok(val) => val,
        Err(_err) => {
            de_wrn!("unable to parse number {:?}; {}", data, _err);

            0.0
        }
    }
}

/// Return the decoded value of field `name` within `line`.
pub fn extract_field(name: FieldName, line: &str) -> Option<FieldValue> {
    let data: &str = extract_str(name, line)?;
    let value = match field_extractor(name).decoder {
        FieldDecoder::Str => FieldValue::Str(String::from(data)),
        FieldDecoder::Float => FieldValue::Float(decode_f64(data)),
        FieldDecoder::Int => match data.parse::<i64>() {
            Ok(val) => FieldValue::Int(val),
            Err(_err) => {
                de_wrn!("unable to parse integer {:?}; {}", data, _err);

                FieldValue::Int(0)
            }
        },
    };
    defñ!("{:?} = {:?}", name, value);

    Some(value)
}

/// Return the decoded `f64` value of field `name` within `line`.
pub fn extract_f64(name: FieldName, line: &str) -> Option<f64> {
    extract_field(name, line).map(|value| value.as_f64())
}

/// Return the mount duration in seconds found in an asynchronous reconfigure
/// completed line, at whitespace field [`MOUNT_ASYNC_FIELD_INDEX`].
pub fn extract_mount_async_secs(line: &str) -> Option<f64> {
    line.split_whitespace()
        .nth(MOUNT_ASYNC_FIELD_INDEX)
        .map(decode_f64)
}

/// Message-stripping transform.
///
/// Return the free-text message of `line`, after the request token and log
/// level, with digit runs replaced by [`STRIP_PLACEHOLDER`].
/// Lines with differing ids, counts, or durations become equal, which helps
/// comparing logs of different runs.
///
/// Return `None` if `line` has no message.
pub fn strip_message(line: &str) -> Option<String> {
    let message: &str = MESSAGE_REGEX
        .captures(line)
        .and_then(|captures| captures.get(1))?
        .as_str();

    Some(STRIP_REGEX.replace_all(message.trim(), STRIP_PLACEHOLDER).into_owned())
}
