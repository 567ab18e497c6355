// src/data/event.rs

//! Classify a log line into one [`LineEvent`] for the report builder.
//!
//! Classification is an ordered list of classifier functions,
//! [`LINE_CLASSIFIERS`], evaluated top-to-bottom. The first classifier to
//! return `Some` wins. A line no classifier recognizes is
//! [`LineEvent::Unrecognized`].
//!
//! Route start lines are classified separately by [`classify_route_start`]
//! as they only matter for a request not yet seen.

use crate::data::fields::{
    extract_f64,
    extract_field,
    extract_mount_async_secs,
    extract_str,
    FieldName,
    PATTERN_NTLM_END,
    PATTERN_NTLM_START,
    PATTERN_RECONFIG_ASYNC,
};

use ::lazy_static::lazy_static;
use ::regex::Regex;

/// Scale seconds to milliseconds.
pub const SECS_TO_MS: f64 = 1000.0;

/// `ReconfigVm#execute_task`
pub const RECONFIG_STEP_EXECUTE: &str = "execute_task";
/// `ReconfigVm#process_task`
pub const RECONFIG_STEP_PROCESS: &str = "process_task";

/// Virtualization platform of a connection adapter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdapterKind {
    Vcenter,
    Esx,
}

/// Step of a legacy reconfigure task.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReconfigStep {
    /// the task begins
    Execute,
    /// the task ends
    Process,
}

/// The kinds of log lines that update a [`RequestReport`].
///
/// [`RequestReport`]: crate::data::report::RequestReport
#[derive(Clone, Debug, PartialEq)]
pub enum LineEvent {
    RouteStart {
        method: String,
        route: String,
        computer: String,
        user: String,
    },
    Completion {
        code: String,
        request_ms: f64,
        view_ms: f64,
        db_ms: f64,
    },
    ReconfigureAsync {
        mount_ms: f64,
    },
    NtlmStart,
    NtlmEnd,
    MountType {
        adverb: String,
    },
    Session {
        session_ms: f64,
    },
    AdapterAcquired {
        kind: AdapterKind,
        number: i64,
        acquire_ms: f64,
    },
    HostTask {
        task_ms: f64,
        execution_ms: f64,
    },
    ReconfigureLegacy {
        step: ReconfigStep,
        result: Option<String>,
    },
    Unrecognized,
}

/// A classifier returns the `LineEvent` of a line it recognizes.
pub type LineClassifier = fn(&str) -> Option<LineEvent>;

lazy_static! {
    static ref NTLM_START_REGEX: Regex = Regex::new(PATTERN_NTLM_START).unwrap();
    static ref NTLM_END_REGEX: Regex = Regex::new(PATTERN_NTLM_END).unwrap();
    static ref RECONFIG_ASYNC_REGEX: Regex = Regex::new(PATTERN_RECONFIG_ASYNC).unwrap();
}

fn classify_completion(line: &str) -> Option<LineEvent> {
    let code = extract_str(FieldName::CompletedCode, line)?;

    Some(LineEvent::Completion {
        code: String::from(code),
        request_ms: extract_f64(FieldName::CompletedRequestMs, line).unwrap_or_default(),
        view_ms: extract_f64(FieldName::CompletedViewMs, line).unwrap_or_default(),
        db_ms: extract_f64(FieldName::CompletedDbMs, line).unwrap_or_default(),
    })
}

fn classify_reconfigure_async(line: &str) -> Option<LineEvent> {
    if !RECONFIG_ASYNC_REGEX.is_match(line) {
        return None;
    }
    let mount_secs: f64 = extract_mount_async_secs(line).unwrap_or_default();

    Some(LineEvent::ReconfigureAsync { mount_ms: mount_secs * SECS_TO_MS })
}

fn classify_ntlm_start(line: &str) -> Option<LineEvent> {
    match NTLM_START_REGEX.is_match(line) {
        true => Some(LineEvent::NtlmStart),
        false => None,
    }
}

fn classify_mount_type(line: &str) -> Option<LineEvent> {
    let adverb = extract_str(FieldName::MountType, line)?;

    Some(LineEvent::MountType { adverb: String::from(adverb) })
}

fn classify_ntlm_end(line: &str) -> Option<LineEvent> {
    match NTLM_END_REGEX.is_match(line) {
        true => Some(LineEvent::NtlmEnd),
        false => None,
    }
}

fn classify_session(line: &str) -> Option<LineEvent> {
    let session_ms = extract_f64(FieldName::SessionMs, line)?;

    Some(LineEvent::Session { session_ms })
}

fn classify_adapter_esx(line: &str) -> Option<LineEvent> {
    let acquire_secs = extract_f64(FieldName::AdapterEsxSecs, line)?;
    let number: i64 = extract_field(FieldName::AdapterEsxNumber, line)
        .map(|value| value.as_i64())
        .unwrap_or_default();

    Some(LineEvent::AdapterAcquired {
        kind: AdapterKind::Esx,
        number,
        acquire_ms: acquire_secs * SECS_TO_MS,
    })
}

fn classify_adapter_vcenter(line: &str) -> Option<LineEvent> {
    let acquire_secs = extract_f64(FieldName::AdapterVcenterSecs, line)?;
    let number: i64 = extract_field(FieldName::AdapterVcenterNumber, line)
        .map(|value| value.as_i64())
        .unwrap_or_default();

    Some(LineEvent::AdapterAcquired {
        kind: AdapterKind::Vcenter,
        number,
        acquire_ms: acquire_secs * SECS_TO_MS,
    })
}

fn classify_host_task(line: &str) -> Option<LineEvent> {
    let task_secs = extract_f64(FieldName::TaskTotalSecs, line)?;
    let execution_secs = extract_f64(FieldName::TaskExecutionSecs, line).unwrap_or_default();

    Some(LineEvent::HostTask {
        task_ms: task_secs * SECS_TO_MS,
        execution_ms: execution_secs * SECS_TO_MS,
    })
}

fn classify_reconfigure_legacy(line: &str) -> Option<LineEvent> {
    let step: ReconfigStep = match extract_str(FieldName::ReconfigLegacyStep, line)? {
        RECONFIG_STEP_EXECUTE => ReconfigStep::Execute,
        RECONFIG_STEP_PROCESS => ReconfigStep::Process,
        _ => return None,
    };
    let result: Option<String> = extract_str(FieldName::ReconfigLegacyResult, line).map(String::from);

    Some(LineEvent::ReconfigureLegacy { step, result })
}

pub const LINE_CLASSIFIERS_LEN: usize = 10;

/// Classifiers for lines of an already-seen request, in priority order.
pub const LINE_CLASSIFIERS: [(&str, LineClassifier); LINE_CLASSIFIERS_LEN] = [
    ("Completion", classify_completion),
    ("ReconfigureAsync", classify_reconfigure_async),
    ("NtlmStart", classify_ntlm_start),
    ("MountType", classify_mount_type),
    ("NtlmEnd", classify_ntlm_end),
    ("Session", classify_session),
    ("AdapterAcquiredEsx", classify_adapter_esx),
    ("AdapterAcquiredVcenter", classify_adapter_vcenter),
    ("HostTask", classify_host_task),
    ("ReconfigureLegacy", classify_reconfigure_legacy),
];

/// Classify a line of an already-seen request.
pub fn classify_line(line: &str) -> LineEvent {
    for (_name, classifier) in LINE_CLASSIFIERS.iter() {
        if let Some(event) = classifier(line) {
            return event;
        }
    }

    LineEvent::Unrecognized
}

/// Return a [`LineEvent::RouteStart`] if `line` starts a request route,
/// e.g. `INFO Started GET "/user-login?workstation=HOST1&username=bob&"`.
pub fn classify_route_start(line: &str) -> Option<LineEvent> {
    let method = extract_str(FieldName::Method, line)?;
    let route = extract_str(FieldName::Route, line).unwrap_or_default();

    Some(LineEvent::RouteStart {
        method: String::from(method),
        route: String::from(route),
        computer: String::from(extract_str(FieldName::Computer, line).unwrap_or_default()),
        user: String::from(extract_str(FieldName::User, line).unwrap_or_default()),
    })
}
