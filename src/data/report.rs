// src/data/report.rs

//! Implements [`RequestReport`], the per-request record of the report mode,
//! and [`RequestReports`], the token-indexed table of records.
//!
//! A `RequestReport` is created from a [`LineEvent::RouteStart`] and then
//! updated by applying one [`LineEvent`] at a time,
//! see [`RequestReport::apply_event`].

use std::collections::HashMap;

use crate::data::datetime::timestamp_diff_secs;
use crate::data::event::{AdapterKind, LineEvent, ReconfigStep, SECS_TO_MS};
use crate::data::request::RequestToken;
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Mount type label that makes mount time part of the total request time.
pub const MOUNT_TYPE_ASYNC: &str = "asynchronously";
/// Completion code of requests that are never reported.
pub const CODE_UNAUTHORIZED: &str = "401";

/// Policy for deriving the mount time of a request that has no direct
/// (asynchronous reconfigure) mount time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum MountFallback {
    /// direct, else summed reconfigure tasks, else host task time
    #[default]
    #[value(name = "reconfigure-host-task")]
    ReconfigureHostTask,
    /// direct, else summed reconfigure tasks
    #[value(name = "reconfigure")]
    Reconfigure,
}

/// One legacy reconfigure task; a `execute_task` begin event paired with a
/// later `process_task` end event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconfigureTask {
    /// timestamp of the `execute_task` event
    pub time_beg: String,
    /// timestamp of the `process_task` event; empty until paired
    pub time_end: String,
}

impl ReconfigureTask {
    pub fn is_paired(&self) -> bool {
        !self.time_end.is_empty()
    }

    /// Milliseconds between begin and end; `0.0` if not paired.
    pub fn duration_ms(&self) -> f64 {
        if !self.is_paired() {
            return 0.0;
        }
        timestamp_diff_secs(&self.time_beg, &self.time_end) * SECS_TO_MS
    }
}

/// Accumulated record of one foreground request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestReport {
    pub request_id: RequestToken,
    pub method: String,
    pub route: String,
    pub computer: String,
    pub user: String,
    pub code: String,
    pub time_beg: String,
    pub time_end: String,
    pub request_ms: f64,
    pub db_ms: f64,
    pub view_ms: f64,
    /// direct mount time of an asynchronous reconfigure, else derived by
    /// [`RequestReport::finalize`]
    pub mount_ms: f64,
    pub vcenter_adapter_ms: f64,
    pub esx_adapter_ms: f64,
    pub host_task_ms: f64,
    pub host_execution_ms: f64,
    pub ntlm_beg: String,
    pub ntlm_end: String,
    pub session_ms: f64,
    pub mount_type: String,
    pub reconfigure_tasks: Vec<ReconfigureTask>,
    /// set by [`RequestReport::finalize`]
    pub total_request_ms: f64,
}

impl RequestReport {
    /// Create a `RequestReport` from a route start event.
    ///
    /// Returns `None` if `event` is not a [`LineEvent::RouteStart`].
    pub fn from_route_start(
        request_id: &str,
        event: &LineEvent,
        timestamp: &str,
    ) -> Option<RequestReport> {
        match event {
            LineEvent::RouteStart {
                method,
                route,
                computer,
                user,
            } => Some(RequestReport {
                request_id: RequestToken::from(request_id),
                method: method.clone(),
                route: route.clone(),
                computer: computer.clone(),
                user: user.clone(),
                time_beg: String::from(timestamp),
                ..Default::default()
            }),
            _ => None,
        }
    }

    /// Update this record with one classified line `event` logged at
    /// `timestamp`.
    pub fn apply_event(
        &mut self,
        event: &LineEvent,
        timestamp: &str,
    ) {
        defñ!("{:?} {:?}", self.request_id, event);
        match event {
            LineEvent::RouteStart { .. } => {
                de_wrn!("repeated route start for request {:?} ignored", self.request_id);
            }
            LineEvent::Completion {
                code,
                request_ms,
                view_ms,
                db_ms,
            } => {
                self.code = code.clone();
                self.time_end = String::from(timestamp);
                self.request_ms = *request_ms;
                self.view_ms = *view_ms;
                self.db_ms = *db_ms;
            }
            LineEvent::ReconfigureAsync { mount_ms } => {
                self.mount_ms = *mount_ms;
            }
            LineEvent::NtlmStart => {
                self.ntlm_beg = String::from(timestamp);
            }
            LineEvent::NtlmEnd => {
                self.ntlm_end = String::from(timestamp);
            }
            LineEvent::MountType { adverb } => {
                self.mount_type = adverb.clone();
            }
            LineEvent::Session { session_ms } => {
                self.session_ms = *session_ms;
            }
            LineEvent::AdapterAcquired {
                kind: AdapterKind::Esx,
                acquire_ms,
                ..
            } => {
                if *acquire_ms > self.esx_adapter_ms {
                    self.esx_adapter_ms = *acquire_ms;
                }
            }
            LineEvent::AdapterAcquired {
                kind: AdapterKind::Vcenter,
                acquire_ms,
                ..
            } => {
                if *acquire_ms > self.vcenter_adapter_ms {
                    self.vcenter_adapter_ms = *acquire_ms;
                }
            }
            LineEvent::HostTask { task_ms, execution_ms } => {
                self.host_task_ms = *task_ms;
                self.host_execution_ms = *execution_ms;
            }
            LineEvent::ReconfigureLegacy {
                step: ReconfigStep::Execute,
                ..
            } => {
                self.reconfigure_tasks.push(ReconfigureTask {
                    time_beg: String::from(timestamp),
                    ..Default::default()
                });
            }
            LineEvent::ReconfigureLegacy {
                step: ReconfigStep::Process,
                ..
            } => {
                // pair with the most recent unpaired task
                match self
                    .reconfigure_tasks
                    .iter_mut()
                    .rev()
                    .find(|task| !task.is_paired())
                {
                    Some(task) => {
                        task.time_end = String::from(timestamp);
                    }
                    None => {
                        e_wrn!(
                            "request {} reconfigure process_task at {} has no preceding execute_task",
                            self.request_id,
                            timestamp,
                        );
                    }
                }
            }
            LineEvent::Unrecognized => {}
        }
    }

    /// Sum of all paired reconfigure task durations in milliseconds.
    pub fn reconfigure_ms(&self) -> f64 {
        self.reconfigure_tasks
            .iter()
            .map(|task| task.duration_ms())
            .sum()
    }

    /// Seconds between NTLM authentication start and end; `0.0` if either is
    /// missing.
    pub fn ntlm_secs(&self) -> f64 {
        timestamp_diff_secs(&self.ntlm_beg, &self.ntlm_end)
    }

    pub fn is_mount_async(&self) -> bool {
        self.mount_type == MOUNT_TYPE_ASYNC
    }

    /// Is this record printed by the report?
    ///
    /// A route and end timestamp are set, and a completion code is set that
    /// is not `401`.
    pub fn is_reportable(&self) -> bool {
        !self.route.is_empty()
            && !self.code.is_empty()
            && self.code != CODE_UNAUTHORIZED
            && !self.time_end.is_empty()
    }

    /// Derive the mount time per `policy` and the total request time.
    pub fn finalize(
        &mut self,
        policy: MountFallback,
    ) {
        if self.mount_ms == 0.0 {
            self.mount_ms = self.reconfigure_ms();
        }
        if self.mount_ms == 0.0 && policy == MountFallback::ReconfigureHostTask {
            self.mount_ms = self.host_task_ms;
        }
        self.total_request_ms = match self.is_mount_async() {
            true => self.request_ms + self.mount_ms,
            false => self.request_ms,
        };
        defñ!("{:?} mount_ms {}, total_request_ms {}", self.request_id, self.mount_ms, self.total_request_ms);
    }
}

/// Table of [`RequestReport`] indexed by request token. Iteration is in
/// first-seen order.
#[derive(Debug, Default)]
pub struct RequestReports {
    reports: Vec<RequestReport>,
    index: HashMap<RequestToken, usize>,
}

impl RequestReports {
    pub fn new() -> RequestReports {
        RequestReports::default()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn contains(&self, request_id: &str) -> bool {
        self.index.contains_key(request_id)
    }

    pub fn get(&self, request_id: &str) -> Option<&RequestReport> {
        self.index
            .get(request_id)
            .map(|at| &self.reports[*at])
    }

    pub fn get_mut(&mut self, request_id: &str) -> Option<&mut RequestReport> {
        match self.index.get(request_id) {
            Some(at) => self.reports.get_mut(*at),
            None => None,
        }
    }

    /// Insert `report`. A report with the same token already present is
    /// kept and `report` is dropped; returns `false` in that case.
    pub fn insert(&mut self, report: RequestReport) -> bool {
        if self.index.contains_key(&report.request_id) {
            return false;
        }
        self.index.insert(report.request_id.clone(), self.reports.len());
        self.reports.push(report);

        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RequestReport> {
        self.reports.iter()
    }

    /// Finalize every record per `policy` and return the reportable records
    /// in first-seen order.
    pub fn into_reportable(self, policy: MountFallback) -> Vec<RequestReport> {
        self.reports
            .into_iter()
            .filter(|report| report.is_reportable())
            .map(|mut report| {
                report.finalize(policy);
                report
            })
            .collect()
    }
}
