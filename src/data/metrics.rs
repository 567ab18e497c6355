// src/data/metrics.rs

//! Aggregate timing metrics over finalized [`RequestReport`]s.
//!
//! Metrics are computed from the reports of successful `user-login` requests
//! that have a mount time. Reports are sorted ascending by a [`MetricKey`]
//! and summarized as five [`MetricRow`]s; best case, average of the best
//! `N`, average of all, average of the worst `N`, worst case; where
//! `N = max(1, count × percent / 100)`.

use std::fmt;
use std::io::{Error, ErrorKind, Result};
use std::str::FromStr;

use crate::data::report::RequestReport;

use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Route of requests used for metrics.
pub const METRICS_ROUTE: &str = "user-login";
/// Completion code of requests used for metrics.
pub const METRICS_CODE: &str = "200";
/// Default `--percent`.
pub const METRICS_PERCENT_DEFAULT: u8 = 10;

/// The sort key of metrics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MetricKey {
    /// total request time; `totalrequest` or `totaltime`
    TotalRequest,
    /// mount time; `mount`
    Mount,
}

impl MetricKey {
    /// The sort value of `report` for this key.
    pub fn value(&self, report: &RequestReport) -> f64 {
        match self {
            MetricKey::TotalRequest => report.total_request_ms,
            MetricKey::Mount => report.mount_ms,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKey::TotalRequest => "totalrequest",
            MetricKey::Mount => "mount",
        }
    }
}

impl FromStr for MetricKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "totalrequest" | "totaltime" => Ok(MetricKey::TotalRequest),
            "mount" => Ok(MetricKey::Mount),
            _ => Err(format!(
                "unknown metric {:?}; expected one of \"totalrequest\", \"totaltime\", \"mount\"",
                s
            )),
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One summary row of metrics. Each duration is in milliseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricRow {
    /// label of the row, e.g. `"Worst case"`
    pub case: String,
    pub total_request_ms: f64,
    pub request_ms: f64,
    pub db_ms: f64,
    pub view_ms: f64,
    pub mount_ms: f64,
    pub vcenter_adapter_ms: f64,
    pub esx_adapter_ms: f64,
    pub host_task_ms: f64,
    pub host_execution_ms: f64,
    pub session_ms: f64,
}

impl MetricRow {
    /// Averages of all durations of `reports`. An empty `reports` is all
    /// zeroes.
    pub fn average(case: String, reports: &[&RequestReport]) -> MetricRow {
        let mut row = MetricRow {
            case,
            ..Default::default()
        };
        if reports.is_empty() {
            return row;
        }
        for report in reports.iter() {
            row.total_request_ms += report.total_request_ms;
            row.request_ms += report.request_ms;
            row.db_ms += report.db_ms;
            row.view_ms += report.view_ms;
            row.mount_ms += report.mount_ms;
            row.vcenter_adapter_ms += report.vcenter_adapter_ms;
            row.esx_adapter_ms += report.esx_adapter_ms;
            row.host_task_ms += report.host_task_ms;
            row.host_execution_ms += report.host_execution_ms;
            row.session_ms += report.session_ms;
        }
        let count = reports.len() as f64;
        row.total_request_ms /= count;
        row.request_ms /= count;
        row.db_ms /= count;
        row.view_ms /= count;
        row.mount_ms /= count;
        row.vcenter_adapter_ms /= count;
        row.esx_adapter_ms /= count;
        row.host_task_ms /= count;
        row.host_execution_ms /= count;
        row.session_ms /= count;

        row
    }
}

/// Does `report` qualify for metrics?
pub fn is_metrics_report(report: &RequestReport) -> bool {
    report.route == METRICS_ROUTE && report.code == METRICS_CODE && report.mount_ms > 0.0
}

/// Count of reports in the best and worst slices;
/// `max(1, count × percent / 100)`, at most `count` when `count > 0`.
pub fn metrics_slice_len(count: usize, percent: u8) -> usize {
    let len = count * (percent as usize) / 100;
    let len = std::cmp::max(1, len);
    if count > 0 {
        debug_assert_le!(len, count);
    }

    len
}

/// Compute the five metrics rows for `reports` sorted by `key`.
///
/// `reports` must be finalized, see [`RequestReport::finalize`].
/// Returns `Err` of kind `InvalidData` if no report qualifies.
pub fn compute_metrics(
    reports: &[RequestReport],
    key: MetricKey,
    percent: u8,
) -> Result<Vec<MetricRow>> {
    defn!("{} reports, key {}, percent {}", reports.len(), key, percent);
    let mut qualified: Vec<&RequestReport> = reports
        .iter()
        .filter(|report| is_metrics_report(report))
        .collect();
    if qualified.is_empty() {
        defx!("no qualifying reports");
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("No records found for metrics of {:?} with result code {}", METRICS_ROUTE, METRICS_CODE),
        ));
    }
    // stable so equal values keep first-seen order
    qualified.sort_by(|a, b| key.value(a).total_cmp(&key.value(b)));

    let count = qualified.len();
    let slice_len = metrics_slice_len(count, percent);
    let rows: Vec<MetricRow> = vec![
        MetricRow::average(String::from("Best case"), &qualified[..1]),
        MetricRow::average(format!("Avg. of best {}", slice_len), &qualified[..slice_len]),
        MetricRow::average(format!("Avg. of all {}", count), &qualified[..]),
        MetricRow::average(format!("Avg. of worst {}", slice_len), &qualified[count - slice_len..]),
        MetricRow::average(String::from("Worst case"), &qualified[count - 1..]),
    ];
    defx!("{} rows", rows.len());

    Ok(rows)
}
