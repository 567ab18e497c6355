// src/printer/report.rs

//! Format and print [`RequestReport`] rows and [`MetricRow`]s as
//! comma-separated text.
//!
//! [`RequestReport`]: crate::data::report::RequestReport
//! [`MetricRow`]: crate::data::metrics::MetricRow

use crate::data::metrics::MetricRow;
use crate::data::report::RequestReport;

use std::io::{Result, Write};

use ::itertools::Itertools;

/// Separator of columns.
pub const COLUMN_SEPARATOR: &str = ", ";

/// Report column headers, in order.
pub const REPORT_HEADERS: [&str; 20] = [
    "RequestID",
    "Method",
    "URL",
    "Computer",
    "User",
    "Result Code",
    "Start",
    "End",
    "Total Request Time (ms)",
    "Request Time (ms)",
    "DB Time (ms)",
    "View Time (ms)",
    "Mount Time (ms)",
    "vCenter Adapter Time (ms)",
    "ESX Adapter Time (ms)",
    "Host Task Time (ms)",
    "Host Execution Time (ms)",
    "Total NTLM Time (s)",
    "Session Time (ms)",
    "Mount Type",
];

/// Header of the first metrics column.
pub const METRICS_CASES_HEADER: &str = "Cases";
/// Count of leading non-numeric report columns, left empty in metrics rows.
const METRICS_EMPTY_COLUMNS: usize = 7;
/// Index of the NTLM column, left empty in metrics rows.
const NTLM_COLUMN: usize = 17;

/// The report header line.
pub fn report_header() -> String {
    REPORT_HEADERS.iter().join(COLUMN_SEPARATOR)
}

/// The metrics header line. Same columns as the report; the non-numeric
/// columns and the NTLM column are empty.
pub fn metrics_header() -> String {
    let mut headers: Vec<&str> = Vec::with_capacity(REPORT_HEADERS.len());
    headers.push(METRICS_CASES_HEADER);
    headers.extend(std::iter::repeat("").take(METRICS_EMPTY_COLUMNS));
    headers.extend(REPORT_HEADERS[8..NTLM_COLUMN].iter());
    headers.push("");
    headers.extend(REPORT_HEADERS[NTLM_COLUMN + 1..19].iter());
    headers.push("");

    headers.iter().join(COLUMN_SEPARATOR)
}

/// One report row. `report` must be finalized.
pub fn format_report_row(report: &RequestReport) -> String {
    format!(
        "{1}{0}{2}{0}/{3}{0}{4}{0}{5}{0}{6}{0}{7}{0}{8}{0}{9:.2}{0}{10:.2}{0}{11:.2}{0}{12:.2}{0}{13:.2}{0}{14:.2}{0}{15:.2}{0}{16:.2}{0}{17:.2}{0}{18:.2}{0}{19:.2}{0}{20}",
        COLUMN_SEPARATOR,
        report.request_id,
        report.method,
        report.route,
        report.computer,
        report.user,
        report.code,
        report.time_beg,
        report.time_end,
        report.total_request_ms,
        report.request_ms,
        report.db_ms,
        report.view_ms,
        report.mount_ms,
        report.vcenter_adapter_ms,
        report.esx_adapter_ms,
        report.host_task_ms,
        report.host_execution_ms,
        report.ntlm_secs(),
        report.session_ms,
        report.mount_type,
    )
}

/// One metrics row.
pub fn format_metric_row(row: &MetricRow) -> String {
    let mut columns: Vec<String> = Vec::with_capacity(REPORT_HEADERS.len());
    columns.push(row.case.clone());
    columns.extend(std::iter::repeat(String::new()).take(METRICS_EMPTY_COLUMNS));
    for value in [
        row.total_request_ms,
        row.request_ms,
        row.db_ms,
        row.view_ms,
        row.mount_ms,
        row.vcenter_adapter_ms,
        row.esx_adapter_ms,
        row.host_task_ms,
        row.host_execution_ms,
    ] {
        columns.push(format!("{:.2}", value));
    }
    columns.push(String::new());
    columns.push(format!("{:.2}", row.session_ms));
    columns.push(String::new());

    columns.join(COLUMN_SEPARATOR)
}

/// Write the report header and one row per report.
pub fn write_report<W: Write>(
    writer: &mut W,
    reports: &[RequestReport],
) -> Result<()> {
    writeln!(writer, "{}", report_header())?;
    for report in reports.iter() {
        writeln!(writer, "{}", format_report_row(report))?;
    }
    writer.flush()
}

/// Write the metrics header and rows.
pub fn write_metrics<W: Write>(
    writer: &mut W,
    rows: &[MetricRow],
) -> Result<()> {
    writeln!(writer, "{}", metrics_header())?;
    for row in rows.iter() {
        writeln!(writer, "{}", format_metric_row(row))?;
    }
    writer.flush()
}
