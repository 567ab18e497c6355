// src/tests/metrics_tests.rs

//! tests for `metrics.rs`

use crate::data::metrics::{
    compute_metrics,
    is_metrics_report,
    metrics_slice_len,
    MetricKey,
    MetricRow,
};
use crate::data::report::RequestReport;

use std::io::ErrorKind;

use ::test_case::test_case;

fn report(
    request_id: &str,
    total_request_ms: f64,
    mount_ms: f64,
) -> RequestReport {
    RequestReport {
        request_id: String::from(request_id),
        route: String::from("user-login"),
        code: String::from("200"),
        request_ms: total_request_ms - mount_ms,
        mount_ms,
        total_request_ms,
        ..Default::default()
    }
}

#[test_case(10, 10, 1)]
#[test_case(25, 10, 2)]
#[test_case(5, 10, 1; "minimum one")]
#[test_case(7, 0, 1; "zero percent")]
#[test_case(7, 100, 7; "all")]
#[test_case(3, 50, 1; "floor")]
fn test_metrics_slice_len(count: usize, percent: u8, expect: usize) {
    assert_eq!(metrics_slice_len(count, percent), expect);
}

#[test_case("totalrequest", Some(MetricKey::TotalRequest))]
#[test_case("totaltime", Some(MetricKey::TotalRequest))]
#[test_case("TotalTime", Some(MetricKey::TotalRequest); "case insensitive")]
#[test_case("mount", Some(MetricKey::Mount))]
#[test_case("speed", None)]
fn test_metric_key_parse(data: &str, expect: Option<MetricKey>) {
    assert_eq!(data.parse::<MetricKey>().ok(), expect);
}

#[test]
fn test_is_metrics_report() {
    assert!(is_metrics_report(&report("P1A1", 100.0, 10.0)));
    assert!(!is_metrics_report(&report("P1A1", 100.0, 0.0)));
    let mut other = report("P1A1", 100.0, 10.0);
    other.route = String::from("volumes");
    assert!(!is_metrics_report(&other));
    let mut failed = report("P1A1", 100.0, 10.0);
    failed.code = String::from("500");
    assert!(!is_metrics_report(&failed));
}

#[test]
fn test_compute_metrics_rows() {
    // 10 qualifying reports, total 100..=1000; one not qualifying
    let mut reports: Vec<RequestReport> = (1..=10)
        .rev()
        .map(|n| report(&format!("P{}A1", n), (n * 100) as f64, 10.0))
        .collect();
    reports.push(report("P99A1", 5.0, 0.0));
    let rows: Vec<MetricRow> = compute_metrics(&reports, MetricKey::TotalRequest, 20).unwrap();
    assert_eq!(rows.len(), 5);
    let cases: Vec<&str> = rows.iter().map(|row| row.case.as_str()).collect();
    assert_eq!(
        cases,
        vec!["Best case", "Avg. of best 2", "Avg. of all 10", "Avg. of worst 2", "Worst case"]
    );
    assert_eq!(rows[0].total_request_ms, 100.0);
    assert_eq!(rows[1].total_request_ms, 150.0);
    assert_eq!(rows[2].total_request_ms, 550.0);
    assert_eq!(rows[3].total_request_ms, 950.0);
    assert_eq!(rows[4].total_request_ms, 1000.0);
    assert_eq!(rows[2].mount_ms, 10.0);
}

#[test]
fn test_compute_metrics_monotonic_by_mount() {
    let mounts = [30.0, 5.0, 70.0, 12.0, 90.0, 41.0, 8.0];
    let reports: Vec<RequestReport> = mounts
        .iter()
        .enumerate()
        .map(|(index, mount)| report(&format!("P{}A1", index), 1000.0, *mount))
        .collect();
    let rows = compute_metrics(&reports, MetricKey::Mount, 30).unwrap();
    for pair in rows.windows(2) {
        assert!(pair[0].mount_ms <= pair[1].mount_ms, "{:?}", rows);
    }
    assert_eq!(rows[0].mount_ms, 5.0);
    assert_eq!(rows[4].mount_ms, 90.0);
}

#[test]
fn test_compute_metrics_single_report() {
    let reports = vec![report("P1A1", 100.0, 10.0)];
    let rows = compute_metrics(&reports, MetricKey::TotalRequest, 10).unwrap();
    for row in rows.iter() {
        assert_eq!(row.total_request_ms, 100.0);
    }
}

#[test]
fn test_compute_metrics_none_qualifying() {
    let reports = vec![report("P1A1", 100.0, 0.0)];
    let err = compute_metrics(&reports, MetricKey::TotalRequest, 10).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}
