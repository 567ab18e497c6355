// src/tests/reportprocessor_tests.rs

//! tests for `reportprocessor.rs`

use crate::data::datetime::datetime_parse_after;
use crate::data::report::{MountFallback, RequestReport};
use crate::readers::reportprocessor::{build_reports, ReportOptions, ReportProcessor};
use crate::readers::summary::PassKind;
use crate::tests::common::{linereader_from_str, LOG_SAMPLE};

use ::regex::Regex;

/// One `user-login` request `P9001A1` with an asynchronous mount, one
/// `volumes` request `P9002A1` with legacy reconfigure tasks, one
/// unauthorized request `P9003A1`, and a job.
const LOG_REPORT: &str = "\
[2020-01-01 00:00:01 UTC] P9001A1 INFO Started GET \"/user-login?workstation=HOST1&username=bob&\" for 10.0.0.1
[2020-01-01 00:00:01 UTC] P9001A1 INFO Authenticating URL http://avm/user-login
[2020-01-01 00:00:01 UTC] P9002A1 INFO Started POST \"/volumes\" for 10.0.0.2
[2020-01-01 00:00:02 UTC] P9001A1 INFO NTLM authentication result: success
[2020-01-01 00:00:02 UTC] P9001A1 INFO NTLM authorization took: 15.2ms
[2020-01-01 00:00:02 UTC] P9001A1 INFO Acquired 'vcenter' adapter 2 of 5 for 'vc1' in 0.5
[2020-01-01 00:00:02 UTC] P9001A1 INFO Volumes will be mounted asynchronously
[2020-01-01 00:00:02 UTC] P9002A1 INFO RvSphere: Waking up in ReconfigVm#execute_task for vm2
[2020-01-01 00:00:02 UTC] P1234DJ5 INFO Started GET \"/jobs\" for 127.0.0.1
[2020-01-01 00:00:03 UTC] P9001A1 INFO Completed 200 OK in 12.5ms (Views: 3.0ms | ActiveRecord: 2.0ms)
[2020-01-01 00:00:03 UTC] P9003A1 INFO Started GET \"/user-login?workstation=HOST2&username=eve&\" for 10.0.0.3
[2020-01-01 00:00:04 UTC] P9002A1 INFO RvSphere: Waking up in ReconfigVm#process_task with result \"success\"
[2020-01-01 00:00:04 UTC] P9002A1 INFO Task total time: 9.0s (execution time 8.0s)
[2020-01-01 00:00:04 UTC] P9003A1 INFO Completed 401 Unauthorized in 1.0ms (Views: 0.0ms | ActiveRecord: 0.0ms)
[2020-01-01 00:00:05 UTC] P9001A1RA INFO Async completed for ATTACH volumes on machine vm1 with 2 volumes mounted in 4.5 seconds
[2020-01-01 00:00:06 UTC] P9002A1 INFO Completed 201 Created in 40.0ms (Views: 0.0ms | ActiveRecord: 5.0ms)
";

fn build(options: &ReportOptions, data: &str) -> Vec<RequestReport> {
    let mut linereader = linereader_from_str(data);
    let (reports, summary) = build_reports(&mut linereader, options).unwrap();
    assert_eq!(summary.pass, PassKind::Report);
    assert_eq!(summary.reports, reports.len() as u64);

    reports
}

#[test]
fn test_build_reports() {
    let reports = build(&ReportOptions::default(), LOG_REPORT);
    let ids: Vec<&str> = reports
        .iter()
        .map(|report| report.request_id.as_str())
        .collect();
    assert_eq!(ids, vec!["P9001A1", "P9002A1"]);

    let login = &reports[0];
    assert_eq!(login.method, "GET");
    assert_eq!(login.route, "user-login");
    assert_eq!(login.computer, "HOST1");
    assert_eq!(login.user, "bob");
    assert_eq!(login.code, "200");
    assert_eq!(login.time_beg, "[2020-01-01 00:00:01 UTC]");
    assert_eq!(login.time_end, "[2020-01-01 00:00:03 UTC]");
    assert_eq!(login.request_ms, 12.5);
    assert_eq!(login.view_ms, 3.0);
    assert_eq!(login.db_ms, 2.0);
    assert_eq!(login.ntlm_secs(), 1.0);
    assert_eq!(login.session_ms, 15.2);
    assert_eq!(login.vcenter_adapter_ms, 500.0);
    assert_eq!(login.mount_ms, 4500.0);
    assert_eq!(login.total_request_ms, 12.5 + 4500.0);

    let volumes = &reports[1];
    assert_eq!(volumes.method, "POST");
    assert_eq!(volumes.code, "201");
    assert_eq!(volumes.reconfigure_tasks.len(), 1);
    // reconfigure tasks come before the host task fallback
    assert_eq!(volumes.mount_ms, 2000.0);
    assert_eq!(volumes.host_task_ms, 9000.0);
    assert_eq!(volumes.total_request_ms, 40.0);
}

#[test]
fn test_build_reports_log_sample() {
    let reports = build(&ReportOptions::default(), LOG_SAMPLE);
    assert_eq!(reports.len(), 2);
    // completion order differs from first-seen order
    assert_eq!(reports[0].request_id, "P100A1");
    assert_eq!(reports[0].user, "alice");
    assert_eq!(reports[1].request_id, "P200A2");
    assert_eq!(reports[1].route, "volumes");
}

#[test]
fn test_build_reports_after() {
    let options = ReportOptions {
        after: Some(datetime_parse_after("2020-01-01 00:00:03").unwrap()),
        ..Default::default()
    };
    // route starts are before the threshold
    let reports = build(&options, LOG_REPORT);
    assert!(reports.is_empty());
}

#[test]
fn test_build_reports_find() {
    let options = ReportOptions {
        find: Some(Regex::new("P9002A1").unwrap()),
        ..Default::default()
    };
    let reports = build(&options, LOG_REPORT);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].request_id, "P9002A1");
}

#[test]
fn test_process_line_host_task_fallback() {
    let data = "\
[2020-01-01 00:00:01 UTC] P5A1 INFO Started POST \"/volumes\" for 10.0.0.2
[2020-01-01 00:00:02 UTC] P5A1 INFO Task total time: 2.5s (execution time 1.5s)
[2020-01-01 00:00:03 UTC] P5A1 INFO Completed 200 OK in 30.0ms (Views: 0.0ms | ActiveRecord: 5.0ms)
";
    for (policy, expect) in [(MountFallback::ReconfigureHostTask, 2500.0), (MountFallback::Reconfigure, 0.0)] {
        let options = ReportOptions {
            mount_fallback: policy,
            ..Default::default()
        };
        let mut processor = ReportProcessor::new(&options);
        for (index, line) in data.lines().enumerate() {
            processor.process_line(line, index as u64);
        }
        assert_eq!(processor.reports_len(), 1);
        let (reports, summary) = processor.finish();
        assert_eq!(reports[0].mount_ms, expect, "{:?}", policy);
        assert_eq!(reports[0].host_execution_ms, 1500.0);
        assert_eq!(summary.request_ids, 1);
    }
}

#[test]
fn test_process_line_ignores_lines_before_route_start() {
    let options = ReportOptions::default();
    let mut processor = ReportProcessor::new(&options);
    processor.process_line("[2020-01-01 00:00:01 UTC] P6A1 INFO Completed 200 OK in 1.0ms (Views: 0.0ms | ActiveRecord: 0.0ms)", 0);
    processor.process_line("  untokened", 1);
    assert_eq!(processor.reports_len(), 0);
}
