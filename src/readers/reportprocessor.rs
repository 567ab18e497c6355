// src/readers/reportprocessor.rs

//! Implements the report pass, [`ReportProcessor`], which builds one
//! [`RequestReport`] per foreground request.
//!
//! [`RequestReport`]: crate::data::report::RequestReport

use crate::common::{Count, LineIndex};
use crate::data::datetime::{extract_timestamp, DateTimeLOpt};
use crate::data::event::{classify_line, classify_route_start};
use crate::data::report::{MountFallback, RequestReport, RequestReports};
use crate::data::request::{extract_request_id, extract_request_id_reconfig, is_job};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use crate::printer::printers::{ProgressPrinter, PROGRESS_INTERVAL_DISCOVERY};
use crate::readers::filters::AfterLatch;
use crate::readers::linereader::LineReader;
use crate::readers::summary::{PassKind, SummaryPass};

use std::io::{Read, Result, Seek};

use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Options of the report pass.
#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    /// only lines matching are considered
    pub find: Option<Regex>,
    /// only lines at or after are considered
    pub after: DateTimeLOpt,
    pub mount_fallback: MountFallback,
}

/// Per-line state of the report pass.
#[derive(Debug)]
pub struct ReportProcessor<'a> {
    options: &'a ReportOptions,
    after_latch: AfterLatch,
    reports: RequestReports,
    lines_matched: Count,
}

impl<'a> ReportProcessor<'a> {
    pub fn new(options: &'a ReportOptions) -> ReportProcessor<'a> {
        ReportProcessor {
            options,
            after_latch: AfterLatch::new(options.after),
            reports: RequestReports::new(),
            lines_matched: 0,
        }
    }

    /// Process `line` at `index`.
    pub fn process_line(
        &mut self,
        line: &str,
        index: LineIndex,
    ) {
        if let Some(find) = &self.options.find {
            if !find.is_match(line) {
                return;
            }
        }
        self.lines_matched += 1;
        if !self.after_latch.check(line, index) {
            return;
        }
        let request_id: &str = match extract_request_id(line).or_else(|| extract_request_id_reconfig(line)) {
            Some(val) => val,
            None => return,
        };
        if is_job(request_id) {
            return;
        }
        let timestamp: &str = match extract_timestamp(line) {
            Some(val) => val,
            None => return,
        };
        match self.reports.get_mut(request_id) {
            Some(report) => {
                let event = classify_line(line);
                report.apply_event(&event, timestamp);
            }
            None => {
                let event = match classify_route_start(line) {
                    Some(val) => val,
                    None => return,
                };
                if let Some(report) = RequestReport::from_route_start(request_id, &event, timestamp) {
                    defñ!("line {}: new report {:?}", index, request_id);
                    self.reports.insert(report);
                }
            }
        }
    }

    pub const fn is_after_passed(&self) -> bool {
        self.after_latch.is_passed()
    }

    pub fn reports_len(&self) -> usize {
        self.reports.len()
    }

    /// Finalize the reports. Returns the reportable reports in first-seen
    /// order.
    pub fn finish(self) -> (Vec<RequestReport>, SummaryPass) {
        let mut summary = SummaryPass::new(PassKind::Report);
        summary.lines_matched = self.lines_matched;
        summary.request_ids = self.reports.len() as Count;
        summary.after_passed_at = self.after_latch.passed_at();
        let reports = self.reports.into_reportable(self.options.mount_fallback);
        summary.reports = reports.len() as Count;

        (reports, summary)
    }
}

/// Run the report pass over all remaining lines of `linereader`.
///
/// All lines are read into memory before parsing.
pub fn build_reports<R: Read + Seek>(
    linereader: &mut LineReader<R>,
    options: &ReportOptions,
) -> Result<(Vec<RequestReport>, SummaryPass)> {
    defn!();
    let lines: Vec<String> = linereader.read_all_lines()?;
    if linereader.lines_truncated() > 0 {
        e_wrn!(
            "truncated {} long lines that exceeded {} bytes",
            linereader.lines_truncated(),
            linereader.line_sz_max()
        );
    }
    let progress = ProgressPrinter::new(PROGRESS_INTERVAL_DISCOVERY, Some(lines.len() as u64));
    let mut processor = ReportProcessor::new(options);
    for (index, line) in lines.iter().enumerate() {
        processor.process_line(line, index as LineIndex);
        progress.print_if_due(
            (index + 1) as Count,
            (index + 1) as Count,
            processor.is_after_passed(),
            processor.reports_len(),
        );
    }
    progress.finish(lines.len() as Count);

    let (reports, mut summary) = processor.finish();
    summary.linereader = linereader.summary();
    defx!("{} reports", reports.len());

    Ok((reports, summary))
}
