// src/readers/discoveryprocessor.rs

//! Implements the discovery pass, [`DiscoveryProcessor`], which finds the set
//! of request tokens of lines matching a find expression after a time
//! threshold.

use crate::common::{Count, LineIndex};
use crate::data::datetime::DateTimeLOpt;
use crate::data::request::{extract_request_id, is_job, RequestIdSet, RequestToken};
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

/// Options of the discovery pass.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryOptions {
    /// only lines matching are considered
    pub find: Option<Regex>,
    /// only lines at or after are considered
    pub after: DateTimeLOpt,
    /// do not select background job tokens
    pub hide_jobs: bool,
}

/// The result of a discovery pass.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryResult {
    pub request_ids: RequestIdSet,
    /// line index where the time-after threshold was passed
    pub after_passed_at: Option<LineIndex>,
    pub summary: SummaryPass,
}

/// Per-line state of the discovery pass.
#[derive(Debug)]
pub struct DiscoveryProcessor<'a> {
    options: &'a DiscoveryOptions,
    after_latch: AfterLatch,
    request_ids: RequestIdSet,
    lines_matched: Count,
    candidates: Count,
}

impl<'a> DiscoveryProcessor<'a> {
    pub fn new(options: &'a DiscoveryOptions) -> DiscoveryProcessor<'a> {
        DiscoveryProcessor {
            options,
            after_latch: AfterLatch::new(options.after),
            request_ids: RequestIdSet::new(),
            lines_matched: 0,
            candidates: 0,
        }
    }

    /// Process `line` at `index`. Returns the token recorded, if any.
    pub fn process_line<'b>(
        &mut self,
        line: &'b str,
        index: LineIndex,
    ) -> Option<&'b str> {
        if let Some(find) = &self.options.find {
            if !find.is_match(line) {
                return None;
            }
        }
        self.lines_matched += 1;
        if !self.after_latch.check(line, index) {
            return None;
        }
        let request_id: &str = extract_request_id(line)?;
        if self.options.hide_jobs && is_job(request_id) {
            return None;
        }
        self.candidates += 1;
        if !self.request_ids.contains(request_id) {
            defñ!("line {}: new request id {:?}", index, request_id);
            self.request_ids.insert(RequestToken::from(request_id));
        }

        Some(request_id)
    }

    pub const fn is_after_passed(&self) -> bool {
        self.after_latch.is_passed()
    }

    /// Count of unique tokens recorded so far.
    pub fn request_ids_len(&self) -> usize {
        self.request_ids.len()
    }

    /// Count of candidate tokens recorded so far, before deduplication.
    pub const fn candidates(&self) -> Count {
        self.candidates
    }

    pub fn finish(self) -> DiscoveryResult {
        let mut summary = SummaryPass::new(PassKind::Discovery);
        summary.lines_matched = self.lines_matched;
        summary.request_ids_candidates = self.candidates;
        summary.request_ids = self.request_ids.len() as Count;
        summary.after_passed_at = self.after_latch.passed_at();

        DiscoveryResult {
            request_ids: self.request_ids,
            after_passed_at: self.after_latch.passed_at(),
            summary,
        }
    }
}

/// Run the discovery pass over all remaining lines of `linereader`.
///
/// Prints progress and every found request token to stderr.
pub fn discover<R: Read + Seek>(
    linereader: &mut LineReader<R>,
    options: &DiscoveryOptions,
) -> Result<DiscoveryResult> {
    defn!();
    let progress = ProgressPrinter::new(PROGRESS_INTERVAL_DISCOVERY, linereader.filesz());
    let mut processor = DiscoveryProcessor::new(options);
    let mut index: LineIndex = 0;
    while let Some(line) = linereader.next_line()? {
        processor.process_line(line, index);
        index += 1;
        progress.print_if_due(
            linereader.lines_processed(),
            linereader.bytes_processed(),
            processor.is_after_passed(),
            processor.request_ids_len(),
        );
    }
    progress.finish(linereader.lines_processed());
    if linereader.lines_truncated() > 0 {
        e_wrn!(
            "truncated {} long lines that exceeded {} bytes",
            linereader.lines_truncated(),
            linereader.line_sz_max()
        );
    }

    let mut result = processor.finish();
    result.summary.linereader = linereader.summary();
    let mut request_ids: Vec<&RequestToken> = result.request_ids.iter().collect();
    request_ids.sort();
    for request_id in request_ids.iter() {
        eprintln!("Request ID: {}", request_id);
    }
    defx!("{} request ids", result.request_ids.len());

    Ok(result)
}
