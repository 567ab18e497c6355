// src/readers/projectionprocessor.rs

//! Implements the projection pass, [`ProjectionProcessor`], which selects the
//! lines of the spans of selected requests and applies the suppression
//! filters.

use crate::common::{Count, LineIndex};
use crate::data::datetime::DateTimeLOpt;
use crate::data::fields::strip_message;
use crate::data::request::{extract_request_id, is_job, RequestIdSet};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use crate::printer::printers::{ProgressPrinter, PROGRESS_INTERVAL_PROJECTION};
use crate::readers::filters::{AfterLatch, LineFilters};
use crate::readers::linereader::LineReader;
use crate::readers::summary::{PassKind, SummaryPass};

use std::borrow::Cow;
use std::io::{Read, Result, Seek, Write};

use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Options of the projection pass.
#[derive(Clone, Debug, Default)]
pub struct ProjectionOptions {
    /// without selected requests, only lines matching are printed
    pub find: Option<Regex>,
    /// only lines at or after are printed
    pub after: DateTimeLOpt,
    /// do not print lines of background job tokens
    pub hide_jobs: bool,
    /// print only the stripped message of a line
    pub only_msg: bool,
    pub filters: LineFilters,
}

/// Per-line state of the projection pass.
#[derive(Debug)]
pub struct ProjectionProcessor<'a> {
    options: &'a ProjectionOptions,
    request_ids: &'a RequestIdSet,
    after_latch: AfterLatch,
    /// within the span of a selected request
    in_request: bool,
    lines_printed: Count,
    lines_suppressed: Count,
}

impl<'a> ProjectionProcessor<'a> {
    /// `after_passed_at` is the line index where a prior pass over the same
    /// data passed the time-after threshold; lines at or after it need no
    /// timestamp check.
    pub fn new(
        options: &'a ProjectionOptions,
        request_ids: &'a RequestIdSet,
        after_passed_at: Option<LineIndex>,
    ) -> ProjectionProcessor<'a> {
        ProjectionProcessor {
            options,
            request_ids,
            after_latch: AfterLatch::with_known_passed_at(options.after, after_passed_at),
            in_request: false,
            lines_printed: 0,
            lines_suppressed: 0,
        }
    }

    pub const fn is_after_passed(&self) -> bool {
        self.after_latch.is_passed()
    }

    pub const fn is_in_request(&self) -> bool {
        self.in_request
    }

    /// Is `line` selected, before suppression filters?
    ///
    /// Updates the span state.
    fn is_selected(
        &mut self,
        line: &str,
    ) -> bool {
        if !self.request_ids.is_empty() {
            return match extract_request_id(line) {
                Some(request_id) if self.request_ids.contains(request_id) => {
                    // a hidden job line leaves the span as it was
                    if self.options.hide_jobs && is_job(request_id) {
                        false
                    } else {
                        self.in_request = true;
                        true
                    }
                }
                Some(_) => {
                    self.in_request = false;
                    false
                }
                None => self.in_request,
            };
        }
        match &self.options.find {
            Some(find) => find.is_match(line),
            None => true,
        }
    }

    /// Process `line` at `index`. Returns the text to print, if any.
    pub fn process_line<'b>(
        &mut self,
        line: &'b str,
        index: LineIndex,
    ) -> Option<Cow<'b, str>> {
        if !self.after_latch.check(line, index) {
            return None;
        }
        if !self.is_selected(line) {
            return None;
        }
        if self.options.filters.is_suppressed(line) {
            self.lines_suppressed += 1;
            return None;
        }
        let output: Cow<'b, str> = match self.options.only_msg {
            true => Cow::Owned(strip_message(line)?),
            false => Cow::Borrowed(line),
        };
        self.lines_printed += 1;

        Some(output)
    }

    pub fn finish(self) -> SummaryPass {
        let mut summary = SummaryPass::new(PassKind::Projection);
        summary.lines_printed = self.lines_printed;
        summary.lines_suppressed = self.lines_suppressed;
        summary.request_ids = self.request_ids.len() as Count;
        summary.after_passed_at = self.after_latch.passed_at();

        summary
    }
}

/// Run the projection pass over all remaining lines of `linereader`,
/// writing selected lines to `writer`.
///
/// An empty `request_ids` selects lines by `options.find` alone.
pub fn project<R: Read + Seek, W: Write>(
    linereader: &mut LineReader<R>,
    options: &ProjectionOptions,
    request_ids: &RequestIdSet,
    after_passed_at: Option<LineIndex>,
    writer: &mut W,
) -> Result<SummaryPass> {
    defn!("{} request ids, after_passed_at {:?}", request_ids.len(), after_passed_at);
    let progress = ProgressPrinter::new(PROGRESS_INTERVAL_PROJECTION, linereader.filesz());
    let mut processor = ProjectionProcessor::new(options, request_ids, after_passed_at);
    let mut index: LineIndex = 0;
    while let Some(line) = linereader.next_line()? {
        if let Some(output) = processor.process_line(line, index) {
            writer.write_all(output.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        index += 1;
        // progress is only interesting until output begins
        if !processor.is_after_passed() {
            progress.print_if_due(
                linereader.lines_processed(),
                linereader.bytes_processed(),
                false,
                request_ids.len(),
            );
        }
    }
    writer.flush()?;
    if linereader.lines_truncated() > 0 {
        e_wrn!(
            "truncated {} long lines that exceeded {} bytes",
            linereader.lines_truncated(),
            linereader.line_sz_max()
        );
    }

    let mut summary = processor.finish();
    summary.linereader = linereader.summary();
    defx!("{} lines printed", summary.lines_printed);

    Ok(summary)
}
