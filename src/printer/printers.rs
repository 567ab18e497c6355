// src/printer/printers.rs

//! Low-level printing to stderr and the progress printer of the passes.

use crate::common::{Count, FileSz};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn};

use std::io::Write;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Lines between progress updates of the discovery and report passes.
pub const PROGRESS_INTERVAL_DISCOVERY: Count = 20_000;
/// Lines between progress updates of the projection pass.
pub const PROGRESS_INTERVAL_PROJECTION: Count = 5_000;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Safely write the `buffer` to stderr with help of [`StderrLock`].
///
/// [`StderrLock`]: std::io::StderrLock
pub fn write_stderr(buffer: &[u8]) {
    let mut stderr_lock = std::io::stderr().lock();
    match stderr_lock.write_all(buffer) {
        Ok(_) => {}
        Err(_err) => {
            de_err!("stderr_lock.write(buffer@{:p} (len {})) error {}", buffer, buffer.len(), _err);
        }
    }
    match stderr_lock.flush() {
        Ok(_) => {}
        Err(_err) => {
            de_err!("stderr flushing error {}", _err);
        }
    }
}

/// Prints the progress of a pass to stderr every `interval` lines.
///
/// With a known total size the progress is a percentage, otherwise a count
/// of gigabytes. Each progress line ends with `'\r'` so the next one
/// overwrites it.
#[derive(Clone, Copy, Debug)]
pub struct ProgressPrinter {
    interval: Count,
    total: Option<FileSz>,
}

impl ProgressPrinter {
    pub const fn new(
        interval: Count,
        total: Option<FileSz>,
    ) -> ProgressPrinter {
        ProgressPrinter { interval, total }
    }

    /// The progress text, without the trailing `'\r'`.
    pub fn progress_string(
        &self,
        lines: Count,
        bytes: Count,
        after: bool,
        matches: usize,
    ) -> String {
        match self.total {
            Some(total) if total > 0 => format!(
                "Reading: {} lines, {:.2}% (after: {}, matches: {})",
                lines,
                (bytes as f64 / total as f64) * 100.0,
                after,
                matches,
            ),
            _ => format!(
                "Reading: {} lines, {:0.3} GB (after: {}, matches: {})",
                lines,
                bytes as f64 / BYTES_PER_GB,
                after,
                matches,
            ),
        }
    }

    /// Is a progress update due after `lines` lines?
    pub const fn is_due(
        &self,
        lines: Count,
    ) -> bool {
        self.interval != 0 && lines != 0 && lines % self.interval == 0
    }

    pub fn print_if_due(
        &self,
        lines: Count,
        bytes: Count,
        after: bool,
        matches: usize,
    ) {
        if !self.is_due(lines) {
            return;
        }
        let mut progress = self.progress_string(lines, bytes, after, matches);
        progress.push('\r');
        write_stderr(progress.as_bytes());
    }

    /// End the progress line, if any progress was printed.
    pub fn finish(
        &self,
        lines: Count,
    ) {
        if self.interval != 0 && lines >= self.interval {
            write_stderr(b"\n");
        }
    }
}
