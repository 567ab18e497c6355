// src/readers/filters.rs

//! Line-level filters shared by the passes.
//!
//! - [`LineFilters`] is the chain of suppression filters of the projection
//!   pass.
//! - [`AfterLatch`] is the time-after threshold; once a line at or after the
//!   threshold is seen, every later line is past the threshold.

use crate::common::LineIndex;
use crate::data::datetime::{extract_timestamp, is_after_time, DateTimeL, DateTimeLOpt};

use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// SQL statement lines.
pub const PATTERN_SQL: &str = r"( SQL: | SQL \()|(EXEC sp_executesql N)|( CACHE \()";
/// NTLM authentication lines.
pub const PATTERN_NTLM: &str = r" (\(NTLM\)|NTLM:) ";
/// Debug level lines.
pub const PATTERN_DEBUG: &str = r" DEBUG ";
/// The find expression of `--detect-errors`.
pub const PATTERN_DETECT_ERRORS: &str =
    "( ERROR | Exception | undefined | Failed | NilClass | Unable | failed )";

lazy_static! {
    static ref SQL_REGEX: Regex = Regex::new(PATTERN_SQL).unwrap();
    static ref NTLM_REGEX: Regex = Regex::new(PATTERN_NTLM).unwrap();
    static ref DEBUG_REGEX: Regex = Regex::new(PATTERN_DEBUG).unwrap();
}

/// Which filter suppressed a line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Suppressed {
    Sql,
    Ntlm,
    Debug,
    Hide,
}

/// The suppression filters of the projection pass, applied in the fixed
/// order SQL, NTLM, DEBUG, user hide expression.
#[derive(Clone, Debug, Default)]
pub struct LineFilters {
    pub hide_sql: bool,
    pub hide_ntlm: bool,
    pub hide_debug: bool,
    /// user-supplied `--hide` expression
    pub hide: Option<Regex>,
}

impl LineFilters {
    /// Return the first filter that suppresses `line`, if any.
    pub fn suppressed_by(&self, line: &str) -> Option<Suppressed> {
        if self.hide_sql && SQL_REGEX.is_match(line) {
            return Some(Suppressed::Sql);
        }
        if self.hide_ntlm && NTLM_REGEX.is_match(line) {
            return Some(Suppressed::Ntlm);
        }
        if self.hide_debug && DEBUG_REGEX.is_match(line) {
            return Some(Suppressed::Debug);
        }
        match &self.hide {
            Some(regex) if regex.is_match(line) => Some(Suppressed::Hide),
            _ => None,
        }
    }

    pub fn is_suppressed(&self, line: &str) -> bool {
        self.suppressed_by(line).is_some()
    }
}

/// The time-after threshold latch of one pass.
///
/// Without a threshold every line is past the threshold.
#[derive(Clone, Copy, Debug)]
pub struct AfterLatch {
    after: DateTimeLOpt,
    passed: bool,
    /// line index where the threshold was passed
    passed_at: Option<LineIndex>,
    /// lines at or after this index are known to be past the threshold,
    /// e.g. from a prior pass over the same data
    known_passed_at: Option<LineIndex>,
}

impl AfterLatch {
    pub fn new(after: DateTimeLOpt) -> AfterLatch {
        AfterLatch {
            after,
            passed: after.is_none(),
            passed_at: None,
            known_passed_at: None,
        }
    }

    /// Create a latch that needs no timestamp check for lines at or after
    /// `known_passed_at`.
    pub fn with_known_passed_at(
        after: DateTimeLOpt,
        known_passed_at: Option<LineIndex>,
    ) -> AfterLatch {
        let mut latch = AfterLatch::new(after);
        latch.known_passed_at = known_passed_at;

        latch
    }

    pub const fn after(&self) -> Option<DateTimeL> {
        self.after
    }

    pub const fn is_passed(&self) -> bool {
        self.passed
    }

    /// Line index where the threshold was passed, if a threshold was passed.
    pub const fn passed_at(&self) -> Option<LineIndex> {
        self.passed_at
    }

    /// Check `line` at `index` against the threshold.
    /// Returns `true` if past the threshold.
    ///
    /// Lines without a timestamp do not pass the threshold.
    pub fn check(
        &mut self,
        line: &str,
        index: LineIndex,
    ) -> bool {
        if self.passed {
            return true;
        }
        let after: &DateTimeL = match &self.after {
            Some(val) => val,
            None => return true,
        };
        let passed: bool = match self.known_passed_at {
            Some(known) if index >= known => true,
            _ => match extract_timestamp(line) {
                Some(timestamp) => is_after_time(timestamp, after),
                None => false,
            },
        };
        if passed {
            defñ!("passed at line {}", index);
            self.passed = true;
            self.passed_at = Some(index);
        }

        passed
    }
}
