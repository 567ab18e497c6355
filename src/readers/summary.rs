// src/readers/summary.rs

//! Implements `SummaryPass` statistics of one pass over a log file.

use crate::common::{Count, LineIndex};
use crate::readers::linereader::SummaryLineReader;

use std::fmt;

/// The passes over a log file.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PassKind {
    /// find the qualifying request tokens
    #[default]
    Discovery,
    /// print the lines of qualifying requests
    Projection,
    /// build request reports
    Report,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::Discovery => write!(f, "discovery"),
            PassKind::Projection => write!(f, "projection"),
            PassKind::Report => write!(f, "report"),
        }
    }
}

/// Accumulated statistics of one pass.
///
/// For CLI option `--summary`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummaryPass {
    pub pass: PassKind,
    pub linereader: SummaryLineReader,
    /// lines matching the find expression
    pub lines_matched: Count,
    /// candidate request tokens recorded, before deduplication
    pub request_ids_candidates: Count,
    /// unique request tokens
    pub request_ids: Count,
    /// lines written to the output
    pub lines_printed: Count,
    /// lines dropped by the suppression filters
    pub lines_suppressed: Count,
    /// request reports created
    pub reports: Count,
    /// line index where the time-after threshold was passed
    pub after_passed_at: Option<LineIndex>,
}

impl SummaryPass {
    pub fn new(pass: PassKind) -> SummaryPass {
        SummaryPass {
            pass,
            ..Default::default()
        }
    }
}
