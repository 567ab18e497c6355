// src/printer/summary.rs

//! Print the `--summary` statistics of the passes.

use crate::readers::summary::SummaryPass;

use std::io::{Result, Write};

/// Indentation of summary values.
const INDENT: &str = "  ";

/// Write the statistics of one pass.
pub fn write_summary_pass<W: Write>(
    writer: &mut W,
    summary: &SummaryPass,
) -> Result<()> {
    let lr = &summary.linereader;
    writeln!(writer, "pass: {}", summary.pass)?;
    writeln!(writer, "{}lines read          : {}", INDENT, lr.linereader_lines)?;
    writeln!(writer, "{}bytes read          : {}", INDENT, lr.linereader_bytes)?;
    writeln!(
        writer,
        "{}lines truncated     : {} (longer than {} bytes)",
        INDENT, lr.linereader_lines_truncated, lr.linereader_line_sz_max
    )?;
    match summary.after_passed_at {
        Some(index) => writeln!(writer, "{}after threshold     : line {}", INDENT, index + 1)?,
        None => writeln!(writer, "{}after threshold     : not passed", INDENT)?,
    }
    writeln!(writer, "{}lines matched       : {}", INDENT, summary.lines_matched)?;
    writeln!(writer, "{}request ids         : {}", INDENT, summary.request_ids)?;
    writeln!(writer, "{}request id matches  : {}", INDENT, summary.request_ids_candidates)?;
    writeln!(writer, "{}lines printed       : {}", INDENT, summary.lines_printed)?;
    writeln!(writer, "{}lines suppressed    : {}", INDENT, summary.lines_suppressed)?;
    writeln!(writer, "{}reports             : {}", INDENT, summary.reports)?;

    Ok(())
}

/// Print the statistics of all `summaries` to stderr.
pub fn print_summary(summaries: &[SummaryPass]) {
    let mut stderr_lock = std::io::stderr().lock();
    let _ = writeln!(stderr_lock, "\nSummary:");
    for summary in summaries.iter() {
        if let Err(_err) = write_summary_pass(&mut stderr_lock, summary) {
            crate::de_err!("write_summary_pass error {}", _err);
            return;
        }
    }
}
