// src/bin/avmlog.rs

//! Driver program _avmlog_.
//!
//! Processes user-passed command-line arguments.
//! Then either
//! - runs the discovery pass to find the qualifying request tokens and then
//!   the projection pass to print the lines of those requests, or
//! - runs the report pass to print one timing report row per request and
//!   metrics.
//!
//! A `.zip` archive is first extracted into transient directory `output/`
//! and its log files joined into one log file. The directory is removed at
//! the end of the run, also on Ctrl+C.

#![allow(non_camel_case_types)]

// first setup the custom global allocator
use ::avmloglib::common::AllocatorChosen;

cfg_if::cfg_if! {
    if #[cfg(feature = "jemalloc")] {
        use ::tikv_jemallocator::Jemalloc;
        #[global_allocator]
        static GLOBAL: Jemalloc = Jemalloc;
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::Jemalloc;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "jemalloc";
    }
    else if #[cfg(feature = "mimalloc")] {
        use ::mimalloc::MiMalloc;
        #[global_allocator]
        static GLOBAL: MiMalloc = MiMalloc;
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::Mimalloc;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "mimalloc";
    }
    else {
        const ALLOCATOR_CHOSEN: AllocatorChosen = AllocatorChosen::System;
        const CLI_HELP_AFTER_ALLOCATOR: &str = "system";
    }
}

use std::io::{BufWriter, Error, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::RwLock;

use ::avmloglib::common::{err_is_usage, FPath, EXIT_ERR, EXIT_OK, EXIT_USAGE};
use ::avmloglib::data::datetime::{datetime_parse_after, DateTimeL, CLI_AFTER_PATTERN};
use ::avmloglib::data::metrics::{compute_metrics, MetricKey, METRICS_PERCENT_DEFAULT};
use ::avmloglib::data::report::MountFallback;
use ::avmloglib::data::request::RequestIdSet;
use ::avmloglib::debug::printers::{e_err, e_wrn};
use ::avmloglib::printer::report::{write_metrics, write_report};
use ::avmloglib::printer::summary::print_summary;
use ::avmloglib::readers::archivereader::{extract_zip, ArchiveExtraction, ARCHIVE_OUTPUT_DIR};
use ::avmloglib::readers::discoveryprocessor::{discover, DiscoveryOptions};
use ::avmloglib::readers::filters::{LineFilters, PATTERN_DETECT_ERRORS};
use ::avmloglib::readers::helpers::{basename, is_zip};
use ::avmloglib::readers::linereader::LineReader;
use ::avmloglib::readers::projectionprocessor::{project, ProjectionOptions};
use ::avmloglib::readers::reportprocessor::{build_reports, ReportOptions};
use ::avmloglib::readers::summary::SummaryPass;

use ::clap::Parser;
use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::si_trace_print::stack::stack_offset_set;

// --------------------
// command-line parsing

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Given a FILE path ending \".gz\", the file is gzip decompressed.
Given a FILE path ending \".zip\", the log files within the zip archive are
extracted into directory \"",
    ARCHIVE_OUTPUT_DIR,
    "\" and joined into one log file. The directory is removed when done.

Example:
    avmlog --after \"2015-10-19 09:00:00\" --find \"apvuser2599\" --full --neat scale.log.gz

DateTime of --after is UTC with pattern \"",
    CLI_AFTER_PATTERN,
    "\".

Exit status is 0 for success, 1 for errors, 2 for usage errors and for
finding no requests.",
    CLI_HELP_AFTER_NOTE_DEBUG,
);

// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "avmlog",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "Allocator: ", CLI_HELP_AFTER_ALLOCATOR, "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of the log file; a plain text log file, a gzip ".gz" log file,
    /// or a ".zip" archive of log files.
    #[clap(required = true, verbatim_doc_comment)]
    path: String,

    /// Hide background jobs.
    #[clap(long = "hide-jobs", alias = "hide_jobs")]
    hide_jobs: bool,

    /// Hide SQL statements.
    #[clap(long = "hide-sql", alias = "hide_sql")]
    hide_sql: bool,

    /// Hide NTLM lines.
    #[clap(long = "hide-ntlm", alias = "hide_ntlm")]
    hide_ntlm: bool,

    /// Hide DEBUG lines.
    #[clap(long = "hide-debug", alias = "hide_debug")]
    hide_debug: bool,

    /// Print only the message portion of each line, with numbers and
    /// identifiers replaced by "***".
    #[clap(long = "only-msg", alias = "only_msg", verbatim_doc_comment)]
    only_msg: bool,

    /// Print a timing report of each request instead of log lines.
    #[clap(long)]
    report: bool,

    /// Print every line of each request having a line matching --find.
    #[clap(long)]
    full: bool,

    /// Hide clutter; same as --hide-jobs --hide-sql --hide-ntlm.
    #[clap(long)]
    neat: bool,

    /// Find lines containing known error messages; overrides --find.
    #[clap(long = "detect-errors", alias = "detect_errors")]
    detect_errors: bool,

    /// Only lines at or after this UTC datetime, "YYYY-MM-DD HH:MM:SS".
    #[clap(long, value_parser = cli_parse_after)]
    after: Option<DateTimeL>,

    /// Find lines matching this regular expression.
    #[clap(long, value_parser = cli_parse_regex)]
    find: Option<Regex>,

    /// Hide lines matching this regular expression.
    #[clap(long, value_parser = cli_parse_regex)]
    hide: Option<Regex>,

    /// Percentage of best and worst cases averaged by --metrics.
    #[clap(
        long,
        default_value_t = METRICS_PERCENT_DEFAULT,
        value_parser = clap::value_parser!(u8).range(0..=100),
    )]
    percent: u8,

    /// With --report, print metrics sorted by these keys;
    /// "totalrequest" (alias "totaltime") or "mount".
    /// For example, "totalrequest,mount".
    #[clap(
        long,
        default_value = "totalrequest",
        value_delimiter = ',',
        value_parser = cli_parse_metric_key,
        verbatim_doc_comment,
    )]
    metrics: Vec<MetricKey>,

    /// With --report, derive a missing mount time from reconfigure tasks
    /// then host task time, or from reconfigure tasks only.
    #[clap(
        long = "mount-fallback",
        value_enum,
        default_value_t = MountFallback::default(),
        verbatim_doc_comment,
    )]
    mount_fallback: MountFallback,

    /// Print a summary of each pass to stderr when done.
    #[clap(short, long)]
    summary: bool,
}

/// `clap` argument parser for `--after`.
fn cli_parse_after(data: &str) -> std::result::Result<DateTimeL, String> {
    datetime_parse_after(data)
}

/// `clap` argument parser for `--find` and `--hide`.
fn cli_parse_regex(data: &str) -> std::result::Result<Regex, String> {
    Regex::new(data).map_err(|err| format!("invalid regular expression {:?}; {}", data, err))
}

/// `clap` argument parser for `--metrics`.
fn cli_parse_metric_key(data: &str) -> std::result::Result<MetricKey, String> {
    data.parse::<MetricKey>()
}

/// The processed command-line arguments.
#[derive(Debug)]
struct CliConfig {
    path: FPath,
    full: bool,
    report: bool,
    summary: bool,
    percent: u8,
    metrics: Vec<MetricKey>,
    discovery: DiscoveryOptions,
    projection: ProjectionOptions,
    report_options: ReportOptions,
}

/// Transform `CLI_Args` into the typed option structs of the passes.
fn cli_process_args(args: CLI_Args) -> CliConfig {
    defn!("{:?}", args);
    let (hide_jobs, hide_sql, hide_ntlm) = match args.neat {
        true => (true, true, true),
        false => (args.hide_jobs, args.hide_sql, args.hide_ntlm),
    };
    let find: Option<Regex> = match args.detect_errors {
        // the constant pattern is known to be valid
        true => Regex::new(PATTERN_DETECT_ERRORS).ok(),
        false => args.find,
    };
    let filters = LineFilters {
        hide_sql,
        hide_ntlm,
        hide_debug: args.hide_debug,
        hide: args.hide,
    };
    let config = CliConfig {
        path: args.path,
        full: args.full,
        report: args.report,
        summary: args.summary,
        percent: args.percent,
        metrics: args.metrics,
        discovery: DiscoveryOptions {
            find: find.clone(),
            after: args.after,
            hide_jobs,
        },
        projection: ProjectionOptions {
            find: find.clone(),
            after: args.after,
            hide_jobs,
            only_msg: args.only_msg,
            filters,
        },
        report_options: ReportOptions {
            find,
            after: args.after,
            mount_fallback: args.mount_fallback,
        },
    };
    defx!("{:?}", config);

    config
}

/// Print the selected flags to stderr.
fn print_selected_flags(config: &CliConfig) {
    let after: String = match &config.projection.after {
        Some(after) => after.format(CLI_AFTER_PATTERN).to_string(),
        None => String::new(),
    };
    eprintln!("Show full requests/jobs: {}", config.full);
    eprintln!("Show background job lines: {}", !config.projection.hide_jobs);
    eprintln!("Show SQL lines: {}", !config.projection.filters.hide_sql);
    eprintln!("Show NTLM lines: {}", !config.projection.filters.hide_ntlm);
    eprintln!("Show DEBUG lines: {}", !config.projection.filters.hide_debug);
    eprintln!("Show lines after: {}", after);
}

fn find_str(find: &Option<Regex>) -> &str {
    match find {
        Some(regex) => regex.as_str(),
        None => "",
    }
}

// --------------------
// signal handling

lazy_static! {
    /// Transient directory of an extracted zip archive.
    /// Must be lazy static (global) so that it may be removed from the
    /// `ctrlc::set_handler` signal handler.
    static ref ARCHIVE_DIR: RwLock<Option<PathBuf>> = RwLock::new(None);
}

/// set a process signal handler
pub fn set_signal_handler() -> anyhow::Result<(), ctrlc::Error> {
    defn!();
    ctrlc::set_handler(move || {
        defn!();
        // remove the transient directory
        // (the entire reason this signal handler had to be implemented)
        if let Ok(archive_dir) = ARCHIVE_DIR.read() {
            if let Some(dir) = archive_dir.as_ref() {
                if let Err(err) = std::fs::remove_dir_all(dir) {
                    e_wrn!("failed to remove directory {:?}; {}", dir, err);
                }
            }
        }
        defx!("exit {}", EXIT_ERR);
        std::process::exit(EXIT_ERR as i32);
    })?;
    defx!();

    Ok(())
}

fn archive_dir_set(dir: Option<PathBuf>) {
    match ARCHIVE_DIR.write() {
        Ok(mut archive_dir) => {
            *archive_dir = dir;
        }
        Err(_err) => {
            defo!("ARCHIVE_DIR.write() failed {}", _err);
        }
    }
}

// --------------------
// processing

/// Run the passes, printing filtered lines or report rows to `writer`.
/// Returns the process exit value.
fn run<W: Write>(
    config: &CliConfig,
    writer: &mut W,
) -> std::io::Result<u8> {
    defn!();
    print_selected_flags(config);

    // removes the transient directory when dropped
    let mut extraction: Option<ArchiveExtraction> = None;
    let path: FPath = match is_zip(&config.path) {
        true => {
            let dir = Path::new(ARCHIVE_OUTPUT_DIR);
            if dir.exists() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("directory {:?} already exists; remove it to extract {:?}", ARCHIVE_OUTPUT_DIR, config.path),
                ));
            }
            archive_dir_set(Some(dir.to_path_buf()));
            let extraction_ = extract_zip(&config.path, dir)?;
            eprintln!("Extracted {} log files from {:?}", extraction_.members().len(), basename(&config.path));
            let joined = extraction_.joined_fpath();
            extraction = Some(extraction_);
            joined
        }
        false => config.path.clone(),
    };

    eprintln!("Opening file: {}", path);
    let mut linereader = LineReader::open(&path)?;
    match linereader.filesz() {
        Some(filesz) => eprintln!("The file is {} bytes long", filesz),
        None => eprintln!("Unable to determine file size"),
    }

    let mut summaries: Vec<SummaryPass> = Vec::with_capacity(2);

    let ret: u8 = if config.report {
        let (reports, summary) = build_reports(&mut linereader, &config.report_options)?;
        summaries.push(summary);
        if reports.is_empty() {
            e_err!("Found 0 request reports");
            EXIT_USAGE
        } else {
            write_report(writer, &reports)?;
            for key in config.metrics.iter() {
                let rows = compute_metrics(&reports, *key, config.percent)?;
                write_metrics(writer, &rows)?;
            }
            EXIT_OK
        }
    } else {
        let mut request_ids = RequestIdSet::new();
        let mut after_passed_at = None;
        let mut found: bool = true;
        if config.full && config.discovery.find.is_some() {
            let result = discover(&mut linereader, &config.discovery)?;
            eprintln!(
                "Found {} lines matching {:?}",
                result.summary.request_ids_candidates,
                find_str(&config.discovery.find)
            );
            summaries.push(result.summary);
            if result.request_ids.is_empty() {
                e_err!("Found 0 request identifiers for {:?}", find_str(&config.discovery.find));
                found = false;
            } else {
                linereader.rewind()?;
                request_ids = result.request_ids;
                after_passed_at = result.after_passed_at;
            }
        } else if config.full {
            eprintln!("Not printing --full requests, skipping request collection phase");
        }
        if found {
            let summary = project(&mut linereader, &config.projection, &request_ids, after_passed_at, writer)?;
            summaries.push(summary);
            EXIT_OK
        } else {
            EXIT_USAGE
        }
    };

    if config.summary {
        print_summary(&summaries);
    }
    if let Some(mut extraction) = extraction.take() {
        extraction.remove()?;
        archive_dir_set(None);
    }
    defx!("return {}", ret);

    Ok(ret)
}

/// The process exit value of the result of [`run`].
fn exit_value(result: std::io::Result<u8>) -> u8 {
    match result {
        Ok(ret) => ret,
        Err(err) if err.kind() == ErrorKind::BrokenPipe => {
            // stdout was closed early, e.g. `avmlog … | head`
            EXIT_OK
        }
        Err(err) => {
            e_err!("{}", err);
            match err_is_usage(&err) {
                true => EXIT_USAGE,
                false => EXIT_ERR,
            }
        }
    }
}

/// Process the user-passed command-line arguments.
/// Run the passes.
/// Determine a process return code.
pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!("allocator {:?}", ALLOCATOR_CHOSEN);

    let args = CLI_Args::parse();
    let config = cli_process_args(args);

    if let Err(err) = set_signal_handler() {
        e_wrn!("failed to set signal handler; {}", err);
    }

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let ret: u8 = exit_value(run(&config, &mut writer));
    let _ = std::io::stderr().flush();
    defx!("exit {}", ret);

    ExitCode::from(ret)
}

// --------------------
// tests

#[cfg(test)]
mod tests {
    use super::*;

    use ::test_case::test_case;

    fn parse(args: &[&str]) -> std::result::Result<CLI_Args, clap::Error> {
        CLI_Args::try_parse_from(args)
    }

    #[test]
    fn test_cli_defaults() {
        let args = parse(&["avmlog", "production.log"]).unwrap();
        assert_eq!(args.path, "production.log");
        assert_eq!(args.percent, METRICS_PERCENT_DEFAULT);
        assert_eq!(args.metrics, vec![MetricKey::TotalRequest]);
        assert!(args.after.is_none());
        assert_eq!(args.mount_fallback, MountFallback::ReconfigureHostTask);
    }

    #[test]
    fn test_cli_missing_path() {
        let err = parse(&["avmlog"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test_case("--hide-jobs"; "dash")]
    #[test_case("--hide_jobs"; "underscore")]
    fn test_cli_hide_jobs_alias(flag: &str) {
        let args = parse(&["avmlog", flag, "a.log"]).unwrap();
        assert!(args.hide_jobs);
    }

    #[test]
    fn test_cli_only_msg_alias() {
        let args = parse(&["avmlog", "--only_msg", "a.log"]).unwrap();
        assert!(args.only_msg);
    }

    #[test_case("0", true)]
    #[test_case("100", true)]
    #[test_case("101", false)]
    #[test_case("-1", false)]
    #[test_case("ten", false)]
    fn test_cli_percent(percent: &str, ok: bool) {
        let result = parse(&["avmlog", "--percent", percent, "a.log"]);
        assert_eq!(result.is_ok(), ok, "{:?}", result);
    }

    #[test]
    fn test_cli_metrics_list() {
        let args = parse(&["avmlog", "--report", "--metrics", "totaltime,mount", "a.log"]).unwrap();
        assert_eq!(args.metrics, vec![MetricKey::TotalRequest, MetricKey::Mount]);
    }

    #[test]
    fn test_cli_metrics_bad() {
        let err = parse(&["avmlog", "--metrics", "speed", "a.log"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test_case("2015-10-19 09:00:00", true)]
    #[test_case("2015-10-19T09:00:00", false)]
    #[test_case("yesterday", false)]
    fn test_cli_after(after: &str, ok: bool) {
        let result = parse(&["avmlog", "--after", after, "a.log"]);
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn test_cli_find_bad_regex() {
        let err = parse(&["avmlog", "--find", "(unclosed", "a.log"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_cli_process_args_neat() {
        let args = parse(&["avmlog", "--neat", "a.log"]).unwrap();
        let config = cli_process_args(args);
        assert!(config.discovery.hide_jobs);
        assert!(config.projection.hide_jobs);
        assert!(config.projection.filters.hide_sql);
        assert!(config.projection.filters.hide_ntlm);
        assert!(!config.projection.filters.hide_debug);
    }

    #[test]
    fn test_cli_process_args_detect_errors_overrides_find() {
        let args = parse(&["avmlog", "--find", "bob", "--detect-errors", "a.log"]).unwrap();
        let config = cli_process_args(args);
        assert_eq!(find_str(&config.discovery.find), PATTERN_DETECT_ERRORS);
        assert_eq!(find_str(&config.projection.find), PATTERN_DETECT_ERRORS);
        assert_eq!(find_str(&config.report_options.find), PATTERN_DETECT_ERRORS);
    }

    #[test]
    fn test_cli_mount_fallback() {
        let args = parse(&["avmlog", "--mount-fallback", "reconfigure", "a.log"]).unwrap();
        assert_eq!(args.mount_fallback, MountFallback::Reconfigure);
    }

    // run

    /// One `user-login` request with an asynchronous mount, one `volumes`
    /// request, and a job error.
    const LOG_RUN: &str = "\
[2021-03-01 10:00:00 UTC] P11A1 INFO Started GET \"/user-login?workstation=WS1&username=ann&\" for 10.1.1.1
[2021-03-01 10:00:00 UTC] P22A1 INFO Started POST \"/volumes\" for 10.1.1.2
[2021-03-01 10:00:01 UTC] P11A1 INFO Volumes will be mounted asynchronously
[2021-03-01 10:00:02 UTC] P22A1 ERROR Unable to attach volume 7
  from /app/volumes.rb:12
[2021-03-01 10:00:02 UTC] P33DJ1 ERROR Failed to clean up
[2021-03-01 10:00:03 UTC] P11A1 INFO Completed 200 OK in 20.0ms (Views: 5.0ms | ActiveRecord: 4.0ms)
[2021-03-01 10:00:03 UTC] P11A1RA INFO Async completed for ATTACH volumes on machine vm1 with 1 volumes mounted in 3.0 seconds
[2021-03-01 10:00:04 UTC] P22A1 INFO Completed 200 OK in 30.0ms (Views: 6.0ms | ActiveRecord: 8.0ms)
";

    /// Only a `volumes` request; nothing qualifies for metrics.
    const LOG_RUN_NO_METRICS: &str = "\
[2021-03-01 10:00:00 UTC] P22A1 INFO Started POST \"/volumes\" for 10.1.1.2
[2021-03-01 10:00:04 UTC] P22A1 INFO Completed 200 OK in 30.0ms (Views: 6.0ms | ActiveRecord: 8.0ms)
";

    fn log_file(data: &str) -> ::tempfile::NamedTempFile {
        let mut ntf = ::tempfile::Builder::new()
            .prefix("tmp-avmlog-run-")
            .suffix(".log")
            .tempfile()
            .unwrap();
        ntf.write_all(data.as_bytes()).unwrap();
        ntf.flush().unwrap();

        ntf
    }

    /// Parse `args` followed by `path`, run, return the exit value and the
    /// output.
    fn run_args(
        args: &[&str],
        path: &str,
    ) -> (u8, String) {
        let mut argv: Vec<&str> = vec!["avmlog"];
        argv.extend_from_slice(args);
        argv.push(path);
        let config = cli_process_args(parse(&argv).unwrap());
        let mut output: Vec<u8> = Vec::new();
        let ret = exit_value(run(&config, &mut output));

        (ret, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_run_full_detect_errors() {
        let ntf = log_file(LOG_RUN);
        let path = ntf.path().to_str().unwrap();
        let (ret, output) = run_args(&["--full", "--detect-errors", "--hide-jobs"], path);
        assert_eq!(ret, EXIT_OK);
        assert_eq!(output.lines().count(), 4, "{}", output);
        assert!(output.contains("  from /app/volumes.rb:12\n"));
        assert!(!output.contains("P33DJ1"));
    }

    #[test]
    fn test_run_full_twice_same_output() {
        let ntf = log_file(LOG_RUN);
        let path = ntf.path().to_str().unwrap();
        let args = ["--full", "--find", "ERROR", "--neat", "--hide-debug"];
        let (ret1, output1) = run_args(&args, path);
        let (ret2, output2) = run_args(&args, path);
        assert_eq!(ret1, EXIT_OK);
        assert_eq!(ret2, EXIT_OK);
        assert!(!output1.is_empty());
        assert_eq!(output1, output2);
    }

    #[test_case(&["--full", "--find", "ERROR"]; "full")]
    #[test_case(&["--report"]; "report")]
    fn test_run_after_future_exit_usage(args: &[&str]) {
        let ntf = log_file(LOG_RUN);
        let path = ntf.path().to_str().unwrap();
        let mut args: Vec<&str> = args.to_vec();
        args.extend_from_slice(&["--after", "2030-01-01 00:00:00"]);
        let (ret, output) = run_args(&args, path);
        assert_eq!(ret, EXIT_USAGE);
        assert!(output.is_empty(), "{:?}", output);
    }

    #[test]
    fn test_run_full_find_nothing_exit_usage() {
        let ntf = log_file(LOG_RUN);
        let path = ntf.path().to_str().unwrap();
        let (ret, output) = run_args(&["--full", "--find", "no such text"], path);
        assert_eq!(ret, EXIT_USAGE);
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_report_default_metrics() {
        let ntf = log_file(LOG_RUN);
        let path = ntf.path().to_str().unwrap();
        let (ret, output) = run_args(&["--report"], path);
        assert_eq!(ret, EXIT_OK);
        let lines: Vec<&str> = output.lines().collect();
        // report header, 2 rows, metrics header, 5 metrics rows
        assert_eq!(lines.len(), 9, "{}", output);
        assert!(lines[0].starts_with("RequestID, "));
        assert!(lines[1].starts_with("P11A1, GET, /user-login, WS1, ann, 200, "));
        assert!(lines[3].starts_with("Cases, "));
        assert!(lines[4].starts_with("Best case, "));
    }

    #[test]
    fn test_run_report_no_metrics_records_exit_err() {
        let ntf = log_file(LOG_RUN_NO_METRICS);
        let path = ntf.path().to_str().unwrap();
        let (ret, output) = run_args(&["--report"], path);
        assert_eq!(ret, EXIT_ERR);
        // the report rows precede the failed metrics
        assert_eq!(output.lines().count(), 2, "{}", output);
    }

    #[test]
    fn test_run_missing_file_exit_err() {
        let tmpdir = ::tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("missing.log");
        let (ret, output) = run_args(&[], path.to_str().unwrap());
        assert_eq!(ret, EXIT_ERR);
        assert!(output.is_empty());
    }

    #[test]
    fn test_exit_value() {
        assert_eq!(exit_value(Ok(EXIT_USAGE)), EXIT_USAGE);
        assert_eq!(exit_value(Err(Error::new(ErrorKind::BrokenPipe, "closed"))), EXIT_OK);
        assert_eq!(exit_value(Err(Error::new(ErrorKind::InvalidInput, "bad"))), EXIT_USAGE);
        assert_eq!(exit_value(Err(Error::new(ErrorKind::InvalidData, "bad"))), EXIT_ERR);
    }
}
