// src/readers/mod.rs

//! "Readers" for _avmloglib_.
//!
//! ## Overview of readers
//!
//! * A [`LineReader`] reads lines from a plain or gzip compressed file and
//!   may be rewound to read them again.
//! * The discovery pass, [`discover`], drives a `LineReader` to find the
//!   qualifying request tokens.
//! * The projection pass, [`project`], drives a `LineReader` to print the
//!   lines of the spans of qualifying requests.
//! * The report pass, [`build_reports`], drives a `LineReader` to build
//!   [`RequestReport`s].
//! * A zip archive of log files is first joined into one log file by
//!   [`extract_zip`].
//!
//! <br/>
//!
//! Also see [_Definitions of data_].
//!
//! [_Definitions of data_]: crate::data
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`discover`]: crate::readers::discoveryprocessor::discover
//! [`project`]: crate::readers::projectionprocessor::project
//! [`build_reports`]: crate::readers::reportprocessor::build_reports
//! [`extract_zip`]: crate::readers::archivereader::extract_zip
//! [`RequestReport`s]: crate::data::report::RequestReport

pub mod archivereader;
pub mod discoveryprocessor;
pub mod filters;
pub mod helpers;
pub mod linereader;
pub mod projectionprocessor;
pub mod reportprocessor;
pub mod summary;
