// src/data/mod.rs

//! The `data` module is the log line primitives; timestamps, request
//! tokens, field extractors, line events, and the per-request
//! [`RequestReport`] of the report mode.
//!
//! ## Definitions of data
//!
//! ### Line
//!
//! A "line" is the text of one physical log line, without the end-of-line
//! bytes. A line is found by a [`LineReader`].
//!
//! A line may begin with a bracketed UTC timestamp
//! `[2020-01-01 00:00:01 UTC]` followed by a request token, e.g. `P1234A1`.
//! A line without a timestamp is a continuation of the prior line.
//!
//! ### Request token
//!
//! A request token ties a line to one request. Tokens of background jobs,
//! `P<digits>DJ` or `P<digits>PW`, are distinguished from foreground
//! request tokens, see [`is_job`].
//!
//! ### Span
//!
//! A "span" is a tokened line and the following untokened continuation lines.
//!
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`RequestReport`]: crate::data::report::RequestReport
//! [`is_job`]: crate::data::request::is_job

pub mod datetime;
pub mod event;
pub mod fields;
pub mod metrics;
pub mod report;
pub mod request;
