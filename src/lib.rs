// src/lib.rs

//! _avmloglib_ is the library of the _avmlog_ program.
//!
//! _avmlog_ extracts the log messages of requests from large application
//! log files; plain, gzip `.gz`, or zip `.zip` archives of log files.
//! A discovery pass finds the requests with a line matching a find
//! expression, optionally after a datetime. A projection pass then prints
//! every line of those requests.
//! Alternatively, a report pass prints a timing report row per request
//! and aggregate metrics.
//!
//! See the [`readers`] module for an overview.

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
