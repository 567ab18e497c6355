// src/printer/mod.rs

//! The `printer` module is for printing the results of the passes;
//! selected log lines, report rows, metrics, progress, and summary
//! statistics.

pub mod printers;
pub mod report;
pub mod summary;
