// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

use std::io::{Error, ErrorKind};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling, command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::fs::File;

// TODO: use `std::path::Path` for `FPath`
/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
/// File size in bytes
pub type FileSz = u64;
/// A general-purpose counter
pub type Count = u64;
/// Index of a line within a file, zero-based
pub type LineIndex = u64;

/// The global allocator chosen at compile-time by feature flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AllocatorChosen {
    /// Rust's default allocator
    System,
    /// tikv-jemallocator
    Jemalloc,
    /// mimalloc
    Mimalloc,
}

/// Process exit value for success.
pub const EXIT_OK: u8 = 0;
/// Process exit value for fatal errors, e.g. I/O errors.
pub const EXIT_ERR: u8 = 1;
/// Process exit value for usage errors, e.g. bad arguments or nothing found.
pub const EXIT_USAGE: u8 = 2;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lines and LineReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Maximum bytes of one line kept by a [`LineReader`]. Bytes of a physical
/// line beyond this are discarded.
///
/// [`LineReader`]: crate::readers::linereader::LineReader
pub const LINE_SZ_MAX: usize = 65536;

/// Single-byte newLine char as u8
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;
/// Carriage return char as u8
#[allow(non_upper_case_globals)]
pub const CRu8: u8 = 13;

/// Compression of a log file, determined by file name.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FileCompression {
    /// plain text
    #[default]
    Normal,
    /// gzip, `.gz`
    Gz,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Create a new `Error` of the same `ErrorKind` as `error` with a message
/// that includes the `fpath` and optional `mesg`.
pub fn err_from_err_path(error: &Error, fpath: &FPath, mesg: Option<&str>) -> Error {
    match mesg {
        Some(mesg_) => Error::new(error.kind(), format!("{} for file {:?}; {}", error, fpath, mesg_)),
        None => Error::new(error.kind(), format!("{} for file {:?}", error, fpath)),
    }
}

/// Returns `true` if the `Error` is a user-caused problem (bad arguments,
/// bad configuration) as opposed to an I/O problem.
///
/// Used to choose between [`EXIT_USAGE`] and [`EXIT_ERR`].
pub fn err_is_usage(error: &Error) -> bool {
    matches!(error.kind(), ErrorKind::InvalidInput)
}
