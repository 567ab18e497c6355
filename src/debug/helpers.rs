// src/debug/helpers.rs

//! Miscellaneous helper functions for testing.

use crate::common::FPath;

use std::io::Write; // for `NamedTempFile.write_all`

use ::flate2::write::GzEncoder;
use ::flate2::Compression;
use ::lazy_static::lazy_static;
use ::si_trace_print::defñ;

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-avmlog-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
    // there is no `String::default` so create this just once
    static ref STRING_TEMPFILE_SUFFIX: String = String::from("");
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    FPath::from(ntf.path().to_str().unwrap())
}

/// Testing helper function to write a `[u8]` to a specially-named
/// temporary file.
pub fn create_temp_file_with_name(
    data: &[u8],
    prefix: Option<&String>,
    suffix: Option<&String>,
) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        .prefix::<str>(
            prefix
                .unwrap_or(&STRING_TEMPFILE_PREFIX)
                .as_ref(),
        )
        .suffix::<str>(
            suffix
                .unwrap_or(&STRING_TEMPFILE_SUFFIX)
                .as_ref(),
        )
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }
    defñ!("{:?}", ntf.path());

    ntf
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    create_temp_file_with_name(data.as_bytes(), None, None)
}

/// Testing helper function to write a `str` to a temporary file with a specific
/// suffix, e.g. `".log"`.
pub fn create_temp_file_with_suffix(
    data: &str,
    suffix: &String,
) -> NamedTempFile {
    create_temp_file_with_name(data.as_bytes(), None, Some(suffix))
}

/// Testing helper function to write a `str` gzip-compressed to a temporary
/// file with suffix `.log.gz`.
pub fn create_temp_file_gz(data: &str) -> NamedTempFile {
    let bytes = gzip_bytes(data.as_bytes());
    create_temp_file_with_name(&bytes, None, Some(&String::from(".log.gz")))
}

/// Testing helper function to gzip-compress `data`.
pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::<u8>::new(), Compression::default());
    match encoder.write_all(data) {
        Ok(_) => {}
        Err(err) => panic!("GzEncoder::write_all() return Err {}", err),
    }
    match encoder.finish() {
        Ok(val) => val,
        Err(err) => panic!("GzEncoder::finish() return Err {}", err),
    }
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    defñ!();
    ::tempfile::tempdir().unwrap()
}
