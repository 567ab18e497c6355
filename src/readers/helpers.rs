// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use std;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    FPath,
    FileCompression,
    FileSz,
};

/// Suffix of gzip files. Compared case-sensitive.
pub const SUFFIX_GZ: &str = ".gz";
/// Extension of zip archives. Compared case-insensitive.
pub const EXTENSION_ZIP: &str = "zip";

/// Return the basename of an `FPath`.
pub fn basename(path: &FPath) -> FPath {
    let mut riter = path.rsplit(std::path::MAIN_SEPARATOR);

    FPath::from(riter.next().unwrap_or(""))
}

/// Helper function for a slightly annoying set of calls.
pub fn path_to_fpath(path: &std::path::Path) -> FPath {
    // `PathBuf` to `String` https://stackoverflow.com/q/37388107/471376
    (*(path.to_string_lossy())).to_string()
}

/// Helper function for completeness.
pub fn fpath_to_path(path: &FPath) -> &std::path::Path {
    std::path::Path::new(path)
}

/// Return the size of the file.
pub fn path_filesz(path: &std::path::Path) -> Option<FileSz> {
    defn!("({:?})", path);
    let metadata = match std::fs::metadata(path) {
        Ok(val) => val,
        Err(_err) => {
            defx!("error {}, return None", _err);
            return None;
        }
    };
    let len: FileSz = metadata.len();
    defx!("return {}", len);

    Some(len)
}

/// Is the file gzip compressed? Only the literal `.gz` suffix is checked.
pub fn is_gzip(path: &FPath) -> bool {
    path.ends_with(SUFFIX_GZ)
}

/// Is the file a zip archive? The `.zip` extension is checked ignoring case.
pub fn is_zip(path: &FPath) -> bool {
    match fpath_to_path(path).extension() {
        Some(ext) => ext
            .to_string_lossy()
            .eq_ignore_ascii_case(EXTENSION_ZIP),
        None => false,
    }
}

/// The `FileCompression` of the file, by name.
pub fn path_compression(path: &FPath) -> FileCompression {
    match is_gzip(path) {
        true => FileCompression::Gz,
        false => FileCompression::Normal,
    }
}
