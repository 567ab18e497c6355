// src/readers/archivereader.rs

//! Extract the log files of a `.zip` archive and join them into one log file.
//!
//! The archive members are extracted into a transient directory. Members
//! with `.log` in their name are concatenated in sorted name order into one
//! file, [`ARCHIVE_JOINED_NAME`]. The transient directory is removed by
//! [`ArchiveExtraction::remove`] or when the `ArchiveExtraction` is dropped.

use crate::common::{err_from_err_path, FPath, File};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use crate::readers::helpers::{fpath_to_path, path_to_fpath};

use std::io::{BufWriter, Error, ErrorKind, Read, Result, Write};
use std::path::{Path, PathBuf};

use ::itertools::Itertools;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::zip::ZipArchive;

/// Default transient directory, relative to the working directory.
pub const ARCHIVE_OUTPUT_DIR: &str = "output";
/// Name of the joined log file within the transient directory.
pub const ARCHIVE_JOINED_NAME: &str = "production.log";
/// Sub-directory of the transient directory holding extracted members.
pub const ARCHIVE_MEMBERS_DIR: &str = "members";
/// Members with this in their name are joined.
pub const ARCHIVE_LOG_MARKER: &str = ".log";

/// The extracted members of a zip archive and their joined log file.
#[derive(Debug)]
pub struct ArchiveExtraction {
    /// transient directory; removed on `remove` or drop
    dir: PathBuf,
    /// the joined log file
    joined: PathBuf,
    /// extracted log members, sorted; these were joined
    members: Vec<PathBuf>,
    removed: bool,
}

impl ArchiveExtraction {
    pub fn dir(&self) -> &Path {
        self.dir.as_path()
    }

    pub fn joined_path(&self) -> &Path {
        self.joined.as_path()
    }

    pub fn joined_fpath(&self) -> FPath {
        path_to_fpath(self.joined.as_path())
    }

    pub fn members(&self) -> &[PathBuf] {
        self.members.as_slice()
    }

    /// Remove the transient directory. Removing twice is allowed.
    pub fn remove(&mut self) -> Result<()> {
        if self.removed {
            return Ok(());
        }
        defñ!("remove_dir_all({:?})", self.dir);
        self.removed = true;
        match std::fs::remove_dir_all(&self.dir) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err_from_err_path(
                &err,
                &path_to_fpath(&self.dir),
                Some("cannot remove directory"),
            )),
        }
    }
}

impl Drop for ArchiveExtraction {
    fn drop(&mut self) {
        if let Err(err) = self.remove() {
            e_wrn!("{}", err);
        }
    }
}

/// Is this member name a log file?
pub fn is_log_member(name: &Path) -> bool {
    path_to_fpath(name).contains(ARCHIVE_LOG_MARKER)
}

fn err_zip(
    err: ::zip::result::ZipError,
    path: &FPath,
) -> Error {
    let err = Error::new(ErrorKind::InvalidData, format!("{}", err));

    err_from_err_path(&err, path, Some("cannot read zip archive"))
}

/// Extract zip archive `path` into directory `dir` and join its log members
/// into `dir/production.log`.
///
/// Members with unsafe names, e.g. `../../etc/passwd`, are skipped.
/// An archive without log members is an error of kind `InvalidInput`.
pub fn extract_zip(
    path: &FPath,
    dir: &Path,
) -> Result<ArchiveExtraction> {
    defn!("({:?}, {:?})", path, dir);
    let file: File = match File::open(fpath_to_path(path)) {
        Ok(val) => val,
        Err(err) => {
            defx!("File::open error {}", err);
            return Err(err_from_err_path(&err, path, Some("cannot open file")));
        }
    };
    let mut archive = ZipArchive::new(file).map_err(|err| err_zip(err, path))?;

    let members_dir: PathBuf = dir.join(ARCHIVE_MEMBERS_DIR);
    let dir_fpath: FPath = path_to_fpath(dir);
    std::fs::create_dir_all(&members_dir)
        .map_err(|err| err_from_err_path(&err, &dir_fpath, Some("cannot create directory")))?;
    // from here, `extraction` removes `dir` if returning early
    let mut extraction = ArchiveExtraction {
        dir: dir.to_path_buf(),
        joined: dir.join(ARCHIVE_JOINED_NAME),
        members: Vec::new(),
        removed: false,
    };

    let mut members: Vec<PathBuf> = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| err_zip(err, path))?;
        let name: PathBuf = match entry.enclosed_name() {
            Some(val) => val,
            None => {
                e_wrn!("skip zip member with unsafe name {:?} in {:?}", entry.name(), path);
                continue;
            }
        };
        let outpath: PathBuf = members_dir.join(&name);
        let out_fpath: FPath = path_to_fpath(&outpath);
        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)
                .map_err(|err| err_from_err_path(&err, &out_fpath, Some("cannot create directory")))?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| err_from_err_path(&err, &out_fpath, Some("cannot create directory")))?;
        }
        let mut outfile: File = File::create(&outpath)
            .map_err(|err| err_from_err_path(&err, &out_fpath, Some("cannot create file")))?;
        defo!("extract {:?} to {:?}", name, outpath);
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|err| err_from_err_path(&err, &out_fpath, Some("cannot extract zip member")))?;
        if is_log_member(&name) {
            members.push(outpath);
        }
    }
    extraction.members = members.into_iter().sorted().collect();
    if extraction.members.is_empty() {
        let err = Error::new(ErrorKind::InvalidInput, "no log files in zip archive");
        defx!("{}", err);
        return Err(err_from_err_path(&err, path, None));
    }

    join_files(&extraction.members, &extraction.joined)?;
    defx!("joined {} members into {:?}", extraction.members.len(), extraction.joined);

    Ok(extraction)
}

/// Concatenate `members` into new file `joined`. A newline is appended to a
/// member not ending with one.
pub fn join_files(
    members: &[PathBuf],
    joined: &Path,
) -> Result<()> {
    let joined_fpath: FPath = path_to_fpath(joined);
    let file: File = File::create(joined)
        .map_err(|err| err_from_err_path(&err, &joined_fpath, Some("cannot create file")))?;
    let mut writer = BufWriter::new(file);
    let mut buffer: Vec<u8> = Vec::with_capacity(0x10000);
    for member in members.iter() {
        let member_fpath: FPath = path_to_fpath(member);
        let mut reader: File = File::open(member)
            .map_err(|err| err_from_err_path(&err, &member_fpath, Some("cannot open file")))?;
        buffer.clear();
        reader
            .read_to_end(&mut buffer)
            .map_err(|err| err_from_err_path(&err, &member_fpath, Some("cannot read file")))?;
        writer
            .write_all(&buffer)
            .map_err(|err| err_from_err_path(&err, &joined_fpath, Some("cannot write file")))?;
        if !buffer.is_empty() && buffer.last() != Some(&b'\n') {
            writer
                .write_all(b"\n")
                .map_err(|err| err_from_err_path(&err, &joined_fpath, Some("cannot write file")))?;
        }
    }
    writer
        .flush()
        .map_err(|err| err_from_err_path(&err, &joined_fpath, Some("cannot write file")))?;

    Ok(())
}
