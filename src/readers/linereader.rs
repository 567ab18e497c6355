// src/readers/linereader.rs

//! Implements a [`LineReader`], a restartable sequence of text lines read
//! from a plain or gzip compressed file.
//!
//! Lines longer than a maximum size keep only their first bytes, see
//! [`LINE_SZ_MAX`]. The end-of-line bytes `"\n"` or `"\r\n"` are not part of
//! a returned line.
//!
//! [`LINE_SZ_MAX`]: crate::common::LINE_SZ_MAX

use crate::common::{
    err_from_err_path,
    Count,
    FPath,
    File,
    FileCompression,
    FileSz,
    CRu8,
    NLu8,
    LINE_SZ_MAX,
};
use crate::readers::helpers::{fpath_to_path, path_compression, path_filesz};

use std::fmt;
use std::io::{BufRead, BufReader, Error, ErrorKind, Read, Result, Seek, SeekFrom};

use ::flate2::read::MultiGzDecoder;
use ::memchr::memchr;
use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Capacity of the `BufReader` of a `LineReader`.
pub const LINEREADER_BUFSZ: usize = 0x10000;

/// The underlying buffered reader of a [`LineReader`].
enum LineSource<R: Read + Seek> {
    Normal(BufReader<R>),
    /// All members of a multi-member gzip stream are read.
    Gz(BufReader<MultiGzDecoder<R>>),
}

impl<R: Read + Seek> LineSource<R> {
    fn new(
        reader: R,
        compression: FileCompression,
    ) -> LineSource<R> {
        match compression {
            FileCompression::Normal => LineSource::Normal(BufReader::with_capacity(LINEREADER_BUFSZ, reader)),
            FileCompression::Gz => {
                LineSource::Gz(BufReader::with_capacity(LINEREADER_BUFSZ, MultiGzDecoder::new(reader)))
            }
        }
    }

    fn bufread(&mut self) -> &mut dyn BufRead {
        match self {
            LineSource::Normal(bufreader) => bufreader,
            LineSource::Gz(bufreader) => bufreader,
        }
    }

    /// Return the underlying reader, dropping any decoder and buffered data.
    fn into_inner(self) -> R {
        match self {
            LineSource::Normal(bufreader) => bufreader.into_inner(),
            LineSource::Gz(bufreader) => bufreader.into_inner().into_inner(),
        }
    }
}

/// Append `data` to `buffer`, at most up to `max` bytes in total.
/// Returns `true` if some of `data` did not fit.
fn extend_limited(
    buffer: &mut Vec<u8>,
    data: &[u8],
    max: usize,
) -> bool {
    let room: usize = max.saturating_sub(buffer.len());
    if data.len() > room {
        buffer.extend_from_slice(&data[..room]);
        return true;
    }
    buffer.extend_from_slice(data);

    false
}

/// Statistics of one pass of a [`LineReader`], for CLI option `--summary`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryLineReader {
    /// lines returned
    pub linereader_lines: Count,
    /// bytes read, after decompression, including end-of-line bytes
    pub linereader_bytes: Count,
    /// physical lines longer than `linereader_line_sz_max`
    pub linereader_lines_truncated: Count,
    pub linereader_line_sz_max: usize,
}

/// A `LineReader` reads text lines from a plain or gzip compressed reader.
///
/// A `LineReader` may be rewound to the first line, see
/// [`LineReader::rewind`], which resets the per-pass counters.
pub struct LineReader<R: Read + Seek> {
    /// `None` only during a `rewind`
    source: Option<LineSource<R>>,
    compression: FileCompression,
    /// path of the file, for error messages; may be empty
    path: FPath,
    /// total size in bytes of the (decompressed) data, if known
    filesz: Option<FileSz>,
    line_sz_max: usize,
    /// bytes of the current line
    buffer: Vec<u8>,
    /// text of the current line
    line: String,
    lines: Count,
    bytes: Count,
    lines_truncated: Count,
    /// the end of the data was reached during this pass
    eof: bool,
}

impl<R: Read + Seek> fmt::Debug for LineReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LineReader")
            .field("path", &self.path)
            .field("compression", &self.compression)
            .field("filesz", &self.filesz)
            .field("line_sz_max", &self.line_sz_max)
            .field("lines", &self.lines)
            .field("bytes", &self.bytes)
            .field("lines_truncated", &self.lines_truncated)
            .field("eof", &self.eof)
            .finish()
    }
}

impl LineReader<File> {
    /// Open the file at `path`. A `.gz` file is decompressed.
    pub fn open(path: &FPath) -> Result<LineReader<File>> {
        defn!("({:?})", path);
        let file: File = match File::open(fpath_to_path(path)) {
            Ok(val) => val,
            Err(err) => {
                defx!("File::open({:?}) error {}", path, err);
                return Err(err_from_err_path(&err, path, Some("cannot open file")));
            }
        };
        let compression = path_compression(path);
        // the decompressed size of a gzip file is known after the first pass
        let filesz: Option<FileSz> = match compression {
            FileCompression::Normal => path_filesz(fpath_to_path(path)),
            FileCompression::Gz => None,
        };
        let mut linereader = LineReader::new(file, compression, filesz);
        linereader.path = path.clone();
        defx!("{:?}", linereader);

        Ok(linereader)
    }
}

impl<R: Read + Seek> LineReader<R> {
    /// Create a `LineReader` for `reader` with the default maximum line size
    /// [`LINE_SZ_MAX`].
    pub fn new(
        reader: R,
        compression: FileCompression,
        filesz: Option<FileSz>,
    ) -> LineReader<R> {
        LineReader::with_line_sz_max(reader, compression, filesz, LINE_SZ_MAX)
    }

    /// Create a `LineReader` that keeps at most `line_sz_max` bytes of a line.
    pub fn with_line_sz_max(
        reader: R,
        compression: FileCompression,
        filesz: Option<FileSz>,
        line_sz_max: usize,
    ) -> LineReader<R> {
        LineReader {
            source: Some(LineSource::new(reader, compression)),
            compression,
            path: FPath::new(),
            filesz,
            line_sz_max,
            buffer: Vec::with_capacity(1024),
            line: String::with_capacity(1024),
            lines: 0,
            bytes: 0,
            lines_truncated: 0,
            eof: false,
        }
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }

    pub const fn compression(&self) -> FileCompression {
        self.compression
    }

    /// Total size in bytes of the (decompressed) data, if known.
    pub const fn filesz(&self) -> Option<FileSz> {
        self.filesz
    }

    /// Lines returned during this pass.
    pub const fn lines_processed(&self) -> Count {
        self.lines
    }

    /// Bytes read during this pass.
    pub const fn bytes_processed(&self) -> Count {
        self.bytes
    }

    /// Physical lines truncated during this pass.
    pub const fn lines_truncated(&self) -> Count {
        self.lines_truncated
    }

    pub const fn line_sz_max(&self) -> usize {
        self.line_sz_max
    }

    fn err_source(&self) -> Error {
        Error::new(
            ErrorKind::Other,
            format!("LineReader has no reader for {:?}; a prior rewind failed", self.path),
        )
    }

    /// Read the next physical line into `self.buffer`.
    ///
    /// Bytes of the line beyond `self.line_sz_max` are discarded.
    /// Returns `false` at the end of data.
    fn read_line_bytes(&mut self) -> Result<bool> {
        let err_source = self.err_source();
        let bufread: &mut dyn BufRead = match self.source.as_mut() {
            Some(source) => source.bufread(),
            None => return Err(err_source),
        };
        self.buffer.clear();
        let mut found: bool = false;
        let mut truncated: bool = false;
        // a CR at the end of a chunk; end-of-line only if the next byte is LF
        let mut cr_pending: bool = false;
        loop {
            let available: &[u8] = match bufread.fill_buf() {
                Ok(val) => val,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err_from_err_path(&err, &self.path, Some("read failed"))),
            };
            if available.is_empty() {
                self.eof = true;
                break;
            }
            found = true;
            let (consume, line_end) = match memchr(NLu8, available) {
                Some(at) => (at + 1, true),
                None => (available.len(), false),
            };
            let mut data: &[u8] = match line_end {
                true => &available[..consume - 1],
                false => &available[..consume],
            };
            if cr_pending && !(line_end && data.is_empty()) {
                truncated |= extend_limited(&mut self.buffer, &[CRu8], self.line_sz_max);
            }
            cr_pending = false;
            if let Some((&CRu8, rest)) = data.split_last() {
                data = rest;
                cr_pending = !line_end;
            }
            truncated |= extend_limited(&mut self.buffer, data, self.line_sz_max);
            bufread.consume(consume);
            self.bytes += consume as Count;
            if line_end {
                break;
            }
        }
        if !found {
            return Ok(false);
        }
        if cr_pending {
            // last line without LF ends with CR
            truncated |= extend_limited(&mut self.buffer, &[CRu8], self.line_sz_max);
        }
        debug_assert_le!(self.buffer.len(), self.line_sz_max);
        if truncated {
            self.lines_truncated += 1;
        }
        self.lines += 1;

        Ok(true)
    }

    /// Return the next line, or `None` at the end of data.
    ///
    /// Invalid UTF-8 is replaced with `U+FFFD`.
    pub fn next_line(&mut self) -> Result<Option<&str>> {
        if !self.read_line_bytes()? {
            return Ok(None);
        }
        self.line.clear();
        self.line.push_str(&String::from_utf8_lossy(&self.buffer));

        Ok(Some(self.line.as_str()))
    }

    /// Read all remaining lines into memory.
    pub fn read_all_lines(&mut self) -> Result<Vec<String>> {
        let mut lines: Vec<String> = Vec::new();
        while let Some(line) = self.next_line()? {
            lines.push(String::from(line));
        }

        Ok(lines)
    }

    /// Return to the first line.
    ///
    /// The underlying reader is seeked to the start and, for gzip data, a new
    /// decoder is created. The per-pass counters are reset.
    /// If the prior pass read all data then the total size becomes known.
    pub fn rewind(&mut self) -> Result<()> {
        defn!("{:?}", self);
        if self.eof && self.filesz.is_none() {
            self.filesz = Some(self.bytes);
        }
        let mut reader: R = match self.source.take() {
            Some(source) => source.into_inner(),
            None => return Err(self.err_source()),
        };
        if let Err(err) = reader.seek(SeekFrom::Start(0)) {
            defx!("seek error {}", err);
            return Err(err_from_err_path(&err, &self.path, Some("cannot rewind file")));
        }
        self.source = Some(LineSource::new(reader, self.compression));
        self.lines = 0;
        self.bytes = 0;
        self.lines_truncated = 0;
        self.eof = false;
        defx!();

        Ok(())
    }

    /// Statistics of the current pass.
    pub fn summary(&self) -> SummaryLineReader {
        SummaryLineReader {
            linereader_lines: self.lines,
            linereader_bytes: self.bytes,
            linereader_lines_truncated: self.lines_truncated,
            linereader_line_sz_max: self.line_sz_max,
        }
    }
}
