// src/tests/common.rs

//! Shared log data and helpers for tests.

use crate::common::FileCompression;
use crate::readers::linereader::LineReader;

use std::io::Cursor;

/// Two foreground requests, `P100A1` and `P200A2`, and one background job
/// `P300DJ4`, interleaved, with untokened continuation lines.
///
/// | index | token     | content                  |
/// |-------|-----------|--------------------------|
/// | 0     | `P100A1`  | route start `user-login` |
/// | 1     | `P100A1`  | SQL                      |
/// | 2     | `P200A2`  | route start `volumes`    |
/// | 3     | `P100A1`  | `ERROR`                  |
/// | 4     |           | continuation             |
/// | 5     | `P300DJ4` | job                      |
/// | 6     | `P200A2`  | completed                |
/// | 7     |           | continuation             |
/// | 8     | `P100A1`  | completed                |
/// | 9     | `P300DJ4` | `ERROR`                  |
pub const LOG_SAMPLE: &str = "\
[2020-01-01 00:00:01 UTC] P100A1 INFO Started GET \"/user-login?workstation=HOST1&username=alice&\" for 10.0.0.1
[2020-01-01 00:00:01 UTC] P100A1 DEBUG  SQL (0.5ms) SELECT * FROM users
[2020-01-01 00:00:02 UTC] P200A2 INFO Started GET \"/volumes\" for 10.0.0.2
[2020-01-01 00:00:02 UTC] P100A1 ERROR Unable to find volume 42
  continuation of P100A1 error
[2020-01-01 00:00:03 UTC] P300DJ4 INFO Processing job
[2020-01-01 00:00:03 UTC] P200A2 INFO Completed 200 OK in 5.0ms (Views: 1.0ms | ActiveRecord: 1.0ms)
  continuation of P200A2
[2020-01-01 00:00:04 UTC] P100A1 INFO Completed 200 OK in 12.5ms (Views: 3.0ms | ActiveRecord: 2.0ms)
[2020-01-01 00:00:05 UTC] P300DJ4 ERROR Failed job
";

/// Lines of [`LOG_SAMPLE`].
pub fn log_sample_lines() -> Vec<&'static str> {
    LOG_SAMPLE.lines().collect()
}

/// A `LineReader` of in-memory plain text `data`.
pub fn linereader_from_str(data: &str) -> LineReader<Cursor<Vec<u8>>> {
    let bytes: Vec<u8> = data.as_bytes().to_vec();
    let len = bytes.len() as u64;

    LineReader::new(Cursor::new(bytes), FileCompression::Normal, Some(len))
}

/// A `LineReader` of in-memory gzip compressed `data`.
pub fn linereader_from_gz_bytes(data: Vec<u8>) -> LineReader<Cursor<Vec<u8>>> {
    LineReader::new(Cursor::new(data), FileCompression::Gz, None)
}

/// The lines of `LOG_SAMPLE` at `indexes`, each followed by a newline.
pub fn log_sample_output(indexes: &[usize]) -> String {
    let lines = log_sample_lines();
    let mut output = String::new();
    for index in indexes.iter() {
        output.push_str(lines[*index]);
        output.push('\n');
    }

    output
}
