//! Manifest file parsing
//!
//! A manifest lists one image per line as `filename[,duration_ms]`:
//!
//! ```text
//! # opening sequence
//! logo.bmp,4000
//! flames.bmp, 12000
//! stars.bmp
//! ```
//!
//! Lines longer than [`MAX_LINE_LENGTH`] are skipped whole, so a corrupt
//! manifest can never overrun the line buffer.

use embedded_io::Read;
use heapless::Vec;
use povstaff_hal::FsError;

use crate::config::{MAX_FILENAME_LEN, MAX_LINE_LENGTH};

/// Read-ahead chunk size
const CHUNK_SIZE: usize = 64;

/// One parsed manifest line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestRecord<'a> {
    pub filename: &'a str,
    /// `None` when the line gave no duration
    pub duration_ms: Option<u32>,
}

/// Parse a single manifest line
///
/// Returns `None` for blank lines, comments and malformed records.
pub fn parse_record(line: &str) -> Option<ManifestRecord<'_>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (filename, duration) = match line.split_once(',') {
        Some((name, duration)) => (name.trim(), Some(duration.trim())),
        None => (line, None),
    };

    if filename.is_empty() || filename.len() > MAX_FILENAME_LEN {
        return None;
    }

    let duration_ms = match duration {
        Some(d) => Some(d.parse().ok()?),
        None => None,
    };

    Some(ManifestRecord {
        filename,
        duration_ms,
    })
}

/// Bounded line reader over a manifest file
///
/// Works in fixed memory: one read-ahead chunk plus one line buffer.
pub struct ManifestReader<R> {
    reader: R,
    chunk: [u8; CHUNK_SIZE],
    pos: usize,
    filled: usize,
    eof: bool,
    /// Room for a full line plus a trailing carriage return
    line: Vec<u8, { MAX_LINE_LENGTH + 1 }>,
    /// Current line exceeded the buffer and is being discarded
    overflow: bool,
}

impl<R: Read<Error = FsError>> ManifestReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            chunk: [0; CHUNK_SIZE],
            pos: 0,
            filled: 0,
            eof: false,
            line: Vec::new(),
            overflow: false,
        }
    }

    /// Read the next line that fits the length limit
    ///
    /// Returns `Ok(None)` at end of file. Over-long lines and lines that
    /// are not valid UTF-8 are skipped.
    pub fn next_line(&mut self) -> Result<Option<&str>, FsError> {
        loop {
            if !self.read_raw_line()? {
                return Ok(None);
            }
            if self.line.last() == Some(&b'\r') {
                self.line.pop();
            }
            if self.line.len() <= MAX_LINE_LENGTH && core::str::from_utf8(&self.line).is_ok() {
                break;
            }
        }
        Ok(core::str::from_utf8(&self.line).ok())
    }

    /// Fill the line buffer with the next line; `false` at end of file
    fn read_raw_line(&mut self) -> Result<bool, FsError> {
        self.line.clear();
        self.overflow = false;

        loop {
            if self.pos == self.filled {
                if self.eof {
                    // Final line without terminator
                    return Ok(!self.line.is_empty() && !self.overflow);
                }
                self.filled = self.reader.read(&mut self.chunk)?;
                self.pos = 0;
                if self.filled == 0 {
                    self.eof = true;
                }
                continue;
            }

            let byte = self.chunk[self.pos];
            self.pos += 1;

            if byte == b'\n' {
                if self.overflow {
                    self.line.clear();
                    self.overflow = false;
                    continue;
                }
                return Ok(true);
            }

            if !self.overflow && self.line.push(byte).is_err() {
                self.overflow = true;
            }
        }
    }
}
