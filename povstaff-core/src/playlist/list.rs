//! Playlist definition
//!
//! Entries are stored in a fixed-capacity vector. Navigation always
//! unloads the decoded image before the cursor moves, and loading is
//! only reachable through [`Playlist::activate`], which unloads first.
//! Together this keeps at most one image in the decode buffer.

use embedded_io::Read;
use heapless::{String, Vec};
use povstaff_hal::{FileSystem, FsError};

use super::manifest::{parse_record, ManifestReader};
use crate::config::{MAX_FILENAME_LEN, MAX_FILES};
use crate::traits::{BitmapSource, ImageError, ImageInfo};

/// Errors from adding playlist entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaylistError {
    /// Playlist already holds `MAX_FILES` entries
    CapacityExceeded,
    /// Filename longer than `MAX_FILENAME_LEN` characters
    FilenameTooLong,
    /// Filename is empty
    EmptyFilename,
}

/// One image with its display duration
///
/// Immutable once added.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaylistEntry {
    filename: String<MAX_FILENAME_LEN>,
    duration_ms: u32,
}

impl PlaylistEntry {
    /// Image file name
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// How long the image should stay on before advancing (ms)
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }
}

/// Image playlist
///
/// Owns the entries, the cursor and the decoder for the entry under the
/// cursor.
pub struct Playlist<B> {
    entries: Vec<PlaylistEntry, MAX_FILES>,
    cursor: usize,
    source: B,
}

impl<B: BitmapSource> Playlist<B> {
    /// Create an empty playlist around a decoder
    pub fn new(source: B) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            source,
        }
    }

    /// Append an entry
    ///
    /// Does not move the cursor or touch the loaded image. Returns the
    /// index of the new entry.
    pub fn append(&mut self, filename: &str, duration_ms: u32) -> Result<usize, PlaylistError> {
        if self.is_full() {
            return Err(PlaylistError::CapacityExceeded);
        }
        if filename.is_empty() {
            return Err(PlaylistError::EmptyFilename);
        }
        let filename = String::try_from(filename).map_err(|_| PlaylistError::FilenameTooLong)?;

        let index = self.entries.len();
        self.entries
            .push(PlaylistEntry {
                filename,
                duration_ms,
            })
            .map_err(|_| PlaylistError::CapacityExceeded)?;
        Ok(index)
    }

    /// Append every valid record of a manifest
    ///
    /// Stops at end of file or when the playlist is full. Records without
    /// a duration get `default_duration_ms`. Returns the number of entries
    /// added.
    pub fn add_from_manifest<R: Read<Error = FsError>>(
        &mut self,
        reader: R,
        default_duration_ms: u32,
    ) -> Result<usize, FsError> {
        let mut lines = ManifestReader::new(reader);
        let mut added = 0;

        while !self.is_full() {
            let Some(line) = lines.next_line()? else {
                break;
            };
            let Some(record) = parse_record(line) else {
                continue;
            };
            let duration = record.duration_ms.unwrap_or(default_duration_ms);
            if self.append(record.filename, duration).is_ok() {
                added += 1;
            }
        }

        Ok(added)
    }

    /// Drop all entries, unloading the image, cursor back to 0
    pub fn reset(&mut self) {
        self.unload();
        self.entries.clear();
        self.cursor = 0;
    }

    /// Move the cursor to the first entry
    ///
    /// Unloads the image; call [`activate`](Self::activate) to load.
    pub fn first(&mut self) {
        self.unload();
        self.cursor = 0;
    }

    /// Move the cursor to the next entry, wrapping after the last
    ///
    /// Unloads the image; call [`activate`](Self::activate) to load.
    /// Does nothing on an empty playlist.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.unload();
        self.cursor = (self.cursor + 1) % self.entries.len();
    }

    /// Move the cursor to `index`
    ///
    /// Unloads the image. Returns `false` (and changes nothing) when the
    /// index is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.unload();
        self.cursor = index;
        true
    }

    /// Load the image of the entry under the cursor
    ///
    /// Returns `Ok(None)` on an empty playlist. If the image is already
    /// loaded it is kept. On error the entry stays selected with nothing
    /// loaded.
    pub fn activate<F: FileSystem>(&mut self, fs: &mut F) -> Result<Option<ImageInfo>, ImageError> {
        let Some(entry) = self.entries.get(self.cursor) else {
            return Ok(None);
        };
        if let Some(info) = self.source.info() {
            return Ok(Some(info));
        }
        self.source.load(fs, &entry.filename).map(Some)
    }

    /// Move the cursor to `index` and load that entry
    ///
    /// Returns `Ok(None)` without changing anything when the index is out
    /// of range.
    pub fn activate_index<F: FileSystem>(
        &mut self,
        index: usize,
        fs: &mut F,
    ) -> Result<Option<ImageInfo>, ImageError> {
        if !self.select(index) {
            return Ok(None);
        }
        self.activate(fs)
    }

    fn unload(&mut self) {
        if self.source.is_loaded() {
            self.source.unload();
        }
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&PlaylistEntry> {
        self.entries.get(self.cursor)
    }

    /// Decoder holding the current entry's image
    ///
    /// `None` when the playlist is empty or the image is not loaded
    /// (never activated, or failed to decode).
    pub fn current_image(&self) -> Option<&B> {
        if self.current().is_some() && self.source.is_loaded() {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Decoder, loaded or not
    pub fn source(&self) -> &B {
        &self.source
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == MAX_FILES
    }

    /// Check if the current entry's image is loaded
    pub fn is_loaded(&self) -> bool {
        self.source.is_loaded()
    }
}
