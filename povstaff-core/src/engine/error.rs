//! Engine error type

use povstaff_hal::FsError;

use crate::playlist::PlaylistError;
use crate::traits::{DecodeError, ImageError, LedError};

/// Errors reported by engine operations
///
/// Everything except `FilesystemMountFailure` is local to one call: the
/// entry is not added or the image is not loaded, and playback of other
/// entries continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PovError {
    /// Playlist is full
    CapacityExceeded,
    /// Filename longer than 30 characters
    FilenameTooLong,
    /// Empty filename
    EmptyFilename,
    /// Manifest or image file missing or unreadable
    Io(FsError),
    /// Malformed bitmap
    Decode(DecodeError),
    /// Backing storage could not be mounted
    FilesystemMountFailure(FsError),
    /// Frame could not be written to the strip
    Led(LedError),
}

impl PovError {
    /// Check if the device cannot continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, PovError::FilesystemMountFailure(_))
    }
}

impl From<PlaylistError> for PovError {
    fn from(e: PlaylistError) -> Self {
        match e {
            PlaylistError::CapacityExceeded => PovError::CapacityExceeded,
            PlaylistError::FilenameTooLong => PovError::FilenameTooLong,
            PlaylistError::EmptyFilename => PovError::EmptyFilename,
        }
    }
}

impl From<ImageError> for PovError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::Io(e) => PovError::Io(e),
            ImageError::Decode(e) => PovError::Decode(e),
        }
    }
}

impl From<FsError> for PovError {
    fn from(e: FsError) -> Self {
        PovError::Io(e)
    }
}

impl From<LedError> for PovError {
    fn from(e: LedError) -> Self {
        PovError::Led(e)
    }
}
