//! Flash file system abstractions
//!
//! Image files and the playlist manifest live on external flash. The
//! storage layer must be mounted before anything can be opened; files are
//! read through `embedded-io` so parsers stay independent of the medium.

use embedded_io::{ErrorKind, ErrorType, Read, Seek};

/// Errors from file system operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FsError {
    /// File system has not been mounted (or mounting failed)
    NotMounted,
    /// No file with the requested name
    NotFound,
    /// Path is empty or too long for the directory format
    InvalidPath,
    /// Directory or header data is inconsistent
    Corrupted,
    /// Underlying flash read failed
    Flash,
    /// Read or seek past the end of the file
    EndOfFile,
}

impl embedded_io::Error for FsError {
    fn kind(&self) -> ErrorKind {
        match self {
            FsError::NotMounted => ErrorKind::NotConnected,
            FsError::NotFound => ErrorKind::NotFound,
            FsError::InvalidPath => ErrorKind::InvalidInput,
            FsError::Corrupted => ErrorKind::InvalidData,
            FsError::Flash => ErrorKind::Other,
            FsError::EndOfFile => ErrorKind::InvalidInput,
        }
    }
}

/// Identification of the backing storage device
///
/// Reported in upload mode so the operator can tell which chip and how
/// much space is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StorageIdentity {
    /// JEDEC manufacturer/device id of the flash chip
    pub jedec_id: u32,
    /// Usable capacity of the file system partition in bytes
    pub capacity: u32,
}

/// Mounted file system trait
///
/// Implementations should:
/// - Refuse to open files until [`FileSystem::mount`] succeeded
/// - Hand out files that borrow the file system, so at most one file is
///   open at a time
pub trait FileSystem {
    /// Open file handle type
    type File<'a>: Read + Seek + ErrorType<Error = FsError>
    where
        Self: 'a;

    /// Mount the file system
    ///
    /// Validates on-flash structures. A failure here means there is no
    /// usable storage layer at all.
    fn mount(&mut self) -> Result<(), FsError>;

    /// Check whether a previous mount succeeded
    fn is_mounted(&self) -> bool;

    /// Open a file by name for reading
    fn open(&mut self, path: &str) -> Result<Self::File<'_>, FsError>;

    /// Report device identification
    fn identity(&self) -> StorageIdentity;
}
