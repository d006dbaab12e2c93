//! Bitmap source trait
//!
//! A bitmap source owns the decode buffer for one image. It is loaded
//! from a file system by name and then gives random access to scanlines.

use povstaff_hal::{FileSystem, FsError};

/// Dimensions of a loaded image in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageInfo {
    pub width: u16,
    pub height: u16,
}

impl ImageInfo {
    /// Bytes per scanline (three per pixel)
    pub fn line_len(&self) -> usize {
        self.width as usize * 3
    }

    /// Bytes needed to hold the whole image
    ///
    /// `None` when the size does not fit in `usize`.
    pub fn data_len(&self) -> Option<usize> {
        self.line_len().checked_mul(self.height as usize)
    }
}

/// Errors from decoding a bitmap file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// File does not start with a bitmap signature
    NotBitmap,
    /// Header variant, bit depth or compression not supported
    Unsupported,
    /// Zero or negative width, zero height
    InvalidDimensions,
    /// Pixel data does not fit the decode buffer
    TooLarge,
    /// File ended before all pixel data was read
    Truncated,
}

/// Errors from loading an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageError {
    /// File missing or unreadable
    Io(FsError),
    /// File malformed
    Decode(DecodeError),
}

impl From<FsError> for ImageError {
    fn from(e: FsError) -> Self {
        ImageError::Io(e)
    }
}

impl From<DecodeError> for ImageError {
    fn from(e: DecodeError) -> Self {
        ImageError::Decode(e)
    }
}

/// Trait for a decoder holding at most one image
///
/// Callers must [`unload`](BitmapSource::unload) before loading a
/// different image; the playlist is the only caller and enforces this.
pub trait BitmapSource {
    /// Decode `filename` into the buffer
    ///
    /// On error nothing is loaded.
    fn load<F: FileSystem>(&mut self, fs: &mut F, filename: &str)
        -> Result<ImageInfo, ImageError>;

    /// Release the decoded image
    fn unload(&mut self);

    /// Dimensions of the loaded image, `None` when nothing is loaded
    fn info(&self) -> Option<ImageInfo>;

    /// Scanline `row` as `3 * width` bytes in blue-green-red order
    ///
    /// Returns `None` when nothing is loaded or `row` is out of range.
    fn line(&self, row: u16) -> Option<&[u8]>;

    /// Check if an image is loaded
    fn is_loaded(&self) -> bool {
        self.info().is_some()
    }
}
