//! Windows BMP decoder
//!
//! Supports uncompressed 24-bit images with a BITMAPINFOHEADER or any
//! later header version. The decoded image is kept in a caller-provided
//! buffer, rows top-down, three bytes per pixel in blue-green-red order
//! exactly as stored in the file.

use embedded_io::{ErrorType, Read, ReadExactError, Seek, SeekFrom};
use povstaff_core::traits::{BitmapSource, DecodeError, ImageError, ImageInfo};
use povstaff_hal::{FileSystem, FsError};

/// File header size
const FILE_HEADER_LEN: usize = 14;

/// Smallest supported info header (BITMAPINFOHEADER)
const INFO_HEADER_LEN: u32 = 40;

/// `BI_RGB`
const COMPRESSION_NONE: u32 = 0;

/// BMP decoder over a fixed buffer
///
/// Holds at most one image. Images whose pixel data does not fit the
/// buffer are rejected with [`DecodeError::TooLarge`].
pub struct BmpDecoder<'a> {
    buf: &'a mut [u8],
    info: Option<ImageInfo>,
}

impl<'a> BmpDecoder<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, info: None }
    }

    /// Buffer size in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Decode an image from any readable, seekable stream
    pub fn decode<R>(&mut self, reader: &mut R) -> Result<ImageInfo, ImageError>
    where
        R: Read + Seek + ErrorType<Error = FsError>,
    {
        self.info = None;

        let mut file_header = [0u8; FILE_HEADER_LEN];
        read_exact(reader, &mut file_header)?;
        if &file_header[0..2] != b"BM" {
            return Err(DecodeError::NotBitmap.into());
        }
        let data_offset = le_u32(&file_header, 10);

        let mut info_header = [0u8; INFO_HEADER_LEN as usize];
        read_exact(reader, &mut info_header)?;
        let header_len = le_u32(&info_header, 0);
        let width = le_u32(&info_header, 4) as i32;
        let height = le_u32(&info_header, 8) as i32;
        let planes = le_u16(&info_header, 12);
        let bits_per_pixel = le_u16(&info_header, 14);
        let compression = le_u32(&info_header, 16);

        if header_len < INFO_HEADER_LEN
            || planes != 1
            || bits_per_pixel != 24
            || compression != COMPRESSION_NONE
        {
            return Err(DecodeError::Unsupported.into());
        }

        // Positive height: rows stored bottom-up
        let bottom_up = height > 0;
        let width = u16::try_from(width).map_err(|_| DecodeError::InvalidDimensions)?;
        let height =
            u16::try_from(height.unsigned_abs()).map_err(|_| DecodeError::InvalidDimensions)?;
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions.into());
        }

        let info = ImageInfo { width, height };
        match info.data_len() {
            Some(len) if len <= self.buf.len() => {}
            _ => return Err(DecodeError::TooLarge.into()),
        }

        let line_len = info.line_len();
        let padding = (4 - line_len % 4) % 4;
        reader.seek(SeekFrom::Start(data_offset as u64))?;

        for file_row in 0..height as usize {
            let row = if bottom_up {
                height as usize - 1 - file_row
            } else {
                file_row
            };
            let start = row * line_len;
            read_exact(reader, &mut self.buf[start..start + line_len])?;
            if padding > 0 && file_row + 1 < height as usize {
                reader.seek(SeekFrom::Current(padding as i64))?;
            }
        }

        self.info = Some(info);
        Ok(info)
    }
}

impl BitmapSource for BmpDecoder<'_> {
    fn load<F: FileSystem>(&mut self, fs: &mut F, filename: &str) -> Result<ImageInfo, ImageError> {
        self.info = None;
        let mut file = fs.open(filename)?;
        self.decode(&mut file)
    }

    fn unload(&mut self) {
        self.info = None;
    }

    fn info(&self) -> Option<ImageInfo> {
        self.info
    }

    fn line(&self, row: u16) -> Option<&[u8]> {
        let info = self.info?;
        if row >= info.height {
            return None;
        }
        let start = row as usize * info.line_len();
        self.buf.get(start..start + info.line_len())
    }
}

fn read_exact<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), ImageError>
where
    R: Read + ErrorType<Error = FsError>,
{
    reader.read_exact(buf).map_err(|e| match e {
        ReadExactError::UnexpectedEof => ImageError::Decode(DecodeError::Truncated),
        ReadExactError::Other(e) => ImageError::Io(e),
    })
}

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
