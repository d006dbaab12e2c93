//! Test doubles for the collaborator traits

use core::cell::Cell;

use embedded_hal::delay::DelayNs;
use embedded_io::{ErrorType, Read, Seek, SeekFrom};
use heapless::String;
use povstaff_hal::{FileSystem, FsError, MonotonicClock, StorageIdentity};

use crate::color::{ColorCorrection, RGB8};
use crate::traits::{BitmapSource, DecodeError, ImageError, ImageInfo, LedDriver, LedError};

/// LED strip that remembers every frame it was asked to show
pub struct MockLeds<const N: usize> {
    pub frames: usize,
    pub last: Option<[RGB8; N]>,
    pub brightness: u8,
    pub correction: ColorCorrection,
    pub fail: bool,
}

impl<const N: usize> MockLeds<N> {
    pub fn new() -> Self {
        Self {
            frames: 0,
            last: None,
            brightness: 255,
            correction: ColorCorrection::UNCORRECTED,
            fail: false,
        }
    }
}

impl<const N: usize> LedDriver<N> for MockLeds<N> {
    fn write(&mut self, pixels: &[RGB8; N]) -> Result<(), LedError> {
        if self.fail {
            return Err(LedError::Transfer);
        }
        self.frames += 1;
        self.last = Some(*pixels);
        Ok(())
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn set_correction(&mut self, correction: ColorCorrection) {
        self.correction = correction;
    }
}

/// In-memory file system over static byte slices
pub struct MemFs {
    pub files: &'static [(&'static str, &'static [u8])],
    pub mounted: bool,
    pub mountable: bool,
}

impl MemFs {
    pub fn new(files: &'static [(&'static str, &'static [u8])]) -> Self {
        Self {
            files,
            mounted: true,
            mountable: true,
        }
    }
}

pub struct MemFile {
    data: &'static [u8],
    pos: usize,
}

impl MemFile {
    pub fn new(data: &'static [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ErrorType for MemFile {
    type Error = FsError;
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for MemFile {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError> {
        let target = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(d) => self.data.len() as i64 + d,
            SeekFrom::Current(d) => self.pos as i64 + d,
        };
        if target < 0 {
            return Err(FsError::EndOfFile);
        }
        self.pos = target as usize;
        Ok(target as u64)
    }
}

impl FileSystem for MemFs {
    type File<'a> = MemFile;

    fn mount(&mut self) -> Result<(), FsError> {
        self.mounted = self.mountable;
        if self.mounted {
            Ok(())
        } else {
            Err(FsError::Corrupted)
        }
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn open(&mut self, path: &str) -> Result<Self::File<'_>, FsError> {
        if !self.mounted {
            return Err(FsError::NotMounted);
        }
        self.files
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, data)| MemFile::new(data))
            .ok_or(FsError::NotFound)
    }

    fn identity(&self) -> StorageIdentity {
        StorageIdentity {
            jedec_id: 0x00EF_4015,
            capacity: 2 * 1024 * 1024,
        }
    }
}

/// Bitmap source that synthesizes images from their file names
///
/// A file `"img<W>x<H>"` loads as a W x H image whose line `r` is filled
/// with byte `r`. Files named `"bad*"` fail to decode. The file must still
/// exist on the file system. Load/unload calls are counted so tests can
/// check the one-image-at-a-time discipline.
pub struct MockSource {
    pub info: Option<ImageInfo>,
    pub name: String<32>,
    pub loads: usize,
    pub unloads: usize,
    /// Loads issued while another image was still loaded
    pub overlapping_loads: usize,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            info: None,
            name: String::new(),
            loads: 0,
            unloads: 0,
            overlapping_loads: 0,
        }
    }

    fn parse_dims(name: &str) -> Option<(u16, u16)> {
        let dims = name.strip_prefix("img")?;
        let (w, h) = dims.split_once('x')?;
        Some((w.parse().ok()?, h.parse().ok()?))
    }
}

impl BitmapSource for MockSource {
    fn load<F: FileSystem>(&mut self, fs: &mut F, filename: &str) -> Result<ImageInfo, ImageError> {
        if self.info.is_some() {
            self.overlapping_loads += 1;
        }
        self.loads += 1;
        self.info = None;
        fs.open(filename)?;

        if filename.starts_with("bad") {
            return Err(ImageError::Decode(DecodeError::NotBitmap));
        }
        let (width, height) = Self::parse_dims(filename).ok_or(DecodeError::Unsupported)?;
        let info = ImageInfo { width, height };
        self.name.clear();
        let _ = self.name.push_str(filename);
        self.info = Some(info);
        Ok(info)
    }

    fn unload(&mut self) {
        if self.info.take().is_some() {
            self.unloads += 1;
        }
    }

    fn info(&self) -> Option<ImageInfo> {
        self.info
    }

    fn line(&self, row: u16) -> Option<&[u8]> {
        let info = self.info?;
        if row >= info.height {
            return None;
        }
        let line = &MOCK_LINES[row as usize % MOCK_LINES.len()];
        Some(&line[..info.line_len().min(line.len())])
    }
}

/// Line contents used by [`MockSource`]: line `r` is all `r` bytes
/// (widths up to 32 pixels)
static MOCK_LINES: [[u8; 96]; 8] = {
    let mut lines = [[0u8; 96]; 8];
    let mut r = 0;
    while r < 8 {
        let mut i = 0;
        while i < 96 {
            lines[r][i] = r as u8;
            i += 1;
        }
        r += 1;
    }
    lines
};

/// Manually advanced clock
pub struct MockClock {
    pub now: Cell<u64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl MonotonicClock for MockClock {
    fn now_micros(&self) -> u64 {
        self.now.get()
    }
}

/// Delay that records the requested waits instead of sleeping
pub struct MockDelay {
    pub total_ns: u64,
    pub waits: usize,
}

impl MockDelay {
    pub fn new() -> Self {
        Self {
            total_ns: 0,
            waits: 0,
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.waits += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
        self.waits += 1;
    }
}
