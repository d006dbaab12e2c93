//! Read-only file system over an image bank

use embedded_io::{ErrorType, Read, Seek, SeekFrom};
use embedded_storage::nor_flash::ReadNorFlash;
use povstaff_hal::{FileSystem, FsError, StorageIdentity};

use super::format::{BankHeader, DirEntry, ENTRY_LEN, HEADER_LEN, NAME_LEN};

/// Flash region holding the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BankPartition {
    /// Start of the partition, relative to the start of flash
    pub offset: u32,
    /// Partition size in bytes
    pub size: u32,
}

impl BankPartition {
    pub const fn new(offset: u32, size: u32) -> Self {
        Self { offset, size }
    }
}

/// Image bank file system
///
/// The flash must support single-byte reads (`READ_SIZE == 1`), which
/// holds for memory-mapped QSPI parts.
pub struct BankFileSystem<F> {
    flash: F,
    partition: BankPartition,
    jedec_id: u32,
    header: Option<BankHeader>,
}

impl<F: ReadNorFlash> BankFileSystem<F> {
    pub fn new(flash: F, partition: BankPartition, jedec_id: u32) -> Self {
        Self {
            flash,
            partition,
            jedec_id,
            header: None,
        }
    }

    /// Number of files in the mounted bank (0 when not mounted)
    pub fn file_count(&self) -> u16 {
        self.header.map_or(0, |h| h.count)
    }

    /// Total bank length in bytes (0 when not mounted)
    pub fn bank_len(&self) -> u32 {
        self.header.map_or(0, |h| h.total_len)
    }

    /// Directory record `index`
    pub fn entry(&mut self, index: u16) -> Result<DirEntry, FsError> {
        let header = self.header.ok_or(FsError::NotMounted)?;
        if index >= header.count {
            return Err(FsError::NotFound);
        }
        let mut record = [0u8; ENTRY_LEN];
        self.read_at(BankHeader::entry_offset(index), &mut record)?;
        Ok(DirEntry::parse(&record))
    }

    /// Look up a file by name
    pub fn find(&mut self, name: &str) -> Result<DirEntry, FsError> {
        let header = self.header.ok_or(FsError::NotMounted)?;
        for index in 0..header.count {
            let entry = self.entry(index)?;
            if entry.name() == name.as_bytes() {
                if !entry.fits(header.data_start(), header.total_len) {
                    return Err(FsError::Corrupted);
                }
                return Ok(entry);
            }
        }
        Err(FsError::NotFound)
    }

    /// Give back the flash driver
    pub fn release(self) -> F {
        self.flash
    }

    fn read_at(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), FsError> {
        self.flash
            .read(self.partition.offset + offset, bytes)
            .map_err(|_| FsError::Flash)
    }
}

impl<F: ReadNorFlash> FileSystem for BankFileSystem<F> {
    type File<'a>
        = BankFile<'a, F>
    where
        Self: 'a;

    fn mount(&mut self) -> Result<(), FsError> {
        self.header = None;

        let mut bytes = [0u8; HEADER_LEN];
        self.read_at(0, &mut bytes)?;
        let header = BankHeader::parse(&bytes).map_err(|_| FsError::Corrupted)?;
        if header.total_len > self.partition.size {
            return Err(FsError::Corrupted);
        }

        self.header = Some(header);
        Ok(())
    }

    fn is_mounted(&self) -> bool {
        self.header.is_some()
    }

    fn open(&mut self, path: &str) -> Result<Self::File<'_>, FsError> {
        if self.header.is_none() {
            return Err(FsError::NotMounted);
        }
        let name = path.trim_start_matches('/');
        if name.is_empty() || name.len() > NAME_LEN {
            return Err(FsError::InvalidPath);
        }

        let entry = self.find(name)?;
        Ok(BankFile {
            flash: &mut self.flash,
            start: self.partition.offset + entry.offset,
            len: entry.len,
            pos: 0,
        })
    }

    fn identity(&self) -> StorageIdentity {
        StorageIdentity {
            jedec_id: self.jedec_id,
            capacity: self.partition.size,
        }
    }
}

/// Open file in a bank
///
/// Borrows the flash, so only one file can be open at a time.
pub struct BankFile<'a, F> {
    flash: &'a mut F,
    start: u32,
    len: u32,
    pos: u32,
}

impl<F> BankFile<'_, F> {
    /// File size in bytes
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<F> ErrorType for BankFile<'_, F> {
    type Error = FsError;
}

impl<F: ReadNorFlash> Read for BankFile<'_, F> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        let left = self.len.saturating_sub(self.pos) as usize;
        let n = left.min(buf.len());
        if n == 0 {
            return Ok(0);
        }
        self.flash
            .read(self.start + self.pos, &mut buf[..n])
            .map_err(|_| FsError::Flash)?;
        self.pos += n as u32;
        Ok(n)
    }
}

impl<F: ReadNorFlash> Seek for BankFile<'_, F> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError> {
        let target = match pos {
            SeekFrom::Start(p) => i64::try_from(p).unwrap_or(i64::MAX),
            SeekFrom::End(d) => self.len as i64 + d,
            SeekFrom::Current(d) => self.pos as i64 + d,
        };
        if target < 0 {
            return Err(FsError::EndOfFile);
        }
        // Seeking past the end is allowed; reads there return 0
        self.pos = target.min(u32::MAX as i64) as u32;
        Ok(self.pos as u64)
    }
}
