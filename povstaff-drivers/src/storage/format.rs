//! Image bank on-flash format
//!
//! A bank is a flat, read-only archive. All integers are little-endian.
//!
//! ```text
//! 0x00  magic "PVBK"
//! 0x04  version (u16) = 1
//! 0x06  file count (u16)
//! 0x08  total bank length in bytes (u32)
//! 0x0C  reserved (u32)
//! 0x10  directory: `count` records of 40 bytes
//!         name    [u8; 32]  NUL-padded
//!         offset  u32       from the start of the bank
//!         length  u32
//!       file data
//! ```

use heapless::Vec;

/// Bank signature
pub const BANK_MAGIC: [u8; 4] = *b"PVBK";

/// Supported format version
pub const BANK_VERSION: u16 = 1;

/// Header size in bytes
pub const HEADER_LEN: usize = 16;

/// Directory record size in bytes
pub const ENTRY_LEN: usize = 40;

/// Name field size in bytes
pub const NAME_LEN: usize = 32;

/// Maximum number of files in a bank
pub const MAX_BANK_FILES: usize = 64;

/// Errors from building, parsing or programming a bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BankError {
    /// Magic, version or length fields are wrong
    InvalidHeader,
    /// More than `MAX_BANK_FILES` files
    TooManyFiles,
    /// Name empty, longer than 32 bytes, or contains NUL
    InvalidName,
    /// Bank does not fit the flash partition
    TooLarge,
    /// Output buffer too small for the bank
    BufferTooSmall,
    /// More data received than the header announced
    Overflow,
    /// Stream ended before the announced length
    Incomplete,
    /// Flash erase or write failed
    Flash,
}

/// Parsed bank header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BankHeader {
    pub count: u16,
    pub total_len: u32,
}

impl BankHeader {
    /// Parse and validate a header
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self, BankError> {
        if bytes[0..4] != BANK_MAGIC || read_u16(bytes, 4) != BANK_VERSION {
            return Err(BankError::InvalidHeader);
        }

        let header = Self {
            count: read_u16(bytes, 6),
            total_len: read_u32(bytes, 8),
        };
        if header.count as usize > MAX_BANK_FILES {
            return Err(BankError::TooManyFiles);
        }
        if header.total_len < header.data_start() {
            return Err(BankError::InvalidHeader);
        }
        Ok(header)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&BANK_MAGIC);
        bytes[4..6].copy_from_slice(&BANK_VERSION.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.total_len.to_le_bytes());
        bytes
    }

    /// Offset of the first data byte
    pub fn data_start(&self) -> u32 {
        (HEADER_LEN + self.count as usize * ENTRY_LEN) as u32
    }

    /// Offset of directory record `index`
    pub fn entry_offset(index: u16) -> u32 {
        (HEADER_LEN + index as usize * ENTRY_LEN) as u32
    }
}

/// One directory record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    name: [u8; NAME_LEN],
    pub offset: u32,
    pub len: u32,
}

impl DirEntry {
    pub fn parse(bytes: &[u8; ENTRY_LEN]) -> Self {
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&bytes[..NAME_LEN]);
        Self {
            name,
            offset: read_u32(bytes, NAME_LEN),
            len: read_u32(bytes, NAME_LEN + 4),
        }
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_LEN] {
        let mut bytes = [0u8; ENTRY_LEN];
        bytes[..NAME_LEN].copy_from_slice(&self.name);
        bytes[NAME_LEN..NAME_LEN + 4].copy_from_slice(&self.offset.to_le_bytes());
        bytes[NAME_LEN + 4..].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Name bytes without the NUL padding
    pub fn name(&self) -> &[u8] {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        &self.name[..end]
    }

    /// Check if the record lies within a bank of `total_len` bytes
    pub fn fits(&self, data_start: u32, total_len: u32) -> bool {
        self.offset >= data_start
            && self
                .offset
                .checked_add(self.len)
                .is_some_and(|end| end <= total_len)
    }
}

/// Validate a file name for the directory
pub fn encode_name(name: &str) -> Result<[u8; NAME_LEN], BankError> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.len() > NAME_LEN || bytes.contains(&0) {
        return Err(BankError::InvalidName);
    }
    let mut out = [0u8; NAME_LEN];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

/// Serializes files into a bank image
///
/// Used by host tools and tests; the firmware only reads banks.
#[derive(Debug, Default)]
pub struct BankBuilder<'a> {
    files: Vec<(&'a str, &'a [u8]), MAX_BANK_FILES>,
}

impl<'a> BankBuilder<'a> {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a file
    pub fn add(&mut self, name: &'a str, data: &'a [u8]) -> Result<(), BankError> {
        encode_name(name)?;
        self.files
            .push((name, data))
            .map_err(|_| BankError::TooManyFiles)
    }

    /// Builder-style [`add`](Self::add)
    pub fn with(mut self, name: &'a str, data: &'a [u8]) -> Result<Self, BankError> {
        self.add(name, data)?;
        Ok(self)
    }

    /// Size of the serialized bank in bytes
    pub fn len(&self) -> usize {
        HEADER_LEN
            + self.files.len() * ENTRY_LEN
            + self.files.iter().map(|(_, data)| data.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Serialize into `out`, returning the number of bytes written
    pub fn write(&self, out: &mut [u8]) -> Result<usize, BankError> {
        let total = self.len();
        if total > out.len() {
            return Err(BankError::BufferTooSmall);
        }
        let total_len = u32::try_from(total).map_err(|_| BankError::TooLarge)?;

        let header = BankHeader {
            count: self.files.len() as u16,
            total_len,
        };
        out[..HEADER_LEN].copy_from_slice(&header.to_bytes());

        let mut data_offset = header.data_start() as usize;
        for (index, (name, data)) in self.files.iter().enumerate() {
            let entry = DirEntry {
                name: encode_name(name)?,
                offset: data_offset as u32,
                len: data.len() as u32,
            };
            let at = BankHeader::entry_offset(index as u16) as usize;
            out[at..at + ENTRY_LEN].copy_from_slice(&entry.to_bytes());
            out[data_offset..data_offset + data.len()].copy_from_slice(data);
            data_offset += data.len();
        }

        Ok(total)
    }
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = BankHeader {
            count: 2,
            total_len: 0x0102_0304,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"PVBK");
        assert_eq!(bytes[4..6], [1, 0]);
        assert_eq!(bytes[6..8], [2, 0]);
        assert_eq!(bytes[8..12], [4, 3, 2, 1]);
        assert_eq!(bytes[12..16], [0; 4]);
        assert_eq!(BankHeader::parse(&bytes), Ok(header));
    }

    #[test]
    fn test_header_rejects() {
        let mut bytes = BankHeader {
            count: 1,
            total_len: 100,
        }
        .to_bytes();
        bytes[0] = b'X';
        assert_eq!(BankHeader::parse(&bytes), Err(BankError::InvalidHeader));

        let mut bytes = BankHeader {
            count: 65,
            total_len: 10_000,
        }
        .to_bytes();
        assert_eq!(BankHeader::parse(&bytes), Err(BankError::TooManyFiles));

        // Total shorter than its own directory
        bytes = BankHeader {
            count: 2,
            total_len: 50,
        }
        .to_bytes();
        assert_eq!(BankHeader::parse(&bytes), Err(BankError::InvalidHeader));

        bytes[4] = 2;
        assert_eq!(BankHeader::parse(&bytes), Err(BankError::InvalidHeader));
    }

    #[test]
    fn test_names() {
        assert!(encode_name("logo.bmp").is_ok());
        assert!(encode_name("abcdefghijklmnopqrstuvwxyz012345").is_ok());
        assert_eq!(
            encode_name("abcdefghijklmnopqrstuvwxyz0123456"),
            Err(BankError::InvalidName)
        );
        assert_eq!(encode_name(""), Err(BankError::InvalidName));
        assert_eq!(encode_name("a\0b"), Err(BankError::InvalidName));
    }

    #[test]
    fn test_builder_layout() {
        let builder = BankBuilder::new()
            .with("a.txt", b"hello")
            .unwrap()
            .with("b.bmp", b"xy")
            .unwrap();
        assert_eq!(builder.len(), 16 + 80 + 7);

        let mut out = [0u8; 128];
        let len = builder.write(&mut out).unwrap();
        assert_eq!(len, 103);

        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&out[..HEADER_LEN]);
        let header = BankHeader::parse(&header).unwrap();
        assert_eq!(header.count, 2);
        assert_eq!(header.total_len, 103);

        let mut record = [0u8; ENTRY_LEN];
        record.copy_from_slice(&out[56..96]);
        let entry = DirEntry::parse(&record);
        assert_eq!(entry.name(), b"b.bmp");
        assert_eq!(entry.offset, 101);
        assert_eq!(entry.len, 2);
        assert!(entry.fits(header.data_start(), header.total_len));
        assert_eq!(&out[101..103], b"xy");
    }

    #[test]
    fn test_builder_limits() {
        let mut builder = BankBuilder::new();
        for _ in 0..MAX_BANK_FILES {
            builder.add("f", b"").unwrap();
        }
        assert_eq!(builder.add("f", b""), Err(BankError::TooManyFiles));

        let small = BankBuilder::new().with("a", b"1234").unwrap();
        assert_eq!(small.write(&mut [0u8; 20]), Err(BankError::BufferTooSmall));
    }
}
