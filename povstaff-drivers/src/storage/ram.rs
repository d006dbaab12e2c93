//! RAM-backed NOR flash
//!
//! Behaves like a NOR part: erase sets bytes to `0xFF` and writes can only
//! clear bits. Used by host tools and tests.

use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash,
};

/// Erase sector size
pub const RAM_SECTOR_SIZE: usize = 4096;

pub struct RamFlash<const SIZE: usize> {
    data: [u8; SIZE],
    /// Number of erase calls
    pub erases: usize,
    /// Fail every write with `Other`
    pub fail_writes: bool,
}

impl<const SIZE: usize> RamFlash<SIZE> {
    /// Fully erased flash
    pub fn new() -> Self {
        Self {
            data: [0xFF; SIZE],
            erases: 0,
            fail_writes: false,
        }
    }

    /// Flash with `bytes` preloaded at `offset`
    ///
    /// Bytes beyond the end are dropped.
    pub fn with_contents(offset: usize, bytes: &[u8]) -> Self {
        let mut flash = Self::new();
        if offset < SIZE {
            let len = bytes.len().min(SIZE - offset);
            flash.data[offset..offset + len].copy_from_slice(&bytes[..len]);
        }
        flash
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn range(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, NorFlashErrorKind> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= SIZE => Ok(start..end),
            _ => Err(NorFlashErrorKind::OutOfBounds),
        }
    }
}

impl<const SIZE: usize> Default for RamFlash<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> ErrorType for RamFlash<SIZE> {
    type Error = NorFlashErrorKind;
}

impl<const SIZE: usize> ReadNorFlash for RamFlash<SIZE> {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        SIZE
    }
}

impl<const SIZE: usize> NorFlash for RamFlash<SIZE> {
    const WRITE_SIZE: usize = 1;
    const ERASE_SIZE: usize = RAM_SECTOR_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        if from > to
            || from as usize % RAM_SECTOR_SIZE != 0
            || to as usize % RAM_SECTOR_SIZE != 0
        {
            return Err(NorFlashErrorKind::NotAligned);
        }
        let range = self.range(from, (to - from) as usize)?;
        self.data[range].fill(0xFF);
        self.erases += 1;
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(NorFlashErrorKind::Other);
        }
        let range = self.range(offset, bytes.len())?;
        for (cell, byte) in self.data[range].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nor_semantics() {
        let mut flash = RamFlash::<8192>::new();
        flash.write(0, &[0x0F, 0xF0]).unwrap();
        flash.write(0, &[0xFF, 0x3C]).unwrap();
        assert_eq!(&flash.as_bytes()[..2], &[0x0F, 0x30]);

        flash.erase(0, 4096).unwrap();
        assert_eq!(&flash.as_bytes()[..2], &[0xFF, 0xFF]);
        assert_eq!(flash.erase(0, 100), Err(NorFlashErrorKind::NotAligned));
        assert_eq!(flash.write(8190, &[0; 4]), Err(NorFlashErrorKind::OutOfBounds));
    }
}
