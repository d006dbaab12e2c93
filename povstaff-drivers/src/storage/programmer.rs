//! Streaming bank programmer
//!
//! Receives a bank image in arbitrary chunks (e.g. straight from a UART)
//! and writes it into the flash partition. The header is validated as
//! soon as its 16 bytes have arrived; only then is the partition erased.

use embedded_storage::nor_flash::NorFlash;

use super::bank::BankPartition;
use super::format::{BankError, BankHeader, HEADER_LEN};

/// Write granularity
pub const PAGE_SIZE: usize = 256;

/// Upload progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Progress {
    /// Bytes received so far
    pub received: u32,
    /// Bank length from the header, once known
    pub total: Option<u32>,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.total == Some(self.received)
    }

    /// Completion in percent (0 until the header is in)
    pub fn percent(&self) -> u8 {
        match self.total {
            Some(0) => 100,
            Some(total) => ((self.received as u64 * 100) / total as u64) as u8,
            None => 0,
        }
    }
}

pub struct BankProgrammer<F> {
    flash: F,
    partition: BankPartition,
    page: [u8; PAGE_SIZE],
    page_len: usize,
    /// Partition-relative offset of the next page
    written: u32,
    received: u32,
    total: Option<u32>,
}

impl<F: NorFlash> BankProgrammer<F> {
    pub fn new(flash: F, partition: BankPartition) -> Self {
        Self {
            flash,
            partition,
            page: [0xFF; PAGE_SIZE],
            page_len: 0,
            written: 0,
            received: 0,
            total: None,
        }
    }

    /// Feed the next chunk of the bank image
    ///
    /// Erases the partition once the header is complete and writes full
    /// pages as they fill up. The last partial page is written when the
    /// announced length has been reached.
    pub fn write(&mut self, mut data: &[u8]) -> Result<Progress, BankError> {
        while !data.is_empty() {
            let limit = match self.total {
                Some(total) => total - self.received,
                None => HEADER_LEN as u32 - self.received,
            };
            if limit == 0 {
                return Err(BankError::Overflow);
            }

            let take = data
                .len()
                .min(limit as usize)
                .min(PAGE_SIZE - self.page_len);
            self.page[self.page_len..self.page_len + take].copy_from_slice(&data[..take]);
            self.page_len += take;
            self.received += take as u32;
            data = &data[take..];

            if self.total.is_none() && self.received == HEADER_LEN as u32 {
                self.start()?;
            }
            if self.page_len == PAGE_SIZE {
                self.flush_page()?;
            }
        }

        if self.is_complete() && self.page_len > 0 {
            self.flush_page()?;
        }
        Ok(self.progress())
    }

    pub fn progress(&self) -> Progress {
        Progress {
            received: self.received,
            total: self.total,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    /// Check that the whole bank arrived
    pub fn finish(&self) -> Result<u32, BankError> {
        if self.is_complete() {
            Ok(self.received)
        } else {
            Err(BankError::Incomplete)
        }
    }

    /// Discard the current upload and wait for a new header
    pub fn reset(&mut self) {
        self.page_len = 0;
        self.written = 0;
        self.received = 0;
        self.total = None;
    }

    /// Give back the flash driver
    pub fn release(self) -> F {
        self.flash
    }

    fn start(&mut self) -> Result<(), BankError> {
        let mut bytes = [0u8; HEADER_LEN];
        bytes.copy_from_slice(&self.page[..HEADER_LEN]);
        let header = BankHeader::parse(&bytes)?;

        let erase_len = round_up(header.total_len, F::ERASE_SIZE as u32)
            .filter(|&len| len <= self.partition.size)
            .ok_or(BankError::TooLarge)?;
        if erase_len > 0 {
            let from = self.partition.offset;
            self.flash
                .erase(from, from + erase_len)
                .map_err(|_| BankError::Flash)?;
        }

        self.total = Some(header.total_len);
        Ok(())
    }

    fn flush_page(&mut self) -> Result<(), BankError> {
        let len = round_up(self.page_len as u32, F::WRITE_SIZE as u32)
            .map_or(PAGE_SIZE, |len| len as usize);
        self.page[self.page_len..len].fill(0xFF);
        self.flash
            .write(self.partition.offset + self.written, &self.page[..len])
            .map_err(|_| BankError::Flash)?;

        self.written += self.page_len as u32;
        self.page_len = 0;
        Ok(())
    }
}

/// `None` on overflow
fn round_up(value: u32, align: u32) -> Option<u32> {
    value.div_ceil(align).checked_mul(align)
}
