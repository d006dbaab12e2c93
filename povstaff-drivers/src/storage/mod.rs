//! Image bank storage
//!
//! Images and the manifest are stored as one flat archive (a "bank") in
//! a NOR flash partition. The bank is written in one go by
//! [`BankProgrammer`] and read through [`BankFileSystem`].

pub mod bank;
pub mod format;
pub mod programmer;
pub mod ram;

pub use bank::{BankFile, BankFileSystem, BankPartition};
pub use format::{BankBuilder, BankError, BankHeader, DirEntry, MAX_BANK_FILES};
pub use programmer::{BankProgrammer, Progress};
pub use ram::RamFlash;
