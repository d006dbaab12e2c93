//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in povstaff-core and povstaff-hal:
//!
//! - Bitmap decoder (24-bit Windows BMP)
//! - Image bank file system on NOR flash, with builder and programmer
//! - LED strip output over any `smart-leds` writer

#![no_std]
#![deny(unsafe_code)]

pub mod bitmap;
pub mod led;
pub mod storage;

pub use bitmap::BmpDecoder;
pub use led::SmartLedStrip;
pub use storage::{BankBuilder, BankError, BankFileSystem, BankPartition, BankProgrammer};
