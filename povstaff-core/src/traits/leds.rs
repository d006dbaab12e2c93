//! LED driver trait
//!
//! The physical side of the frame buffer: pushes a full frame to the
//! strip. Brightness and color correction are applied by the driver so
//! the engine's pixel array always holds the nominal image colors.

use crate::color::{ColorCorrection, RGB8};

/// Errors that can occur when writing to the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Data transfer to the strip failed
    Transfer,
}

/// Trait for a strip of `N` addressable LEDs
pub trait LedDriver<const N: usize> {
    /// Write a complete frame to the strip
    fn write(&mut self, pixels: &[RGB8; N]) -> Result<(), LedError>;

    /// Set global brightness for subsequent writes
    fn set_brightness(&mut self, brightness: u8);

    /// Set color correction for subsequent writes
    fn set_correction(&mut self, correction: ColorCorrection);
}
