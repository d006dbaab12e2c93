//! Collaborator traits
//!
//! These traits define the interface between the playback logic
//! and the LED and image-decoding implementations.

pub mod image;
pub mod leds;

pub use image::{BitmapSource, DecodeError, ImageError, ImageInfo};
pub use leds::{LedDriver, LedError};
