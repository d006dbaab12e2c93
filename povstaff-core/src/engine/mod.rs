//! POV engine
//!
//! Streams one scanline of the current playlist image per call and
//! renders the gauge and blink patterns.

pub mod blink;
pub mod error;
pub mod pov;

pub use blink::{BlinkFrame, BlinkSequence, BlinkStep};
pub use error::PovError;
pub use pov::Pov;
