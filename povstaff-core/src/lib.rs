//! Board-agnostic core logic for the POV staff firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (LED driver, bitmap source)
//! - Image playlist with a single-loaded-image memory discipline
//! - POV engine streaming one scanline per refresh
//! - Gauge and blink rendering
//! - Slide timing for per-entry display durations
//! - Button press classification
//! - Configuration type definitions and parsing

#![no_std]
#![deny(unsafe_code)]

pub mod color;
pub mod config;
pub mod engine;
pub mod input;
pub mod playlist;
pub mod scheduler;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use engine::{Pov, PovError};
pub use playlist::{Playlist, PlaylistEntry, PlaylistError};
pub use state::PlaybackState;
