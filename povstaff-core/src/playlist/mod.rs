//! Image playlist
//!
//! Ordered, bounded list of images with display durations and a cursor.
//! The playlist owns the single bitmap decoder, so the "one image loaded
//! at a time" rule cannot be broken from outside.

pub mod list;
pub mod manifest;

pub use list::{Playlist, PlaylistEntry, PlaylistError};
pub use manifest::{parse_record, ManifestReader, ManifestRecord};
