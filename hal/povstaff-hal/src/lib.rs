//! Povstaff Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by board-specific code. The same playback engine then runs against the
//! RP2040 flash, an in-memory bank on the host, or a test double.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (povstaff-firmware, etc.)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  povstaff-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ image bank on │       │  in-memory /  │
//! │  NOR flash    │       │  test doubles │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`storage::FileSystem`] - Mounted flash file system holding images
//! - [`clock::MonotonicClock`] - Microsecond timestamps for refresh tracking

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use clock::MonotonicClock;
pub use storage::{FileSystem, FsError, StorageIdentity};
