//! Configuration
//!
//! Compile-time limits shared by every crate, plus the runtime staff
//! configuration parsed from `staff.toml`.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ConfigError};
pub use types::*;
