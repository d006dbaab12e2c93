//! Firmware configuration

pub mod loader;

pub use loader::load_config;
