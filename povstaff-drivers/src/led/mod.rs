//! LED strip output

pub mod strip;

pub use strip::SmartLedStrip;
