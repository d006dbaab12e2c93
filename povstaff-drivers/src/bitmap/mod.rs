//! Bitmap decoders

pub mod bmp;

pub use bmp::BmpDecoder;
