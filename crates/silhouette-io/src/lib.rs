#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access, format detection and
/// encoding/decoding failures.
pub mod error;

/// High-level image reading functions.
///
/// Decode user supplied PNG or JPEG data into an RGB image.
/// See [`functional::decode_image_any_rgb8`] for automatic format detection.
pub mod functional;

/// PNG image encoding and decoding.
///
/// Encode images to PNG bytes or files and decode PNG bytes back.
pub mod png;

pub use crate::error::IoError;
