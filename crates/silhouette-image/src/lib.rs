#![deny(missing_docs)]
//! Image types for the silhouette overlay pipeline

/// image representation for the overlay pipeline.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
