#![deny(missing_docs)]
//! Turn an image into a silhouette "logo".
//!
//! The pixels of the source whose green sample falls below a threshold form a mask. The
//! mask is padded, grown by repeated disk dilation and gaussian smoothing, and painted in
//! a background color, with the original pixels of the mask on top and everything else
//! transparent.
//!
//! ```no_run
//! use silhouette_overlay::{run_overlay, OverlayParams, ResourceLimits};
//!
//! let bytes = std::fs::read("logo.png")?;
//! let output = run_overlay(&bytes, &OverlayParams::default(), &ResourceLimits::default())?;
//! std::fs::write(silhouette_overlay::DOWNLOAD_FILE_NAME, output.png_bytes()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Error types for the overlay pipeline.
pub mod error;

/// Four panel rendering of the pipeline stages.
pub mod figure;

/// Bounds on the size of a run.
pub mod limits;

/// Parameters of a run and the background color.
pub mod params;

/// The overlay pipeline.
pub mod pipeline;

pub use crate::error::OverlayError;
pub use crate::figure::FigureStyle;
pub use crate::limits::ResourceLimits;
pub use crate::params::{BackgroundColor, OverlayParams};
pub use crate::pipeline::{
    dilate_mask, run_overlay, run_overlay_image, OverlayOutput, DOWNLOAD_FILE_NAME,
    DOWNLOAD_MIME_TYPE,
};
