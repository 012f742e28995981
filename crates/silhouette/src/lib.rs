//! Silhouette overlays: threshold an image, grow the mask and composite it over a
//! background color.
//!
//! The functionality lives in the member crates and is re-exported here.

#[doc(inline)]
pub use silhouette_image as image;

#[doc(inline)]
pub use silhouette_imgproc as imgproc;

#[doc(inline)]
pub use silhouette_io as io;

#[doc(inline)]
pub use silhouette_overlay as overlay;
