//! Morphological operations
//!
//! Structuring elements and dilation for grayscale images and binary masks.

/// Structuring elements.
mod kernels;
pub use kernels::{Kernel, KernelShape};

/// Dilation operations.
mod ops;
pub use ops::{dilate, dilate_binary};
