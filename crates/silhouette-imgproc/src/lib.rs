#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// mask driven compositing of RGBA images.
pub mod composite;

/// image filtering module.
pub mod filter;

/// morphological operations module.
pub mod morphology;

/// spatial padding and border handling.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;
