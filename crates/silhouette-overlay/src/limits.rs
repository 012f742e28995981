use silhouette_image::ImageSize;

use crate::{error::OverlayError, params::OverlayParams};

/// Upper bounds on the work a single overlay run may request.
///
/// The padded mask and every intermediate buffer grow with `(W + 2p) * (H + 2p)` and the
/// dilation loop repeats over that area once per round, so a small upload with large
/// parameters can still be expensive. Limits are checked before any of those buffers is
/// allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum number of pixels of the decoded source image.
    pub max_source_pixels: u64,
    /// Maximum number of pixels of the padded mask.
    pub max_padded_pixels: u64,
    /// Maximum of padded pixels multiplied by the number of dilation rounds.
    pub max_dilation_work: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_source_pixels: 40_000_000,
            max_padded_pixels: 64_000_000,
            max_dilation_work: 1_280_000_000,
        }
    }
}

impl ResourceLimits {
    /// Limits that accept any run.
    pub fn unlimited() -> Self {
        Self {
            max_source_pixels: u64::MAX,
            max_padded_pixels: u64::MAX,
            max_dilation_work: u64::MAX,
        }
    }

    /// Check the source size alone, before the image is decoded.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ResourceLimitExceeded`] when the image has too many pixels.
    pub fn check_source(&self, source: ImageSize) -> Result<(), OverlayError> {
        let pixels = (source.width as u64).saturating_mul(source.height as u64);
        exceeds("source pixel count", pixels, self.max_source_pixels)
    }

    /// Check a run of `params` over an image of size `source`.
    ///
    /// # Returns
    ///
    /// The size of the padded mask.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ResourceLimitExceeded`] naming the first limit that is
    /// exceeded.
    pub fn check(
        &self,
        source: ImageSize,
        params: &OverlayParams,
    ) -> Result<ImageSize, OverlayError> {
        self.check_source(source)?;

        let pad = params.padding.saturating_mul(2);
        let padded_width = source.width.saturating_add(pad);
        let padded_height = source.height.saturating_add(pad);

        let padded_pixels = (padded_width as u64).saturating_mul(padded_height as u64);
        exceeds("padded pixel count", padded_pixels, self.max_padded_pixels)?;

        let work = padded_pixels.saturating_mul(params.num_dilations as u64);
        exceeds("dilation work", work, self.max_dilation_work)?;

        Ok(ImageSize {
            width: padded_width,
            height: padded_height,
        })
    }
}

fn exceeds(what: &'static str, value: u64, limit: u64) -> Result<(), OverlayError> {
    if value > limit {
        return Err(OverlayError::ResourceLimitExceeded { what, value, limit });
    }
    Ok(())
}
