use silhouette_image::{Image, ImageSize};
use silhouette_imgproc::{
    composite::{fill_where, fill_where_not, overlay_rgb_where},
    filter::gaussian_blur,
    morphology::{dilate_binary, Kernel, KernelShape},
    padding::{spatial_padding, Padding2D, PaddingMode},
    parallel,
    threshold::{threshold_greater_than, threshold_less_than},
};
use silhouette_io::{functional as F, png};

use crate::{
    error::OverlayError,
    figure::{render_figure, FigureStyle},
    limits::ResourceLimits,
    params::{BackgroundColor, OverlayParams},
};

/// File name offered for the composite download.
pub const DOWNLOAD_FILE_NAME: &str = "overlay_image.png";

/// Media type of the composite download.
pub const DOWNLOAD_MIME_TYPE: &str = "image/png";

// the green channel stands in for luminance
const GRAY_CHANNEL: usize = 1;

const REBINARIZE_LEVEL: f32 = 0.5;

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Every stage of an overlay run.
#[derive(Debug, Clone)]
pub struct OverlayOutput {
    /// The decoded source image.
    pub source: Image<u8, 3>,
    /// Pixels of the source whose green sample is below the threshold.
    pub binary: Image<bool, 1>,
    /// The padded mask after all dilation rounds.
    pub dilated: Image<bool, 1>,
    /// The RGBA composite, same size as `dilated`.
    pub composite: Image<u8, 4>,
}

impl OverlayOutput {
    /// Encode the composite as PNG, the content of [`DOWNLOAD_FILE_NAME`].
    pub fn png_bytes(&self) -> Result<Vec<u8>, OverlayError> {
        Ok(png::encode_image_png_rgba8(&self.composite)?)
    }

    /// Render the four stages side by side, see [`render_figure`].
    pub fn figure(&self, style: &FigureStyle) -> Result<Image<u8, 3>, OverlayError> {
        render_figure(self, style)
    }
}

/// Decode an uploaded PNG or JPEG image and run the overlay pipeline on it.
///
/// The image header is checked against `limits` before the pixels are decoded.
///
/// # Arguments
///
/// * `bytes` - The encoded image.
/// * `params` - The overlay parameters.
/// * `limits` - Bounds on the size of the run.
///
/// # Example
///
/// ```
/// use silhouette_overlay::{run_overlay, OverlayError, OverlayParams, ResourceLimits};
///
/// let res = run_overlay(b"", &OverlayParams::default(), &ResourceLimits::default());
/// assert!(matches!(res, Err(OverlayError::Io(_))));
/// ```
pub fn run_overlay(
    bytes: &[u8],
    params: &OverlayParams,
    limits: &ResourceLimits,
) -> Result<OverlayOutput, OverlayError> {
    params.validate()?;

    let size = F::decode_image_size(bytes)?;
    limits.check(size, params)?;

    let source = F::decode_image_any_rgb8(bytes)?;
    log::debug!("decoded a {} source image", source.size());

    run_overlay_image(source, params, limits)
}

/// Run the overlay pipeline on a decoded image.
///
/// 1. Threshold the green channel, strictly below `params.threshold`.
/// 2. Pad the mask by `params.padding` pixels of `false` on every side.
/// 3. Grow it with [`dilate_mask`].
/// 4. Composite: background color where the grown mask is set, the source pixels where
///    the unpadded mask is set, transparent elsewhere.
///
/// # Errors
///
/// Returns an error if the parameters are out of range or the run exceeds `limits`.
pub fn run_overlay_image(
    source: Image<u8, 3>,
    params: &OverlayParams,
    limits: &ResourceLimits,
) -> Result<OverlayOutput, OverlayError> {
    params.validate()?;
    let padded_size = limits.check(source.size(), params)?;

    let gray = source.channel(GRAY_CHANNEL)?;
    let mut binary = Image::from_size_val(gray.size(), false)?;
    threshold_less_than(&gray, &mut binary, params.threshold)?;
    log::debug!(
        "threshold {} selects {} pixels",
        params.threshold,
        count_set(&binary)
    );

    let mut padded = Image::from_size_val(padded_size, false)?;
    spatial_padding(
        &binary,
        &mut padded,
        Padding2D::uniform(params.padding),
        PaddingMode::Constant,
        [false],
    )?;

    let dilated = dilate_mask(
        &padded,
        params.disk_size,
        params.num_dilations,
        params.sigma,
    )?;

    let composite = composite_overlay(&source, &binary, &dilated, params.background_color)?;

    log::info!(
        "overlay of {} source into {} composite, {} silhouette pixels",
        source.size(),
        composite.size(),
        count_set(&dilated)
    );

    Ok(OverlayOutput {
        source,
        binary,
        dilated,
        composite,
    })
}

/// Grow a mask by repeated dilation and smoothing.
///
/// Each round dilates with a disk of radius `radius`, blurs the result as `{0.0, 1.0}`
/// samples with a gaussian of standard deviation `sigma` and a reflected border, and
/// keeps the samples strictly above `0.5`. Rounds run one after the other, each on the
/// output of the previous one. With zero `iterations` the mask is returned unchanged.
///
/// # Example
///
/// ```
/// use silhouette_image::Image;
/// use silhouette_overlay::dilate_mask;
///
/// let mut mask = Image::<bool, 1>::from_size_val([9, 9].into(), false).unwrap();
/// mask.as_slice_mut()[4 * 9 + 4] = true;
///
/// let grown = dilate_mask(&mask, 1, 2, 0.0).unwrap();
/// assert_eq!(grown.as_slice().iter().filter(|&&v| v).count(), 13);
/// ```
pub fn dilate_mask(
    mask: &Image<bool, 1>,
    radius: usize,
    iterations: usize,
    sigma: f32,
) -> Result<Image<bool, 1>, OverlayError> {
    let mut current = mask.clone();
    if iterations == 0 {
        return Ok(current);
    }

    let kernel = Kernel::new(KernelShape::Disk { radius });
    let size = mask.size();

    let mut dilated = Image::from_size_val(size, false)?;
    let mut samples = Image::<f32, 1>::from_size_val(size, 0.0)?;
    let mut blurred = Image::<f32, 1>::from_size_val(size, 0.0)?;

    for round in 0..iterations {
        dilate_binary(&current, &mut dilated, &kernel)?;

        parallel::par_iter_rows_val(&dilated, &mut samples, |&set, v| {
            *v = if set { 1.0 } else { 0.0 };
        });

        gaussian_blur(&samples, &mut blurred, (sigma, sigma), PaddingMode::Reflect)?;

        threshold_greater_than(&blurred, &mut current, REBINARIZE_LEVEL)?;

        log::trace!("dilation round {}/{} done", round + 1, iterations);
    }

    Ok(current)
}

/// Top-left corner at which an `inner` image is centered inside `outer`.
///
/// Odd differences round toward the top-left corner.
pub fn centered_origin(outer: ImageSize, inner: ImageSize) -> (usize, usize) {
    (
        outer.width.saturating_sub(inner.width) / 2,
        outer.height.saturating_sub(inner.height) / 2,
    )
}

fn composite_overlay(
    source: &Image<u8, 3>,
    binary: &Image<bool, 1>,
    dilated: &Image<bool, 1>,
    background: BackgroundColor,
) -> Result<Image<u8, 4>, OverlayError> {
    let mut composite = Image::<u8, 4>::from_size_val(dilated.size(), 0)?;

    fill_where(&mut composite, dilated, background.to_rgba())?;

    let origin = centered_origin(dilated.size(), binary.size());
    overlay_rgb_where(&mut composite, source, binary, origin)?;

    // pixels outside of the grown mask are cleared last
    fill_where_not(&mut composite, dilated, TRANSPARENT)?;

    Ok(composite)
}

fn count_set(mask: &Image<bool, 1>) -> usize {
    mask.as_slice().iter().filter(|&&v| v).count()
}
