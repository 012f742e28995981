use silhouette_image::{Image, ImageError};

use super::{kernels, separable_filter};
use crate::padding::PaddingMode;

/// Blur an image using a gaussian blur filter
///
/// The kernel on each axis is truncated at four standard deviations, see
/// [`kernels::gaussian_kernel_radius`]. An axis whose sigma is zero (or negative) is left
/// untouched, so `sigma = (0.0, 0.0)` copies `src` into `dst`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `sigma` - The sigma of the gaussian kernel, xy-ordered.
/// * `padding_mode` - The border handling.
///
/// # Example
///
/// ```rust
/// use silhouette_image::Image;
/// use silhouette_imgproc::{filter::gaussian_blur, padding::PaddingMode};
///
/// let src = Image::<f32, 1>::from_size_val([8, 8].into(), 1.0).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// gaussian_blur(&src, &mut dst, (2.0, 2.0), PaddingMode::Reflect).unwrap();
/// assert!(dst.as_slice().iter().all(|v| (v - 1.0).abs() < 1e-5));
/// ```
pub fn gaussian_blur<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    sigma: (f32, f32),
    padding_mode: PaddingMode,
) -> Result<(), ImageError> {
    let kernel_x = kernels::gaussian_kernel_1d_truncated(sigma.0);
    let kernel_y = kernels::gaussian_kernel_1d_truncated(sigma.1);
    separable_filter(src, dst, &kernel_x, &kernel_y, padding_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use silhouette_image::ImageSize;

    #[test]
    fn test_gaussian_blur_zero_sigma_is_identity() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };
        let img = Image::<f32, 1>::new(size, (0..25).map(|x| x as f32).collect())?;
        let mut dst = Image::<f32, 1>::from_size_val(size, -1.0)?;

        gaussian_blur(&img, &mut dst, (0.0, 0.0), PaddingMode::Reflect)?;

        assert_eq!(dst, img);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_impulse() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 21,
            height: 21,
        };
        let mut img = Image::<f32, 1>::from_size_val(size, 0.0)?;
        img.as_slice_mut()[10 * 21 + 10] = 1.0;

        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        gaussian_blur(&img, &mut dst, (1.0, 1.0), PaddingMode::Reflect)?;

        // energy is preserved away from the borders and the response is symmetric
        assert_relative_eq!(dst.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        let at = |y: usize, x: usize| dst.as_slice()[y * 21 + x];
        assert_relative_eq!(at(10, 9), at(10, 11));
        assert_relative_eq!(at(9, 10), at(11, 10));
        assert_relative_eq!(at(9, 10), at(10, 9));
        assert!(at(10, 10) > at(10, 11));

        // the kernel stops at a radius of four pixels
        assert_eq!(at(10, 15), 0.0);
        assert!(at(10, 14) > 0.0);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_reflect_half_plane() -> Result<(), ImageError> {
        // a column of ones at the left border stays above one half after blurring
        let size = ImageSize {
            width: 6,
            height: 4,
        };
        let data = (0..24)
            .map(|i| if i % 6 == 0 { 1.0 } else { 0.0 })
            .collect();
        let img = Image::<f32, 1>::new(size, data)?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;

        gaussian_blur(&img, &mut dst, (1.0, 1.0), PaddingMode::Reflect)?;

        for row in dst.as_slice().chunks_exact(6) {
            assert!(row[0] > 0.5);
            assert!(row[1] < 0.5);
        }
        Ok(())
    }
}
