use std::cmp::PartialOrd;

use silhouette_image::{Image, ImageError};

use crate::parallel;

/// Select the samples of an image that are strictly below a threshold.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output mask with the same size and number of channels as the input.
/// * `threshold` - The threshold value. Must be the same type as the image.
///
/// A sample equal to the threshold is not selected.
///
/// # Examples
///
/// ```
/// use silhouette_image::{Image, ImageSize};
/// use silhouette_imgproc::threshold::threshold_less_than;
///
/// let data = vec![100u8, 200, 50, 150, 170, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut mask = Image::<bool, 1>::from_size_val(image.size(), false).unwrap();
///
/// threshold_less_than(&image, &mut mask, 170).unwrap();
/// assert_eq!(mask.as_slice(), &[true, false, true, true, false, false]);
/// ```
pub fn threshold_less_than<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<bool, C>,
    threshold: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = *src_pixel < threshold;
    });

    Ok(())
}

/// Select the samples of an image that are strictly above a threshold.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output mask with the same size and number of channels as the input.
/// * `threshold` - The threshold value. Must be the same type as the image.
///
/// # Examples
///
/// ```
/// use silhouette_image::{Image, ImageSize};
/// use silhouette_imgproc::threshold::threshold_greater_than;
///
/// let data = vec![0.2f32, 0.5, 0.51, 1.0];
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 1 }, data).unwrap();
///
/// let mut mask = Image::<bool, 1>::from_size_val(image.size(), false).unwrap();
///
/// threshold_greater_than(&image, &mut mask, 0.5).unwrap();
/// assert_eq!(mask.as_slice(), &[false, false, true, true]);
/// ```
pub fn threshold_greater_than<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<bool, C>,
    threshold: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = *src_pixel > threshold;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use silhouette_image::{Image, ImageError, ImageSize};

    #[test]
    fn threshold_less_than_boundary() -> Result<(), ImageError> {
        let data = vec![0u8, 169, 170, 171, 255, 1];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            data,
        )?;

        let mut mask = Image::<bool, 1>::from_size_val(image.size(), true)?;

        super::threshold_less_than(&image, &mut mask, 170)?;

        assert_eq!(mask.as_slice(), &[true, true, false, false, false, true]);

        Ok(())
    }

    #[test]
    fn threshold_less_than_zero_selects_nothing() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![0, 0, 10],
        )?;
        let mut mask = Image::<bool, 1>::from_size_val(image.size(), true)?;

        super::threshold_less_than(&image, &mut mask, 0)?;

        assert!(mask.as_slice().iter().all(|&v| !v));
        Ok(())
    }

    #[test]
    fn threshold_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut mask = Image::<bool, 1>::from_size_val([3, 2].into(), false)?;

        let res = super::threshold_less_than(&image, &mut mask, 10);
        assert_eq!(res, Err(ImageError::InvalidImageSize(2, 2, 3, 2)));

        let res = super::threshold_greater_than(&image, &mut mask, 10);
        assert!(res.is_err());
        Ok(())
    }

    #[test]
    fn threshold_greater_than_float() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0, 0.5, 0.500001, 1.0],
        )?;
        let mut mask = Image::<bool, 1>::from_size_val(image.size(), false)?;

        super::threshold_greater_than(&image, &mut mask, 0.5)?;

        assert_eq!(mask.as_slice(), &[false, false, true, true]);
        Ok(())
    }
}
