use rayon::prelude::*;

use silhouette_image::{Image, ImageError};

use crate::parallel;

/// Set every pixel of `dst` selected by `mask` to `value`.
///
/// # Arguments
///
/// * `dst` - The image to write into.
/// * `mask` - A mask with the same size as `dst`.
/// * `value` - The pixel written where the mask is `true`.
///
/// # Example
///
/// ```rust
/// use silhouette_image::Image;
/// use silhouette_imgproc::composite::fill_where;
///
/// let mask = Image::<bool, 1>::new([2, 1].into(), vec![true, false]).unwrap();
/// let mut rgba = Image::<u8, 4>::from_size_val(mask.size(), 0).unwrap();
///
/// fill_where(&mut rgba, &mask, [255, 0, 0, 255]).unwrap();
/// assert_eq!(rgba.as_slice(), &[255, 0, 0, 255, 0, 0, 0, 0]);
/// ```
pub fn fill_where<T, const C: usize>(
    dst: &mut Image<T, C>,
    mask: &Image<bool, 1>,
    value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    fill_matching(dst, mask, value, true)
}

/// Set every pixel of `dst` not selected by `mask` to `value`.
///
/// # Arguments
///
/// * `dst` - The image to write into.
/// * `mask` - A mask with the same size as `dst`.
/// * `value` - The pixel written where the mask is `false`.
pub fn fill_where_not<T, const C: usize>(
    dst: &mut Image<T, C>,
    mask: &Image<bool, 1>,
    value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    fill_matching(dst, mask, value, false)
}

fn fill_matching<T, const C: usize>(
    dst: &mut Image<T, C>,
    mask: &Image<bool, 1>,
    value: [T; C],
    selected: bool,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if mask.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            mask.cols(),
            mask.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(mask, dst, |mask_pixel, dst_pixel| {
        if mask_pixel[0] == selected {
            dst_pixel.copy_from_slice(&value);
        }
    });

    Ok(())
}

/// Paste the RGB pixels of `src` selected by `mask` into an RGBA image, fully opaque.
///
/// `src` and `mask` share a size and are placed with their top-left corner at
/// `origin = (x, y)` in `dst`. Unselected pixels of `dst` are left untouched.
///
/// # Errors
///
/// Returns an error if `src` and `mask` differ in size or the placed rectangle does not
/// fit inside `dst`.
///
/// # Example
///
/// ```rust
/// use silhouette_image::Image;
/// use silhouette_imgproc::composite::overlay_rgb_where;
///
/// let src = Image::<u8, 3>::new([1, 1].into(), vec![10, 20, 30]).unwrap();
/// let mask = Image::<bool, 1>::new([1, 1].into(), vec![true]).unwrap();
/// let mut dst = Image::<u8, 4>::from_size_val([2, 2].into(), 0).unwrap();
///
/// overlay_rgb_where(&mut dst, &src, &mask, (1, 1)).unwrap();
/// assert_eq!(dst.get([1, 1, 0]), Some(&10));
/// assert_eq!(dst.get([1, 1, 3]), Some(&255));
/// ```
pub fn overlay_rgb_where(
    dst: &mut Image<u8, 4>,
    src: &Image<u8, 3>,
    mask: &Image<bool, 1>,
    origin: (usize, usize),
) -> Result<(), ImageError> {
    if src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }

    let (x0, y0) = origin;
    if x0 + src.width() > dst.width() || y0 + src.height() > dst.height() {
        return Err(ImageError::InvalidImageSize(
            x0 + src.width(),
            y0 + src.height(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let width = src.width();
    if width == 0 {
        return Ok(());
    }
    let dst_width = dst.width();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_width * 4)
        .skip(y0)
        .zip(src.as_slice().par_chunks_exact(width * 3))
        .zip(mask.as_slice().par_chunks_exact(width))
        .for_each(|((dst_row, src_row), mask_row)| {
            let dst_row = &mut dst_row[x0 * 4..(x0 + width) * 4];
            for ((dst_pixel, src_pixel), &selected) in dst_row
                .chunks_exact_mut(4)
                .zip(src_row.chunks_exact(3))
                .zip(mask_row.iter())
            {
                if selected {
                    dst_pixel[..3].copy_from_slice(src_pixel);
                    dst_pixel[3] = 255;
                }
            }
        });

    Ok(())
}
