use rayon::prelude::*;

use super::kernels::Kernel;
use crate::padding::PaddingMode;
use silhouette_image::{Image, ImageError};

fn check_sizes<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &Image<U, C>,
    kernel: &Kernel,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }
    if kernel.is_empty() {
        return Err(ImageError::InvalidKernelLength(
            kernel.width(),
            kernel.height(),
        ));
    }
    Ok(())
}

/// Dilate an image using a [`Kernel`].
///
/// Each output sample is the maximum of the source samples reached through the active
/// offsets of the kernel, so for `bool` images a pixel becomes `true` when any neighbor
/// under the kernel is `true`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `padding_mode` - How samples outside of `src` are read.
/// * `constant_value` - The value read outside of `src` with [`PaddingMode::Constant`].
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` differ or the kernel has no active cell.
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    check_sizes(src, dst, kernel)?;

    let width = src.width();
    let height = src.height();
    if width == 0 || height == 0 {
        return Ok(());
    }

    let (pad_h, pad_w) = kernel.pad();
    let k_width = kernel.width();
    let offsets: Vec<(isize, isize)> = kernel
        .data()
        .iter()
        .enumerate()
        .filter(|(_, &active)| active)
        .map(|(i, _)| {
            (
                (i / k_width) as isize - pad_h as isize,
                (i % k_width) as isize - pad_w as isize,
            )
        })
        .collect();

    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(width * C)
        .enumerate()
        .for_each(|(y, row_chunk)| {
            for x in 0..width {
                for c in 0..C {
                    let max_val = offsets
                        .iter()
                        .map(|&(dy, dx)| {
                            let sy = padding_mode.map_index(y as isize - dy, height);
                            let sx = padding_mode.map_index(x as isize - dx, width);
                            match (sy, sx) {
                                (Some(sy), Some(sx)) => src_data[(sy * width + sx) * C + c],
                                _ => constant_value[c],
                            }
                        })
                        .max();

                    if let Some(v) = max_val {
                        row_chunk[x * C + c] = v;
                    }
                }
            }
        });

    Ok(())
}

/// Dilate a binary mask using a [`Kernel`].
///
/// Equivalent to [`dilate`] with [`PaddingMode::Constant`] and a `false` fill, but each
/// kernel row is resolved with a prefix count over the source row, so the cost per pixel
/// grows with the kernel height only. Kernels whose rows are not contiguous fall back
/// to [`dilate`].
///
/// For kernels symmetric about their center whose rows narrow away from the center
/// row (disk, box, cross) the result is also equal to a reflected border.
///
/// # Example
///
/// ```rust
/// use silhouette_image::Image;
/// use silhouette_imgproc::morphology::{dilate_binary, Kernel, KernelShape};
///
/// let mut src = Image::<bool, 1>::from_size_val([5, 5].into(), false).unwrap();
/// src.as_slice_mut()[12] = true;
///
/// let mut dst = Image::<bool, 1>::from_size_val(src.size(), false).unwrap();
/// dilate_binary(&src, &mut dst, &Kernel::new(KernelShape::Disk { radius: 1 })).unwrap();
///
/// assert_eq!(dst.as_slice().iter().filter(|&&v| v).count(), 5);
/// ```
pub fn dilate_binary(
    src: &Image<bool, 1>,
    dst: &mut Image<bool, 1>,
    kernel: &Kernel,
) -> Result<(), ImageError> {
    check_sizes(src, dst, kernel)?;

    if !kernel.is_row_convex() {
        return dilate(src, dst, kernel, PaddingMode::Constant, [false]);
    }

    let width = src.width();
    let height = src.height();
    if width == 0 || height == 0 {
        return Ok(());
    }

    // number of true pixels in src row y strictly before column x, at y * (width + 1) + x
    let stride = width + 1;
    let mut counts = vec![0u32; height * stride];
    counts
        .par_chunks_exact_mut(stride)
        .zip(src.as_slice().par_chunks_exact(width))
        .for_each(|(row_counts, row)| {
            for (x, &v) in row.iter().enumerate() {
                row_counts[x + 1] = row_counts[x] + v as u32;
            }
        });

    let (pad_h, pad_w) = kernel.pad();
    let spans: Vec<(isize, isize, isize)> = kernel
        .row_spans()
        .into_iter()
        .enumerate()
        .filter_map(|(kh, span)| {
            let (first, last) = span?;
            Some((
                kh as isize - pad_h as isize,
                first as isize - pad_w as isize,
                last as isize - pad_w as isize,
            ))
        })
        .collect();

    dst.as_slice_mut()
        .par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row_out)| {
            for (x, out) in row_out.iter_mut().enumerate() {
                *out = spans.iter().any(|&(dy, dx_first, dx_last)| {
                    let sy = y as isize - dy;
                    if sy < 0 || sy >= height as isize {
                        return false;
                    }
                    // offsets dx_first..=dx_last reach source columns x - dx_last..=x - dx_first
                    let lo = (x as isize - dx_last).max(0);
                    let hi = (x as isize - dx_first).min(width as isize - 1);
                    if lo > hi {
                        return false;
                    }
                    let row_counts = &counts[sy as usize * stride..(sy as usize + 1) * stride];
                    row_counts[hi as usize + 1] > row_counts[lo as usize]
                });
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::kernels::KernelShape;
    use silhouette_image::ImageSize;

    fn mask_from_rows(rows: &[&str]) -> Result<Image<bool, 1>, ImageError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let data = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| c == '1'))
            .collect();
        Image::new(ImageSize { width, height }, data)
    }

    fn mask_to_rows(mask: &Image<bool, 1>) -> Vec<String> {
        mask.as_slice()
            .chunks_exact(mask.width())
            .map(|row| row.iter().map(|&v| if v { '1' } else { '0' }).collect())
            .collect()
    }

    #[test]
    fn test_dilate_single_pixel_disk() -> Result<(), ImageError> {
        let src = mask_from_rows(&["00000", "00000", "00100", "00000", "00000"])?;
        let mut dst = Image::from_size_val(src.size(), false)?;

        dilate_binary(&src, &mut dst, &Kernel::new(KernelShape::Disk { radius: 2 }))?;

        assert_eq!(
            mask_to_rows(&dst),
            vec!["00100", "01110", "11111", "01110", "00100"]
        );
        Ok(())
    }

    #[test]
    fn test_dilate_at_border() -> Result<(), ImageError> {
        let src = mask_from_rows(&["1000", "0000", "0000"])?;
        let mut dst = Image::from_size_val(src.size(), false)?;

        dilate_binary(&src, &mut dst, &Kernel::new(KernelShape::Box { size: 3 }))?;

        assert_eq!(mask_to_rows(&dst), vec!["1100", "1100", "0000"]);
        Ok(())
    }

    #[test]
    fn test_dilate_empty_stays_empty() -> Result<(), ImageError> {
        let src = Image::<bool, 1>::from_size_val([7, 4].into(), false)?;
        let mut dst = Image::from_size_val(src.size(), true)?;

        dilate_binary(&src, &mut dst, &Kernel::new(KernelShape::Disk { radius: 3 }))?;

        assert!(dst.as_slice().iter().all(|&v| !v));
        Ok(())
    }

    #[test]
    fn test_dilate_binary_matches_generic() -> Result<(), ImageError> {
        let src = mask_from_rows(&[
            "0000000000",
            "0110000000",
            "0100000010",
            "0000000000",
            "0000110000",
            "0000000001",
        ])?;

        for radius in 0..4 {
            let kernel = Kernel::new(KernelShape::Disk { radius });

            let mut fast = Image::from_size_val(src.size(), false)?;
            dilate_binary(&src, &mut fast, &kernel)?;

            let mut reference = Image::from_size_val(src.size(), false)?;
            dilate(&src, &mut reference, &kernel, PaddingMode::Constant, [false])?;

            let mut reflected = Image::from_size_val(src.size(), false)?;
            dilate(&src, &mut reflected, &kernel, PaddingMode::Reflect, [false])?;

            assert_eq!(fast, reference, "radius {radius}");
            assert_eq!(fast, reflected, "radius {radius}");
        }
        Ok(())
    }

    #[test]
    fn test_dilate_grayscale() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new([3, 1].into(), vec![10, 50, 20])?;
        let mut dst = Image::from_size_val(src.size(), 0)?;

        dilate(
            &src,
            &mut dst,
            &Kernel::new(KernelShape::Box { size: 3 }),
            PaddingMode::Replicate,
            [0],
        )?;

        assert_eq!(dst.as_slice(), &[50, 50, 50]);
        Ok(())
    }

    #[test]
    fn test_dilate_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<bool, 1>::from_size_val([3, 3].into(), false)?;
        let mut dst = Image::<bool, 1>::from_size_val([4, 3].into(), false)?;

        let res = dilate_binary(&src, &mut dst, &Kernel::new(KernelShape::Disk { radius: 1 }));
        assert_eq!(res, Err(ImageError::InvalidImageSize(4, 3, 3, 3)));

        let res = dilate_binary(
            &src,
            &mut Image::from_size_val(src.size(), false)?,
            &Kernel::new(KernelShape::Box { size: 0 }),
        );
        assert_eq!(res, Err(ImageError::InvalidKernelLength(0, 0)));
        Ok(())
    }
}
