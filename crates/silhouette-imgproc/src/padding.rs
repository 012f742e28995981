use silhouette_image::{Image, ImageError, ImageSize};

/// A border type for spatial padding and for sampling outside of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// This border type fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// This border type reflects the pixel values at the boundary, starting with the pixel 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// This border type reflects the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// This border type wraps the content from the opposite side to fill the border.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl PaddingMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    #[inline]
    fn wrap(i: isize, len: usize) -> usize {
        ((i % len as isize + len as isize) % len as isize) as usize
    }

    /// Maps index `i` to a valid index within `[0, len)` according to the padding mode.
    ///
    /// Returns `None` for [`PaddingMode::Constant`] when `i` falls outside, in which case the
    /// caller substitutes its constant value. `len` must be non zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use silhouette_imgproc::padding::PaddingMode;
    ///
    /// assert_eq!(PaddingMode::Reflect.map_index(-1, 4), Some(0));
    /// assert_eq!(PaddingMode::Reflect.map_index(5, 4), Some(2));
    /// assert_eq!(PaddingMode::Constant.map_index(-1, 4), None);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            PaddingMode::Constant => None,
            PaddingMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            PaddingMode::Reflect => Some(Self::reflect(i, len)),
            PaddingMode::Reflect101 => Some(Self::reflect101(i, len)),
            PaddingMode::Wrap => Some(Self::wrap(i, len)),
        }
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same amount of padding on every side.
    pub fn uniform(pad: usize) -> Self {
        Self {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }

    /// The image size obtained after applying this padding to `size`.
    ///
    /// # Example
    /// ```rust
    /// use silhouette_image::ImageSize;
    /// use silhouette_imgproc::padding::Padding2D;
    ///
    /// let padded = Padding2D::uniform(5).padded_size(ImageSize { width: 10, height: 4 });
    /// assert_eq!(padded, ImageSize { width: 20, height: 14 });
    /// ```
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }

    /// Validates that `new_size` is `old_size` with this padding applied.
    pub fn validate_size(&self, old_size: ImageSize, new_size: ImageSize) -> bool {
        self.padded_size(old_size) == new_size
    }
}

/// Pad an image into a larger destination, placing the source at the padding offset.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image where the padded output will be stored.
/// * `padding` - The amount of padding (in pixels) for all four sides.
/// * `padding_mode` - The border handling used to fill the padded region.
/// * `constant_value` - The pixel value used for constant padding, one value per channel.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the size of `src` plus `padding`.
///
/// # Example
///
/// ```rust
/// use silhouette_image::{Image, ImageSize};
/// use silhouette_imgproc::padding::{spatial_padding, Padding2D, PaddingMode};
///
/// let src = Image::<bool, 1>::from_size_val(ImageSize { width: 2, height: 2 }, true).unwrap();
/// let mut dst = Image::<bool, 1>::from_size_val(ImageSize { width: 4, height: 4 }, true).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::uniform(1), PaddingMode::Constant, [false]).unwrap();
///
/// assert_eq!(dst.as_slice().iter().filter(|&&v| v).count(), 4);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if !padding.validate_size(src.size(), dst.size()) {
        let expected = padding.padded_size(src.size());
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        ));
    }

    let old_width = src.width();
    let old_height = src.height();
    let new_width = dst.width();

    let old_data = src.as_slice();
    let new_data = dst.as_slice_mut();

    // an empty source has nothing to reflect, so only the constant fill applies
    let sample_border = padding_mode != PaddingMode::Constant && old_width > 0 && old_height > 0;

    for (y, dst_row) in new_data.chunks_exact_mut(new_width * C).enumerate() {
        let src_y = y as isize - padding.top as isize;
        let src_y = if sample_border {
            padding_mode.map_index(src_y, old_height)
        } else {
            PaddingMode::Constant.map_index(src_y, old_height)
        };

        for (x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
            let src_x = x as isize - padding.left as isize;
            let src_x = if sample_border {
                padding_mode.map_index(src_x, old_width)
            } else {
                PaddingMode::Constant.map_index(src_x, old_width)
            };

            match (src_y, src_x) {
                (Some(sy), Some(sx)) => {
                    let idx = (sy * old_width + sx) * C;
                    dst_pixel.copy_from_slice(&old_data[idx..idx + C]);
                }
                _ => dst_pixel.copy_from_slice(&constant_value),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use silhouette_image::{Image, ImageError, ImageSize};

    // helper functions
    fn make_src_2x2_rgb() -> Result<Image<u8, 3>, ImageError> {
        Image::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4],
        )
    }

    fn make_dst_4x4_rgb() -> Result<Image<u8, 3>, ImageError> {
        Image::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0u8,
        )
    }

    const PAD_1: Padding2D = Padding2D {
        top: 1,
        bottom: 1,
        left: 1,
        right: 1,
    };

    #[test]
    fn test_map_index_reflect_repeats() {
        // 0 1 2 | 2 1 0 | 0 1 2
        let mode = PaddingMode::Reflect;
        assert_eq!(mode.map_index(3, 3), Some(2));
        assert_eq!(mode.map_index(5, 3), Some(0));
        assert_eq!(mode.map_index(6, 3), Some(0));
        assert_eq!(mode.map_index(-4, 3), Some(2));
        assert_eq!(mode.map_index(-7, 3), Some(0));
        assert_eq!(mode.map_index(-3, 1), Some(0));
    }

    #[test]
    fn test_map_index_other_modes() {
        assert_eq!(PaddingMode::Replicate.map_index(-3, 4), Some(0));
        assert_eq!(PaddingMode::Replicate.map_index(9, 4), Some(3));
        assert_eq!(PaddingMode::Reflect101.map_index(-1, 4), Some(1));
        assert_eq!(PaddingMode::Reflect101.map_index(4, 4), Some(2));
        assert_eq!(PaddingMode::Wrap.map_index(-1, 4), Some(3));
        assert_eq!(PaddingMode::Wrap.map_index(4, 4), Some(0));
        assert_eq!(PaddingMode::Constant.map_index(2, 4), Some(2));
    }

    #[test]
    fn test_spatial_padding_constant() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = make_dst_4x4_rgb()?;

        spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Constant, [9, 9, 9])?;

        let d = dst.as_slice();

        // corners
        assert_eq!(&d[0..3], &[9, 9, 9]);
        assert_eq!(&d[45..48], &[9, 9, 9]);

        // top edge
        assert_eq!(&d[3..6], &[9, 9, 9]);

        // actual image
        assert_eq!(&d[15..18], &[1, 1, 1]);
        assert_eq!(&d[30..33], &[4, 4, 4]);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_reflect() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = make_dst_4x4_rgb()?;

        spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Reflect, [0, 0, 0])?;

        let d = dst.as_slice();

        // corners mirror the nearest source pixel
        assert_eq!(&d[0..3], &[1, 1, 1]);
        assert_eq!(&d[9..12], &[2, 2, 2]);
        assert_eq!(&d[45..48], &[4, 4, 4]);

        Ok(())
    }

    #[test]
    fn test_spatial_padding_asymmetric_mask() -> Result<(), ImageError> {
        let src = Image::<bool, 1>::from_size_val([3, 2].into(), true)?;
        let padding = Padding2D {
            top: 0,
            bottom: 2,
            left: 1,
            right: 0,
        };
        let mut dst = Image::<bool, 1>::from_size_val(padding.padded_size(src.size()), true)?;

        spatial_padding(&src, &mut dst, padding, PaddingMode::Constant, [false])?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                false, true, true, true,
                false, true, true, true,
                false, false, false, false,
                false, false, false, false,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_spatial_padding_invalid_size() -> Result<(), ImageError> {
        let src = make_src_2x2_rgb()?;
        let mut dst = Image::<u8, 3>::from_size_val([5, 4].into(), 0)?;

        let res = spatial_padding(&src, &mut dst, PAD_1, PaddingMode::Constant, [0, 0, 0]);
        assert_eq!(res, Err(ImageError::InvalidImageSize(5, 4, 4, 4)));

        Ok(())
    }
}
