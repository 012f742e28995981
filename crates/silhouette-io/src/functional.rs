use std::{io::Cursor, path::Path};

use image::{ImageFormat, ImageReader};
use silhouette_image::{Image, ImageSize};

use crate::error::IoError;

const RGB_CHANNELS: usize = 3;

// only these two containers are accepted as uploads
fn guess_supported_format(bytes: &[u8]) -> Result<ImageFormat, IoError> {
    match image::guess_format(bytes) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => Ok(format),
        _ => Err(IoError::UnsupportedImageFormat),
    }
}

/// Reads the size of an encoded image without decoding its pixels.
///
/// # Arguments
///
/// * `bytes` - The PNG or JPEG encoded data.
///
/// # Returns
///
/// The width and height stored in the image header.
pub fn decode_image_size(bytes: &[u8]) -> Result<ImageSize, IoError> {
    let format = guess_supported_format(bytes)?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format).into_dimensions()?;
    Ok(ImageSize {
        width: width as usize,
        height: height as usize,
    })
}

/// Decodes PNG or JPEG data into an 8-bit RGB image.
///
/// The format is detected from the data itself. Images with an alpha channel keep their
/// color channels only, and 16-bit images are reduced to 8 bits per sample.
///
/// # Arguments
///
/// * `bytes` - The encoded image data.
///
/// # Errors
///
/// * [`IoError::UnsupportedImageFormat`] if the data is neither PNG nor JPEG.
/// * [`IoError::ImageDecodeError`] if the data is corrupt.
/// * [`IoError::InsufficientChannels`] for grayscale images.
///
/// # Example
///
/// ```
/// use silhouette_io::{functional as F, IoError};
///
/// let res = F::decode_image_any_rgb8(b"not an image");
/// assert!(matches!(res, Err(IoError::UnsupportedImageFormat)));
/// ```
pub fn decode_image_any_rgb8(bytes: &[u8]) -> Result<Image<u8, 3>, IoError> {
    let format = guess_supported_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format)?;

    let found = img.color().channel_count() as usize;
    if found < RGB_CHANNELS {
        return Err(IoError::InsufficientChannels {
            found,
            required: RGB_CHANNELS,
        });
    }

    let rgb = img.into_rgb8();
    let size = ImageSize {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
    };

    Ok(Image::new(size, rgb.into_raw())?)
}

/// Reads a PNG or JPEG image from the given file path as an 8-bit RGB image.
///
/// # Arguments
///
/// * `file_path` - The path to a `.png`, `.jpg` or `.jpeg` file.
///
/// # Returns
///
/// An RGB image with three channels, see [`decode_image_any_rgb8`].
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    let valid_extension = file_path.extension().is_some_and(|ext| {
        let ext = ext.to_ascii_lowercase();
        ext == "png" || ext == "jpg" || ext == "jpeg"
    });
    if !valid_extension {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    decode_image_any_rgb8(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayAlphaImage, GrayImage, Rgb, RgbImage, Rgba, RgbaImage};

    fn encode(img: DynamicImage, format: ImageFormat) -> Result<Vec<u8>, IoError> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format)?;
        Ok(buf)
    }

    fn gradient_rgb(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]))
    }

    #[test]
    fn decode_png_rgb8() -> Result<(), IoError> {
        let bytes = encode(DynamicImage::ImageRgb8(gradient_rgb(7, 5)), ImageFormat::Png)?;
        let image = decode_image_any_rgb8(&bytes)?;

        assert_eq!(image.width(), 7);
        assert_eq!(image.height(), 5);
        assert_eq!(image.get([4, 6, 0]), Some(&6));
        assert_eq!(image.get([4, 6, 1]), Some(&4));
        assert_eq!(image.get([4, 6, 2]), Some(&200));
        Ok(())
    }

    #[test]
    fn decode_png_rgba8_drops_alpha() -> Result<(), IoError> {
        let rgba = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 0]));
        let bytes = encode(DynamicImage::ImageRgba8(rgba), ImageFormat::Png)?;
        let image = decode_image_any_rgb8(&bytes)?;

        assert_eq!(image.num_channels(), 3);
        assert!(image
            .as_slice()
            .chunks_exact(3)
            .all(|p| p == [10, 20, 30]));
        Ok(())
    }

    #[test]
    fn decode_png_rgb16() -> Result<(), IoError> {
        let rgb16 = image::ImageBuffer::<Rgb<u16>, _>::from_pixel(2, 2, Rgb([65535, 0, 65535]));
        let bytes = encode(DynamicImage::ImageRgb16(rgb16), ImageFormat::Png)?;
        let image = decode_image_any_rgb8(&bytes)?;

        assert_eq!(&image.as_slice()[..3], &[255, 0, 255]);
        Ok(())
    }

    #[test]
    fn decode_jpeg() -> Result<(), IoError> {
        let bytes = encode(DynamicImage::ImageRgb8(gradient_rgb(16, 8)), ImageFormat::Jpeg)?;
        let image = decode_image_any_rgb8(&bytes)?;

        assert_eq!(image.width(), 16);
        assert_eq!(image.height(), 8);
        assert_eq!(decode_image_size(&bytes)?, image.size());
        Ok(())
    }

    #[test]
    fn decode_grayscale_rejected() -> Result<(), IoError> {
        let gray = encode(
            DynamicImage::ImageLuma8(GrayImage::new(4, 4)),
            ImageFormat::Png,
        )?;
        assert!(matches!(
            decode_image_any_rgb8(&gray),
            Err(IoError::InsufficientChannels {
                found: 1,
                required: 3
            })
        ));

        let gray_alpha = encode(
            DynamicImage::ImageLumaA8(GrayAlphaImage::new(4, 4)),
            ImageFormat::Png,
        )?;
        assert!(matches!(
            decode_image_any_rgb8(&gray_alpha),
            Err(IoError::InsufficientChannels {
                found: 2,
                required: 3
            })
        ));
        Ok(())
    }

    #[test]
    fn decode_unsupported_and_corrupt() -> Result<(), IoError> {
        assert!(matches!(
            decode_image_any_rgb8(&[]),
            Err(IoError::UnsupportedImageFormat)
        ));

        assert!(matches!(
            decode_image_any_rgb8(b"GIF89a\x01\x00\x01\x00"),
            Err(IoError::UnsupportedImageFormat)
        ));

        let mut png = encode(DynamicImage::ImageRgb8(gradient_rgb(8, 8)), ImageFormat::Png)?;
        png.truncate(png.len() / 2);
        assert!(matches!(
            decode_image_any_rgb8(&png),
            Err(IoError::ImageDecodeError(_))
        ));
        Ok(())
    }

    #[test]
    fn read_any_from_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;

        let bytes = encode(DynamicImage::ImageRgb8(gradient_rgb(6, 3)), ImageFormat::Png)?;
        let file_path = tmp_dir.path().join("upload.PNG");
        std::fs::write(&file_path, &bytes)?;

        let image = read_image_any_rgb8(&file_path)?;
        assert_eq!(
            image.size(),
            ImageSize {
                width: 6,
                height: 3
            }
        );

        let bad_ext = tmp_dir.path().join("upload.gif");
        std::fs::write(&bad_ext, &bytes)?;
        assert!(matches!(
            read_image_any_rgb8(&bad_ext),
            Err(IoError::InvalidFileExtension(_))
        ));

        assert!(matches!(
            read_image_any_rgb8(tmp_dir.path().join("missing.png")),
            Err(IoError::FileDoesNotExist(_))
        ));
        Ok(())
    }
}
