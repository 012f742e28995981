use std::{fs::File, io::Write, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder};
use silhouette_image::{Image, ImageSize};

use crate::error::IoError;

/// Encodes an RGBA image into PNG bytes.
///
/// # Arguments
///
/// * `image` - The image with four 8-bit channels.
///
/// # Returns
///
/// The PNG encoded data, ready to be stored or sent as `image/png`.
///
/// # Example
///
/// ```
/// use silhouette_image::Image;
/// use silhouette_io::png::{decode_image_png_rgba8, encode_image_png_rgba8};
///
/// let image = Image::<u8, 4>::from_size_val([3, 2].into(), 128).unwrap();
/// let bytes = encode_image_png_rgba8(&image).unwrap();
///
/// assert_eq!(&bytes[1..4], b"PNG");
/// assert_eq!(decode_image_png_rgba8(&bytes).unwrap(), image);
/// ```
pub fn encode_image_png_rgba8(image: &Image<u8, 4>) -> Result<Vec<u8>, IoError> {
    let mut buf = Vec::new();
    write_png_impl(&mut buf, image.as_slice(), image.size(), ColorType::Rgba)?;
    Ok(buf)
}

/// Encodes an RGB image into PNG bytes.
///
/// # Arguments
///
/// * `image` - The image with three 8-bit channels.
pub fn encode_image_png_rgb8(image: &Image<u8, 3>) -> Result<Vec<u8>, IoError> {
    let mut buf = Vec::new();
    write_png_impl(&mut buf, image.as_slice(), image.size(), ColorType::Rgb)?;
    Ok(buf)
}

/// Decodes PNG _(rgba8)_ bytes into an image.
///
/// # Arguments
///
/// * `bytes` - The PNG encoded data, which must store 8-bit RGBA samples.
pub fn decode_image_png_rgba8(bytes: &[u8]) -> Result<Image<u8, 4>, IoError> {
    decode_png_impl(bytes, ColorType::Rgba)
}

/// Decodes PNG _(grayscale 8-bit)_ bytes into an image.
///
/// # Arguments
///
/// * `bytes` - The PNG encoded data, which must store 8-bit grayscale samples.
pub fn decode_image_png_gray8(bytes: &[u8]) -> Result<Image<u8, 1>, IoError> {
    decode_png_impl(bytes, ColorType::Grayscale)
}

// Utility function to decode png files from raw bytes
fn decode_png_impl<const C: usize>(
    bytes: &[u8],
    color_type: ColorType,
) -> Result<Image<u8, C>, IoError> {
    let mut reader = Decoder::new(bytes)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let output = reader.output_color_type();
    if output != (color_type, BitDepth::Eight) {
        return Err(IoError::PngDecodeError(format!(
            "Expected {:?} with 8-bit samples, found {:?} with {:?}",
            color_type, output.0, output.1
        )));
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    Ok(Image::new(size, buf)?)
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;
    write_png_impl(file, image.as_slice(), image.size(), ColorType::Rgb)
}

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;
    write_png_impl(file, image.as_slice(), image.size(), ColorType::Rgba)
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;
    write_png_impl(file, image.as_slice(), image.size(), ColorType::Grayscale)
}

fn write_png_impl<W: Write>(
    writer: W,
    image_data: &[u8],
    image_size: ImageSize,
    color_type: ColorType,
) -> Result<(), IoError> {
    let mut encoder = Encoder::new(writer, image_size.width as u32, image_size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
