//! JPEG, BMP and TGA decoding through the `image` crate

use std::io::BufReader;
use std::path::Path;

use image::DynamicImage;

use super::{decode_error, open_file, ImageFormat};
use crate::error::LoadError;
use crate::models::PixelBuffer;

/// Codec format for one of the formats handled here
pub(crate) fn codec_format(format: ImageFormat) -> Option<image::ImageFormat> {
    match format {
        ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
        ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
        ImageFormat::Tga => Some(image::ImageFormat::Tga),
        ImageFormat::Png | ImageFormat::Tiff => None,
    }
}

/// Decode a JPEG, BMP or TGA file to 8-bit samples
///
/// Gray, gray+alpha, RGB and RGBA layouts are kept as they are stored.
pub(crate) fn decode_raster(path: &Path, format: ImageFormat) -> Result<PixelBuffer, LoadError> {
    let codec = codec_format(format)
        .ok_or_else(|| decode_error(path, format!("{:?} is not a raster codec format", format)))?;

    let file = open_file(path)?;
    let decoded = image::load(BufReader::new(file), codec)
        .map_err(|e| decode_error(path, format!("Failed to decode {:?} image: {}", format, e)))?;

    let image = to_pixel_buffer(decoded);
    if let Some(problem) = image.layout_problem() {
        return Err(decode_error(path, format!("{:?} buffer mismatch: {}", format, problem)));
    }
    Ok(image)
}

fn to_pixel_buffer(decoded: DynamicImage) -> PixelBuffer {
    let (width, height) = (decoded.width(), decoded.height());
    let color = decoded.color();

    match (color.channel_count(), color.has_alpha()) {
        (1, _) => PixelBuffer::new(width, height, 1, decoded.into_luma8().into_raw()),
        (2, _) => PixelBuffer::new(width, height, 2, decoded.into_luma_alpha8().into_raw()),
        (_, false) => PixelBuffer::new(width, height, 3, decoded.into_rgb8().into_raw()),
        (_, true) => PixelBuffer::new(width, height, 4, decoded.into_rgba8().into_raw()),
    }
}
