//! TIFF image decoder

use std::io::BufReader;
use std::path::Path;

use super::{decode_error, narrow_u16, open_file};
use crate::error::LoadError;
use crate::models::PixelBuffer;

/// Decode a TIFF file to 8-bit samples
pub(crate) fn decode_tiff(path: &Path) -> Result<PixelBuffer, LoadError> {
    use tiff::decoder::{Decoder, DecodingResult, Limits};

    let file = open_file(path)?;

    // Allow large captures (up to 1GB uncompressed)
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024;
    limits.ifd_value_size = 1024 * 1024 * 1024;
    limits.intermediate_buffer_size = 1024 * 1024 * 1024;

    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| decode_error(path, format!("Failed to create TIFF decoder: {}", e)))?
        .with_limits(limits);

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| decode_error(path, format!("Failed to get TIFF dimensions: {}", e)))?;

    let color_type = decoder
        .colortype()
        .map_err(|e| decode_error(path, format!("Failed to get TIFF color type: {}", e)))?;

    let channels = match color_type {
        tiff::ColorType::Gray(_) => 1,
        tiff::ColorType::GrayA(_) => 2,
        tiff::ColorType::RGB(_) => 3,
        tiff::ColorType::RGBA(_) => 4,
        other => {
            return Err(decode_error(
                path,
                format!("Unsupported TIFF color type: {:?}", other),
            ));
        }
    };

    let data = match decoder
        .read_image()
        .map_err(|e| decode_error(path, format!("Failed to read TIFF image data: {}", e)))?
    {
        DecodingResult::U8(buf) => buf,
        DecodingResult::U16(buf) => buf.into_iter().map(narrow_u16).collect(),
        _ => {
            return Err(decode_error(
                path,
                "Only 8-bit and 16-bit unsigned TIFF samples are supported",
            ));
        }
    };

    let image = PixelBuffer::new(width, height, channels, data);
    if let Some(problem) = image.layout_problem() {
        return Err(decode_error(path, format!("TIFF buffer mismatch: {}", problem)));
    }
    Ok(image)
}
