//! PNG image decoder

use std::io::BufReader;
use std::path::Path;

use super::{decode_error, narrow_u16, open_file};
use crate::error::LoadError;
use crate::models::PixelBuffer;

/// Decode a PNG file to 8-bit samples
///
/// Palette and sub-byte images are expanded; 16-bit samples are narrowed
/// here rather than by the codec so rounding matches the TIFF path.
pub(crate) fn decode_png(path: &Path) -> Result<PixelBuffer, LoadError> {
    let file = open_file(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);

    let mut reader = decoder
        .read_info()
        .map_err(|e| decode_error(path, format!("Failed to read PNG info: {}", e)))?;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| decode_error(path, "Failed to determine PNG buffer size"))?;
    let mut buf = vec![0u8; buffer_size];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| decode_error(path, format!("Failed to read PNG frame: {}", e)))?;
    buf.truncate(frame.buffer_size());

    let channels = frame.color_type.samples() as u8;
    let data = match frame.bit_depth {
        png::BitDepth::Eight => buf,
        // PNG 16-bit is big-endian
        png::BitDepth::Sixteen => buf
            .chunks_exact(2)
            .map(|pair| narrow_u16(u16::from_be_bytes([pair[0], pair[1]])))
            .collect(),
        other => {
            return Err(decode_error(
                path,
                format!("Unexpected PNG bit depth after expansion: {:?}", other),
            ));
        }
    };

    let image = PixelBuffer::new(frame.width, frame.height, channels, data);
    if let Some(problem) = image.layout_problem() {
        return Err(decode_error(path, format!("PNG buffer mismatch: {}", problem)));
    }
    Ok(image)
}
