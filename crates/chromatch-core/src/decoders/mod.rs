//! Image decoders for various formats
//!
//! Support for PNG, TIFF, JPEG, BMP and TGA files. Decoders keep the file's
//! native channel count and reduce everything to 8 bits per sample; the
//! correction core decides whether the result is usable.

mod png;
mod raster;
mod tiff;


use std::path::Path;

pub(crate) use raster::codec_format;

use crate::error::LoadError;
use crate::models::PixelBuffer;

/// Extensions `load_image` and `save_image` understand (lower case)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "tif", "tiff", "jpg", "jpeg", "bmp", "tga"];

/// Container formats, keyed by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Tiff,
    Jpeg,
    Bmp,
    Tga,
}

impl ImageFormat {
    /// Match a lower-case extension against `SUPPORTED_EXTENSIONS`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        if !SUPPORTED_EXTENSIONS.contains(&extension) {
            return None;
        }
        match extension {
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            "tga" => Some(Self::Tga),
            _ => None,
        }
    }

    /// Format of `path` judged by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        file_extension(path).and_then(|e| Self::from_extension(&e))
    }
}

/// `png, tif, ...` for error messages
pub(crate) fn supported_list() -> String {
    SUPPORTED_EXTENSIONS.join(", ")
}

/// Decode an image from a file path, picking the decoder by extension.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, LoadError> {
    let path = path.as_ref();
    let extension = file_extension(path).ok_or_else(|| LoadError::MissingExtension {
        path: path.to_path_buf(),
    })?;

    let format = ImageFormat::from_extension(&extension)
        .ok_or(LoadError::UnsupportedFormat { extension })?;

    let image = match format {
        ImageFormat::Png => png::decode_png(path)?,
        ImageFormat::Tiff => tiff::decode_tiff(path)?,
        ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Tga => {
            raster::decode_raster(path, format)?
        }
    };

    log::debug!(
        "Decoded {}: {}x{}, {} channels",
        path.display(),
        image.width(),
        image.height(),
        image.channels()
    );
    Ok(image)
}

/// Lower-cased extension of `path`, if any
pub(crate) fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Reduce a 16-bit sample to 8 bits, rounding to nearest.
#[inline]
pub(crate) fn narrow_u16(value: u16) -> u8 {
    ((value as u32 * 255 + 32_767) / 65_535) as u8
}

pub(crate) fn open_file(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn decode_error(path: &Path, message: impl Into<String>) -> LoadError {
    LoadError::Decode {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
