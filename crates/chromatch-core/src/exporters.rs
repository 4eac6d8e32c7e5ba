//! Image exporters for various output formats
//!
//! Write 8-bit buffers to PNG, TIFF, JPEG, BMP or TGA. The format follows
//! the destination path's extension.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ExtendedColorType, ImageEncoder};

use crate::decoders::{codec_format, file_extension, ImageFormat};
use crate::error::SaveError;
use crate::models::PixelBuffer;

/// Save `image` to `path`, choosing the encoder from the extension.
pub fn save_image<P: AsRef<Path>>(image: &PixelBuffer, path: P) -> Result<(), SaveError> {
    let path = path.as_ref();

    if let Some(reason) = image.layout_problem() {
        return Err(SaveError::InvalidImage {
            path: path.to_path_buf(),
            reason,
        });
    }
    if image.channels() > 4 {
        return Err(SaveError::InvalidImage {
            path: path.to_path_buf(),
            reason: format!("{} channels cannot be stored", image.channels()),
        });
    }

    let extension = file_extension(path).unwrap_or_default();
    let format = ImageFormat::from_extension(&extension)
        .ok_or(SaveError::UnsupportedFormat { extension })?;

    match format {
        ImageFormat::Png => export_png(image, path),
        ImageFormat::Tiff => export_tiff(image, path),
        ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Tga => {
            export_raster(image, path, format)
        }
    }?;

    log::debug!(
        "Saved {}x{} image to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

fn write_failure(path: &Path, message: String) -> SaveError {
    SaveError::WriteFailure {
        path: path.to_path_buf(),
        message,
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>, SaveError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| write_failure(path, format!("Failed to create file: {}", e)))
}

/// Export as an 8-bit PNG
fn export_png(image: &PixelBuffer, path: &Path) -> Result<(), SaveError> {
    let color_type = match image.channels() {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        _ => png::ColorType::Rgba,
    };

    let mut encoder = png::Encoder::new(create_file(path)?, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| write_failure(path, format!("Failed to write PNG header: {}", e)))?;
    writer
        .write_image_data(image.data())
        .map_err(|e| write_failure(path, format!("Failed to write PNG data: {}", e)))?;
    writer
        .finish()
        .map_err(|e| write_failure(path, format!("Failed to finish PNG: {}", e)))
}

/// Export as an 8-bit TIFF
fn export_tiff(image: &PixelBuffer, path: &Path) -> Result<(), SaveError> {
    use tiff::encoder::{colortype, TiffEncoder};

    if image.channels() == 2 {
        return Err(SaveError::UnsupportedFormat {
            extension: "tiff (gray+alpha)".to_string(),
        });
    }

    let mut encoder = TiffEncoder::new(create_file(path)?)
        .map_err(|e| write_failure(path, format!("Failed to create TIFF encoder: {}", e)))?;

    let (width, height, data) = (image.width(), image.height(), image.data());
    let written = match image.channels() {
        1 => encoder.write_image::<colortype::Gray8>(width, height, data),
        3 => encoder.write_image::<colortype::RGB8>(width, height, data),
        _ => encoder.write_image::<colortype::RGBA8>(width, height, data),
    };
    written.map_err(|e| write_failure(path, format!("Failed to write TIFF image: {}", e)))
}

/// JPEG output quality (0-100)
pub const JPEG_QUALITY: u8 = 90;

/// Drop the trailing alpha sample of every pixel.
fn strip_alpha(data: &[u8], channels: usize) -> Vec<u8> {
    data.chunks_exact(channels)
        .flat_map(|pixel| pixel[..channels - 1].iter().copied())
        .collect()
}

/// Export as 8-bit JPEG, BMP or TGA
///
/// JPEG has no alpha channel, so alpha is discarded there.
fn export_raster(image: &PixelBuffer, path: &Path, format: ImageFormat) -> Result<(), SaveError> {
    use image::codecs::{bmp::BmpEncoder, jpeg::JpegEncoder, tga::TgaEncoder};

    let (width, height) = (image.width(), image.height());
    let channels = image.channels();

    let stripped;
    let (data, color) = if format == ImageFormat::Jpeg && (channels == 2 || channels == 4) {
        stripped = strip_alpha(image.data(), channels as usize);
        (stripped.as_slice(), color_type(channels - 1))
    } else {
        (image.data(), color_type(channels))
    };

    let mut writer = create_file(path)?;
    let written = match codec_format(format) {
        Some(image::ImageFormat::Jpeg) => {
            JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
                .write_image(data, width, height, color)
        }
        Some(image::ImageFormat::Bmp) => {
            BmpEncoder::new(&mut writer).write_image(data, width, height, color)
        }
        Some(image::ImageFormat::Tga) => {
            TgaEncoder::new(&mut writer).write_image(data, width, height, color)
        }
        _ => {
            return Err(write_failure(
                path,
                format!("{:?} is not a raster codec format", format),
            ))
        }
    };

    written
        .map_err(|e| write_failure(path, format!("Failed to encode {:?} image: {}", format, e)))?;
    writer
        .flush()
        .map_err(|e| write_failure(path, format!("Failed to flush {:?} image: {}", format, e)))
}

fn color_type(channels: u8) -> ExtendedColorType {
    match channels {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        _ => ExtendedColorType::Rgba8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let pixels: Vec<[u8; 3]> = (0..width * height)
            .map(|i| [(i % 256) as u8, (i / 3 % 256) as u8, 200])
            .collect();
        PixelBuffer::from_rgb_pixels(width, height, &pixels)
    }

    #[test]
    fn test_save_png_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");

        let result = save_image(&gradient(10, 10), &path);

        assert!(result.is_ok(), "PNG export should succeed: {:?}", result);
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_save_tiff_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.TIF");

        let result = save_image(&gradient(10, 10), &path);

        assert!(result.is_ok(), "TIFF export should succeed: {:?}", result);
        assert!(path.exists());
    }

    #[test]
    fn test_save_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.webp");

        let err = save_image(&gradient(2, 2), &path).unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedFormat { ref extension } if extension == "webp"));
        assert!(!path.exists());
    }

    #[test]
    fn test_strip_alpha() {
        assert_eq!(strip_alpha(&[1, 2, 3, 255, 4, 5, 6, 0], 4), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(strip_alpha(&[9, 255, 8, 0], 2), vec![9, 8]);
    }

    #[test]
    fn test_save_raster_formats_success() {
        let dir = tempdir().unwrap();
        for name in ["out.jpg", "out.JPEG", "out.bmp", "out.tga"] {
            let path = dir.path().join(name);
            let result = save_image(&gradient(12, 8), &path);
            assert!(result.is_ok(), "{} export should succeed: {:?}", name, result);
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_save_invalid_buffer() {
        let dir = tempdir().unwrap();
        let image = PixelBuffer::new(4, 4, 3, vec![0; 10]);

        let err = save_image(&image, dir.path().join("bad.png")).unwrap_err();
        assert!(matches!(err, SaveError::InvalidImage { .. }));
    }

    #[test]
    fn test_save_gray_alpha_tiff_unsupported() {
        let dir = tempdir().unwrap();
        let image = PixelBuffer::new(1, 1, 2, vec![10, 255]);

        let err = save_image(&image, dir.path().join("ga.tiff")).unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_save_to_missing_directory() {
        let path = "/nonexistent/directory/out.png";

        let err = save_image(&gradient(2, 2), path).unwrap_err();
        assert!(matches!(err, SaveError::WriteFailure { .. }));
        assert!(err.to_string().contains("Failed to create file"));
    }
}
