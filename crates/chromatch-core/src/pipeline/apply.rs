//! Mapping whole images through a correction matrix.

use crate::error::{ImageRole, ValidationError};
use crate::models::{ColorCorrectionMatrix, ColorSample, PixelBuffer};
use crate::parallel::{for_each_block_pair, Parallelism};

/// Pixels per block handed to a worker
pub const APPLY_BLOCK_PIXELS: usize = 256;

/// Correct one pixel: normalize, multiply, clamp to 0-1, scale, round.
#[inline(always)]
pub fn correct_pixel(matrix: &ColorCorrectionMatrix, rgb: &[u8]) -> [u8; 3] {
    matrix.apply(ColorSample::from_bytes(rgb)).to_bytes()
}

/// Apply `matrix` to every pixel of a 3-channel image, single-threaded.
pub fn apply_matrix(
    image: &PixelBuffer,
    matrix: &ColorCorrectionMatrix,
) -> Result<PixelBuffer, ValidationError> {
    apply_matrix_with(image, matrix, Parallelism::Sequential)
}

/// Apply `matrix` to every pixel with the requested execution mode.
///
/// The input is left untouched; the result is a new buffer of the same
/// shape. Each output channel is clamped independently before quantization.
pub fn apply_matrix_with(
    image: &PixelBuffer,
    matrix: &ColorCorrectionMatrix,
    parallelism: Parallelism,
) -> Result<PixelBuffer, ValidationError> {
    image.validate_rgb(ImageRole::Input)?;

    let fan_out = parallelism.fans_out(image.pixel_count());
    let mut corrected = vec![0u8; image.data().len()];

    for_each_block_pair(
        image.data(),
        &mut corrected,
        APPLY_BLOCK_PIXELS * 3,
        fan_out,
        |source, output| {
            for (src, dst) in source.chunks_exact(3).zip(output.chunks_exact_mut(3)) {
                dst.copy_from_slice(&correct_pixel(matrix, src));
            }
        },
    );

    log::debug!(
        "Applied correction to {}x{} image ({} mode)",
        image.width(),
        image.height(),
        if fan_out { "parallel" } else { "sequential" }
    );

    Ok(PixelBuffer::new(
        image.width(),
        image.height(),
        PixelBuffer::RGB_CHANNELS,
        corrected,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE_UP: ColorCorrectionMatrix =
        ColorCorrectionMatrix::from_rows([[1.5, 0.0, 0.0], [0.0, 1.5, 0.0], [0.0, 0.0, 1.5]]);

    #[test]
    fn test_identity_preserves_bytes() {
        let image = PixelBuffer::from_rgb_pixels(2, 2, &[[0, 1, 2], [127, 128, 129], [250, 251, 252], [255, 0, 255]]);
        let corrected = apply_matrix(&image, &ColorCorrectionMatrix::IDENTITY).unwrap();
        assert_eq!(corrected, image);
    }

    #[test]
    fn test_clamps_high_values_to_255() {
        let image = PixelBuffer::from_rgb_pixels(1, 1, &[[250, 240, 100]]);
        let corrected = apply_matrix(&image, &SCALE_UP).unwrap();
        assert_eq!(corrected.data(), &[255, 255, 150]);
    }

    #[test]
    fn test_clamps_negative_values_to_zero() {
        let swap_negative = ColorCorrectionMatrix::from_rows([
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, -2.0],
            [0.0, 0.0, 1.0],
        ]);
        let image = PixelBuffer::from_rgb_pixels(1, 1, &[[200, 50, 100]]);
        let corrected = apply_matrix(&image, &swap_negative).unwrap();
        assert_eq!(corrected.data(), &[0, 0, 100]);
    }

    #[test]
    fn test_channels_clamp_independently() {
        // Only red overflows; green and blue must not be rescaled with it
        let red_boost = ColorCorrectionMatrix::from_rows([
            [3.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        let image = PixelBuffer::from_rgb_pixels(1, 1, &[[200, 60, 30]]);
        let corrected = apply_matrix(&image, &red_boost).unwrap();
        assert_eq!(corrected.data(), &[255, 60, 30]);
    }

    #[test]
    fn test_rejects_non_rgb_input() {
        let image = PixelBuffer::new(1, 1, 4, vec![1, 2, 3, 4]);
        let err = apply_matrix(&image, &ColorCorrectionMatrix::IDENTITY).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ChannelMismatch {
                image: ImageRole::Input,
                expected: 3,
                found: 4,
            }
        );
    }

    #[test]
    fn test_rejects_invalid_input() {
        let image = PixelBuffer::new(3, 0, 3, Vec::new());
        let err = apply_matrix(&image, &ColorCorrectionMatrix::IDENTITY).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidImage { .. }));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let width = 300;
        let height = 120;
        let pixels: Vec<[u8; 3]> = (0..width * height)
            .map(|i| [(i % 256) as u8, ((i * 7) % 256) as u8, ((i * 13) % 256) as u8])
            .collect();
        let image = PixelBuffer::from_rgb_pixels(width, height, &pixels);
        let matrix = ColorCorrectionMatrix::from_rows([
            [0.9, 0.2, -0.1],
            [0.05, 1.1, 0.0],
            [-0.2, 0.1, 1.3],
        ]);

        let sequential = apply_matrix(&image, &matrix).unwrap();
        let parallel =
            apply_matrix_with(&image, &matrix, Parallelism::Parallel { min_pixels: 1 }).unwrap();
        assert_eq!(sequential, parallel);
    }
}
