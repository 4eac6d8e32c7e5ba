use std::path::Path;

use chromatch_core::{apply_matrix_with, load_image, load_matrix, save_image, PixelBuffer};

use super::RunSettings;
use crate::error::CommandError;
use crate::report::{format_image_info, format_matrix};

/// Apply a saved matrix to `input` and write the result to `output`.
pub fn cmd_apply(
    input: &Path,
    matrix_path: &Path,
    output: &Path,
    settings: &RunSettings,
) -> Result<PixelBuffer, CommandError> {
    let reporter = settings.reporter;

    let image = load_image(input)?;
    reporter.line(format_image_info("Input", input, &image));

    let matrix = load_matrix(matrix_path)?;
    reporter.line(format!("Loaded matrix from {}", matrix_path.display()));
    reporter.line(format_matrix(&matrix, settings.matrix_precision));

    let corrected = apply_matrix_with(&image, &matrix, settings.options.parallelism)?;
    save_image(&corrected, output)?;
    reporter.line(format!("Saved corrected image to {}", output.display()));

    Ok(corrected)
}
