use std::path::PathBuf;

use chromatch_core::{apply_matrix_with, estimate, load_image, save_image, save_matrix, Estimate};

use super::RunSettings;
use crate::error::CommandError;
use crate::report::{format_fit_summary, format_image_info, format_matrix};

/// Paths for a solve run
#[derive(Debug, Clone)]
pub struct SolveArgs {
    pub start: PathBuf,
    pub target: PathBuf,
    pub output: Option<PathBuf>,
    pub save_matrix: Option<PathBuf>,
}

/// Fit the matrix mapping `start` onto `target`, then optionally persist it
/// and write the corrected start image.
pub fn cmd_solve(args: &SolveArgs, settings: &RunSettings) -> Result<Estimate, CommandError> {
    let reporter = settings.reporter;

    let start = load_image(&args.start)?;
    reporter.line(format_image_info("Start", &args.start, &start));
    let target = load_image(&args.target)?;
    reporter.line(format_image_info("Target", &args.target, &target));

    let estimate = estimate(&start, &target, &settings.options)?;
    reporter.line(format_matrix(&estimate.matrix, settings.matrix_precision));
    reporter.line(format_fit_summary(&estimate));

    if let Some(path) = &args.save_matrix {
        save_matrix(&estimate.matrix, path)?;
        reporter.line(format!("Saved matrix to {}", path.display()));
    }

    match &args.output {
        Some(output) => {
            let corrected =
                apply_matrix_with(&start, &estimate.matrix, settings.options.parallelism)?;
            save_image(&corrected, output)?;
            reporter.line(format!("Saved corrected image to {}", output.display()));
        }
        None => reporter.line("Matrix solved but not applied (no output path given)"),
    }

    Ok(estimate)
}
