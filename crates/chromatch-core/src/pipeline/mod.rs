//! End-to-end correction pipeline
//!
//! Source buffers -> accumulation -> normal-equation solve -> matrix ->
//! application. Every stage either produces its full output or fails with a
//! single classified error; nothing partial escapes.

mod apply;


pub use apply::{apply_matrix, apply_matrix_with, correct_pixel, APPLY_BLOCK_PIXELS};

use crate::config::CorrectionDefaults;
use crate::error::CorrectionError;
use crate::models::{ColorCorrectionMatrix, PixelBuffer};
use crate::parallel::Parallelism;
use crate::solver::{
    accumulate_with, FitReport, NormalEquationsSolver, DEFAULT_MAX_CONDITION_NUMBER,
};

/// Knobs for a correction run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionOptions {
    pub parallelism: Parallelism,
    pub max_condition_number: f64,
}

impl Default for CorrectionOptions {
    fn default() -> Self {
        Self {
            parallelism: Parallelism::Sequential,
            max_condition_number: DEFAULT_MAX_CONDITION_NUMBER,
        }
    }
}

impl CorrectionOptions {
    /// Options as configured in the loaded config file.
    pub fn from_defaults(defaults: &CorrectionDefaults) -> Self {
        Self {
            parallelism: Parallelism::from_flag(defaults.parallel, defaults.parallel_threshold),
            max_condition_number: defaults.max_condition_number,
        }
    }

    pub fn solver(&self) -> NormalEquationsSolver {
        NormalEquationsSolver::new(self.max_condition_number)
    }
}

/// A fitted matrix with its diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub matrix: ColorCorrectionMatrix,
    /// 1-norm condition estimate of the Gram matrix
    pub condition_number: f64,
    pub report: FitReport,
}

/// Fit the matrix mapping `start` colors onto `target` colors.
pub fn estimate(
    start: &PixelBuffer,
    target: &PixelBuffer,
    options: &CorrectionOptions,
) -> Result<Estimate, CorrectionError> {
    log::info!("Accumulating pixel correspondences");
    let stats = accumulate_with(start, target, options.parallelism)?;

    log::info!("Solving normal equations");
    let solution = options.solver().solve_detailed(&stats)?;
    let report = stats.fit_report(&solution.matrix);
    log::debug!(
        "Fit over {} samples: cost {:.6e}, rms [{:.6}, {:.6}, {:.6}]",
        report.samples,
        report.cost,
        report.rms_error[0],
        report.rms_error[1],
        report.rms_error[2]
    );

    Ok(Estimate {
        matrix: solution.matrix,
        condition_number: solution.condition_number,
        report,
    })
}

/// Fit the matrix and apply it to `start`, returning both.
pub fn correct(
    start: &PixelBuffer,
    target: &PixelBuffer,
    options: &CorrectionOptions,
) -> Result<(Estimate, PixelBuffer), CorrectionError> {
    let estimate = estimate(start, target, options)?;
    log::info!("Applying correction matrix");
    let corrected = apply_matrix_with(start, &estimate.matrix, options.parallelism)?;
    Ok((estimate, corrected))
}
