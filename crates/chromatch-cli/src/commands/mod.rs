//! Command implementations for the chromatch CLI.

mod apply;
mod solve;

pub use apply::cmd_apply;
pub use solve::{cmd_solve, SolveArgs};

use chromatch_core::config::CorrectionDefaults;
use chromatch_core::{CorrectionOptions, Parallelism};

use crate::error::CommandError;
use crate::report::Reporter;

/// Settings shared by every command, resolved from config and flags
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub options: CorrectionOptions,
    pub matrix_precision: usize,
    pub reporter: Reporter,
}

impl RunSettings {
    /// Config defaults, with `--parallel` forcing the parallel mode on.
    pub fn new(defaults: &CorrectionDefaults, parallel_flag: bool, silent: bool) -> Self {
        let mut options = CorrectionOptions::from_defaults(defaults);
        if parallel_flag {
            options.parallelism = Parallelism::Parallel {
                min_pixels: defaults.parallel_threshold,
            };
        }
        Self {
            options,
            matrix_precision: defaults.matrix_precision,
            reporter: Reporter::new(silent),
        }
    }
}

/// Size the global rayon pool.
pub fn configure_threads(num_threads: usize) -> Result<(), CommandError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .map_err(|e| CommandError::ThreadPool(e.to_string()))?;
    log::info!("Using {} threads for parallel processing", num_threads);
    Ok(())
}
