//! Errors surfaced by CLI commands

use chromatch_core::{CorrectionError, LoadError, MatrixFileError, SaveError, ValidationError};
use thiserror::Error;

/// Anything that makes a command exit with status 1
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    MatrixFile(#[from] MatrixFileError),

    #[error(transparent)]
    Correction(#[from] CorrectionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to configure thread pool: {0}")]
    ThreadPool(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
}
