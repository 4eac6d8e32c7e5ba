//! Chromatch Core Library
//!
//! Least-squares color matching: estimate the 3x3 matrix that best maps the
//! colors of one image onto the corresponding pixels of another, then apply
//! that matrix to 8-bit RGB buffers.

pub mod config;
pub mod decoders;
pub mod error;
pub mod exporters;
pub mod models;
pub mod parallel;
pub mod persistence;
pub mod pipeline;
pub mod solver;

// Re-export commonly used types
pub use decoders::{load_image, ImageFormat, SUPPORTED_EXTENSIONS};
pub use error::{
    CorrectionError, ImageRole, LoadError, MatrixFileError, NumericalError, SaveError,
    ValidationError,
};
pub use exporters::save_image;
pub use models::{ColorCorrectionMatrix, ColorSample, PixelBuffer};
pub use parallel::Parallelism;
pub use persistence::{load_matrix, save_matrix};
pub use pipeline::{
    apply_matrix, apply_matrix_with, correct, estimate, CorrectionOptions, Estimate,
};
pub use solver::{
    accumulate, accumulate_with, FitReport, NormalEquationsSolver, SufficientStatistics,
};
