//! Error types for chromatch operations
//!
//! Validation and numerical failures are raised by the core pipeline. Load,
//! save and matrix file errors belong to the image source/sink and the
//! persistence layer; the core only propagates them.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which buffer a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The image whose colors are being mapped
    Start,
    /// The image whose colors are the regression target
    Target,
    /// A single image handed to the applier
    Input,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Target => "target",
            Self::Input => "input",
        };
        f.write_str(name)
    }
}

/// Input rejected before any numerical work was done
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Start and target images differ in width or height
    #[error(
        "Images must have the same dimensions: start={}x{}, target={}x{}",
        .start.0, .start.1, .target.0, .target.1
    )]
    DimensionMismatch {
        start: (u32, u32),
        target: (u32, u32),
    },

    /// An image does not carry exactly the expected number of channels
    #[error("The {image} image must have {expected} channels, but has {found}")]
    ChannelMismatch {
        image: ImageRole,
        expected: u8,
        found: u8,
    },

    /// An image has zero extent or a data length inconsistent with its shape
    #[error("The {image} image is invalid: {reason}")]
    InvalidImage { image: ImageRole, reason: String },
}

/// Failure while solving the normal equations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// The Gram matrix is singular or too ill-conditioned to solve reliably
    #[error("Color samples do not span three independent directions: {reason}")]
    SingularSystem { reason: String },
}

/// Umbrella error for the estimate/apply pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrectionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Numerical(#[from] NumericalError),
}

/// Failure reading an image file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open image '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No file extension found for '{}'", .path.display())]
    MissingExtension { path: PathBuf },

    #[error(
        "Unsupported image format '{extension}' (supported: {})",
        crate::decoders::supported_list()
    )]
    UnsupportedFormat { extension: String },

    #[error("Failed to decode image '{}': {message}", .path.display())]
    Decode { path: PathBuf, message: String },
}

/// Failure writing an image file
#[derive(Error, Debug)]
pub enum SaveError {
    #[error(
        "Unsupported output format '{extension}' (supported: {})",
        crate::decoders::supported_list()
    )]
    UnsupportedFormat { extension: String },

    #[error("Cannot save invalid image data to '{}': {reason}", .path.display())]
    InvalidImage { path: PathBuf, reason: String },

    #[error("Failed to save image to '{}': {message}", .path.display())]
    WriteFailure { path: PathBuf, message: String },
}

/// Failure reading or writing a persisted matrix
#[derive(Error, Debug)]
pub enum MatrixFileError {
    #[error("Failed to read matrix file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write matrix file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse matrix file '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize matrix: {message}")]
    Serialize { message: String },

    #[error("Unsupported matrix file format '{extension}' (supported: json, yml, yaml)")]
    UnsupportedFormat { extension: String },
}
