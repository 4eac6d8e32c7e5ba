//! Matrix file management
//!
//! Save and load fitted matrices as JSON or YAML. The format follows the
//! file extension; values are stored row-major.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decoders::file_extension;
use crate::error::MatrixFileError;
use crate::models::ColorCorrectionMatrix;

/// Layout tag written to every matrix file
pub const ROW_MAJOR_LAYOUT: &str = "row-major";

/// On-disk representation of a correction matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixFile {
    pub layout: String,
    pub values: Vec<f64>,
}

impl From<&ColorCorrectionMatrix> for MatrixFile {
    fn from(matrix: &ColorCorrectionMatrix) -> Self {
        Self {
            layout: ROW_MAJOR_LAYOUT.to_string(),
            values: matrix.to_row_major().to_vec(),
        }
    }
}

impl MatrixFile {
    /// Check the layout tag and values and build the matrix.
    pub fn into_matrix(self) -> Result<ColorCorrectionMatrix, String> {
        if self.layout != ROW_MAJOR_LAYOUT {
            return Err(format!(
                "unsupported layout '{}' (expected '{}')",
                self.layout, ROW_MAJOR_LAYOUT
            ));
        }
        let values: [f64; 9] = self
            .values
            .as_slice()
            .try_into()
            .map_err(|_| format!("expected 9 values, found {}", self.values.len()))?;
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(format!("matrix values must be finite, found {}", bad));
        }
        Ok(ColorCorrectionMatrix::from_row_major(values))
    }
}

enum MatrixFormat {
    Json,
    Yaml,
}

fn matrix_format(path: &Path) -> Result<MatrixFormat, MatrixFileError> {
    match file_extension(path).unwrap_or_default().as_str() {
        "json" => Ok(MatrixFormat::Json),
        "yml" | "yaml" => Ok(MatrixFormat::Yaml),
        other => Err(MatrixFileError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Save a matrix to a JSON or YAML file
pub fn save_matrix<P: AsRef<Path>>(
    matrix: &ColorCorrectionMatrix,
    path: P,
) -> Result<(), MatrixFileError> {
    let path = path.as_ref();
    let file = MatrixFile::from(matrix);

    let contents = match matrix_format(path)? {
        MatrixFormat::Json => serde_json::to_string_pretty(&file).map_err(|e| {
            MatrixFileError::Serialize {
                message: e.to_string(),
            }
        })?,
        MatrixFormat::Yaml => {
            serde_yaml::to_string(&file).map_err(|e| MatrixFileError::Serialize {
                message: e.to_string(),
            })?
        }
    };

    std::fs::write(path, contents).map_err(|source| MatrixFileError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Saved matrix to {}", path.display());
    Ok(())
}

/// Load a matrix from a JSON or YAML file
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<ColorCorrectionMatrix, MatrixFileError> {
    let path = path.as_ref();
    let format = matrix_format(path)?;
    let contents = std::fs::read_to_string(path).map_err(|source| MatrixFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| MatrixFileError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let file: MatrixFile = match format {
        MatrixFormat::Json => {
            serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
        }
        MatrixFormat::Yaml => {
            serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
        }
    };

    file.into_matrix().map_err(parse_error)
}
