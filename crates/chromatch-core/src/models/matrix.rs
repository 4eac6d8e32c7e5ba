//! The fitted 3x3 color correction matrix.

use std::fmt;

use super::ColorSample;

/// A strictly linear RGB transform: `corrected = M * source`
///
/// Row `r` holds the weights of the source channels that produce output
/// channel `r`. There is no offset term. The value is immutable once built;
/// the solver is the normal producer, `from_rows` exists for known transforms
/// and persisted matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCorrectionMatrix {
    rows: [[f64; 3]; 3],
}

impl ColorCorrectionMatrix {
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Build from nine values in row-major order.
    pub fn from_row_major(values: [f64; 9]) -> Self {
        Self {
            rows: [
                [values[0], values[1], values[2]],
                [values[3], values[4], values[5]],
                [values[6], values[7], values[8]],
            ],
        }
    }

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.rows
    }

    pub fn row(&self, channel: usize) -> [f64; 3] {
        self.rows[channel]
    }

    /// Flatten to nine values in row-major order (the persisted layout).
    pub fn to_row_major(&self) -> [f64; 9] {
        let [r, g, b] = self.rows;
        [r[0], r[1], r[2], g[0], g[1], g[2], b[0], b[1], b[2]]
    }

    /// Matrix-vector product. No clamping happens here.
    #[inline]
    pub fn apply(&self, color: ColorSample) -> ColorSample {
        let [r, g, b] = color.0;
        let m = &self.rows;
        ColorSample([
            m[0][0] * r + m[0][1] * g + m[0][2] * b,
            m[1][0] * r + m[1][1] * g + m[1][2] * b,
            m[2][0] * r + m[2][1] * g + m[2][2] * b,
        ])
    }

    /// Largest absolute element-wise difference to another matrix.
    pub fn max_abs_difference(&self, other: &Self) -> f64 {
        self.to_row_major()
            .iter()
            .zip(other.to_row_major().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    pub fn is_finite(&self) -> bool {
        self.to_row_major().iter().all(|v| v.is_finite())
    }
}

impl Default for ColorCorrectionMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for ColorCorrectionMatrix {
    /// One row per line; honours the formatter precision (default 6).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(6);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "[{:>w$.p$}, {:>w$.p$}, {:>w$.p$}]",
                row[0],
                row[1],
                row[2],
                w = precision + 4,
                p = precision
            )?;
        }
        Ok(())
    }
}
