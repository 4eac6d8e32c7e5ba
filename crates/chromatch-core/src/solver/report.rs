//! Residual summary computed from the sufficient statistics.

use crate::models::ColorCorrectionMatrix;

use super::SufficientStatistics;

/// Goodness of fit of a matrix against the accumulated correspondences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    /// Number of pixel correspondences
    pub samples: u64,

    /// Per-channel residual sum of squares (normalized units)
    pub residual_sum_squares: [f64; 3],

    /// Per-channel root mean square error (normalized units)
    pub rms_error: [f64; 3],

    /// Half the total residual sum of squares
    pub cost: f64,
}

impl FitReport {
    /// RMS error over all three channels
    pub fn overall_rms(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        let total: f64 = self.residual_sum_squares.iter().sum();
        (total / (3 * self.samples) as f64).sqrt()
    }
}

impl SufficientStatistics {
    /// Evaluate `matrix` against these statistics without revisiting pixels.
    ///
    /// Uses `RSS_c = sum t_c^2 - 2 row_c . b_c + row_c^T A row_c`, clamped at
    /// zero to absorb cancellation on near-perfect fits.
    pub fn fit_report(&self, matrix: &ColorCorrectionMatrix) -> FitReport {
        let gram = self.gram();
        let energy = self.target_energy();
        let mut residual_sum_squares = [0.0f64; 3];

        for (c, rss) in residual_sum_squares.iter_mut().enumerate() {
            let row = matrix.row(c);
            let b = self.cross(c);

            let linear: f64 = (0..3).map(|j| row[j] * b[j]).sum();
            let quadratic: f64 = (0..3)
                .map(|i| (0..3).map(|j| row[i] * gram[i][j] * row[j]).sum::<f64>())
                .sum();

            *rss = (energy[c] - 2.0 * linear + quadratic).max(0.0);
        }

        let rms_error = if self.samples() == 0 {
            [0.0; 3]
        } else {
            let n = self.samples() as f64;
            residual_sum_squares.map(|rss| (rss / n).sqrt())
        };

        FitReport {
            samples: self.samples(),
            residual_sum_squares,
            rms_error,
            cost: 0.5 * residual_sum_squares.iter().sum::<f64>(),
        }
    }
}
