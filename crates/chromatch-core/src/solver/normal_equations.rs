//! Closed-form solve of the per-channel normal equations.

use crate::error::NumericalError;
use crate::models::ColorCorrectionMatrix;

use super::SufficientStatistics;

/// Default upper bound on the 1-norm condition estimate of the Gram matrix
pub const DEFAULT_MAX_CONDITION_NUMBER: f64 = 1e10;

/// A squared pivot at or below this fraction of the largest Gram diagonal
/// entry counts as zero
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Cholesky factor `L` of a symmetric positive definite 3x3 matrix (`A = L L^T`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cholesky3 {
    lower: [[f64; 3]; 3],
}

impl Cholesky3 {
    /// Factor `a`, failing with `SingularSystem` when a pivot vanishes.
    #[allow(clippy::needless_range_loop)]
    pub fn factorize(a: &[[f64; 3]; 3]) -> Result<Self, NumericalError> {
        let scale = a[0][0].max(a[1][1]).max(a[2][2]);
        let tolerance = PIVOT_TOLERANCE * scale;
        let mut lower = [[0.0f64; 3]; 3];

        for j in 0..3 {
            let mut pivot = a[j][j];
            for k in 0..j {
                pivot -= lower[j][k] * lower[j][k];
            }
            if !pivot.is_finite() || pivot <= tolerance {
                return Err(NumericalError::SingularSystem {
                    reason: format!(
                        "Gram matrix is not positive definite (pivot {} is {:.3e}, tolerance {:.3e})",
                        j, pivot, tolerance
                    ),
                });
            }
            let diagonal = pivot.sqrt();
            lower[j][j] = diagonal;

            for i in (j + 1)..3 {
                let mut value = a[i][j];
                for k in 0..j {
                    value -= lower[i][k] * lower[j][k];
                }
                lower[i][j] = value / diagonal;
            }
        }

        Ok(Self { lower })
    }

    pub fn lower(&self) -> &[[f64; 3]; 3] {
        &self.lower
    }

    /// Solve `A x = b` by forward then backward substitution.
    #[allow(clippy::needless_range_loop)]
    pub fn solve(&self, b: [f64; 3]) -> [f64; 3] {
        let l = &self.lower;

        let mut y = [0.0f64; 3];
        for i in 0..3 {
            let mut value = b[i];
            for k in 0..i {
                value -= l[i][k] * y[k];
            }
            y[i] = value / l[i][i];
        }

        let mut x = [0.0f64; 3];
        for i in (0..3).rev() {
            let mut value = y[i];
            for k in (i + 1)..3 {
                value -= l[k][i] * x[k];
            }
            x[i] = value / l[i][i];
        }
        x
    }

    /// `A^-1`, one column per unit vector.
    pub fn inverse(&self) -> [[f64; 3]; 3] {
        let columns = [
            self.solve([1.0, 0.0, 0.0]),
            self.solve([0.0, 1.0, 0.0]),
            self.solve([0.0, 0.0, 1.0]),
        ];
        let mut inverse = [[0.0f64; 3]; 3];
        for (j, column) in columns.iter().enumerate() {
            for (i, value) in column.iter().enumerate() {
                inverse[i][j] = *value;
            }
        }
        inverse
    }
}

/// Maximum absolute column sum
fn norm_1(m: &[[f64; 3]; 3]) -> f64 {
    (0..3)
        .map(|j| m[0][j].abs() + m[1][j].abs() + m[2][j].abs())
        .fold(0.0, f64::max)
}

/// `||A||_1 * ||A^-1||_1`
pub(crate) fn condition_number_1(a: &[[f64; 3]; 3], inverse: &[[f64; 3]; 3]) -> f64 {
    norm_1(a) * norm_1(inverse)
}

/// A solved system together with its conditioning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub matrix: ColorCorrectionMatrix,
    /// 1-norm condition estimate of the Gram matrix
    pub condition_number: f64,
}

/// Solves `A * row_c = b_c` for each output channel `c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalEquationsSolver {
    max_condition_number: f64,
}

impl Default for NormalEquationsSolver {
    fn default() -> Self {
        Self {
            max_condition_number: DEFAULT_MAX_CONDITION_NUMBER,
        }
    }
}

impl NormalEquationsSolver {
    pub fn new(max_condition_number: f64) -> Self {
        Self {
            max_condition_number,
        }
    }

    pub fn max_condition_number(&self) -> f64 {
        self.max_condition_number
    }

    /// Fit the matrix. Fails rather than regularizing when the source
    /// samples span fewer than three independent directions.
    pub fn solve(&self, stats: &SufficientStatistics) -> Result<ColorCorrectionMatrix, NumericalError> {
        self.solve_detailed(stats).map(|solution| solution.matrix)
    }

    /// Like `solve`, also returning the condition estimate.
    pub fn solve_detailed(&self, stats: &SufficientStatistics) -> Result<Solution, NumericalError> {
        if stats.is_empty() {
            return Err(NumericalError::SingularSystem {
                reason: "no samples were accumulated".to_string(),
            });
        }

        let gram = stats.gram();
        let factor = Cholesky3::factorize(gram)?;
        let condition_number = condition_number_1(gram, &factor.inverse());
        log::debug!(
            "Gram matrix condition estimate {:.3e} (limit {:.3e})",
            condition_number,
            self.max_condition_number
        );

        if !condition_number.is_finite() || condition_number > self.max_condition_number {
            return Err(NumericalError::SingularSystem {
                reason: format!(
                    "condition estimate {:.3e} exceeds limit {:.3e}",
                    condition_number, self.max_condition_number
                ),
            });
        }

        let matrix = ColorCorrectionMatrix::from_rows([
            factor.solve(stats.cross(0)),
            factor.solve(stats.cross(1)),
            factor.solve(stats.cross(2)),
        ]);

        if !matrix.is_finite() {
            return Err(NumericalError::SingularSystem {
                reason: "solution contains non-finite values".to_string(),
            });
        }

        Ok(Solution {
            matrix,
            condition_number,
        })
    }
}
