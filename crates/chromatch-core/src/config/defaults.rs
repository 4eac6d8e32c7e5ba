//! Default correction parameters and their sanitization.

use serde::Deserialize;

use crate::parallel::PARALLEL_THRESHOLD;
use crate::solver::DEFAULT_MAX_CONDITION_NUMBER;

/// Decimal places used when printing a matrix
pub const DEFAULT_MATRIX_PRECISION: usize = 6;

/// Tunable defaults read from the `defaults:` section of the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorrectionDefaults {
    /// Spread accumulation and application over the rayon pool
    pub parallel: bool,
    /// Minimum pixel count before parallel mode fans out
    pub parallel_threshold: usize,
    /// Upper bound on the Gram matrix condition estimate
    pub max_condition_number: f64,
    /// Decimal places for console matrix output
    pub matrix_precision: usize,
}

impl Default for CorrectionDefaults {
    fn default() -> Self {
        Self {
            parallel: false,
            parallel_threshold: PARALLEL_THRESHOLD,
            max_condition_number: DEFAULT_MAX_CONDITION_NUMBER,
            matrix_precision: DEFAULT_MATRIX_PRECISION,
        }
    }
}

impl CorrectionDefaults {
    /// Replace out-of-range values with usable ones.
    pub fn sanitize(&mut self) {
        self.parallel_threshold = self.parallel_threshold.max(1);
        if !self.max_condition_number.is_finite() || self.max_condition_number < 1.0 {
            self.max_condition_number = DEFAULT_MAX_CONDITION_NUMBER;
        }
        self.matrix_precision = self.matrix_precision.clamp(1, 12);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_fixes_out_of_range_values() {
        let mut defaults = CorrectionDefaults {
            parallel: true,
            parallel_threshold: 0,
            max_condition_number: f64::NAN,
            matrix_precision: 40,
        };
        defaults.sanitize();

        assert!(defaults.parallel);
        assert_eq!(defaults.parallel_threshold, 1);
        assert_eq!(defaults.max_condition_number, DEFAULT_MAX_CONDITION_NUMBER);
        assert_eq!(defaults.matrix_precision, 12);
    }

    #[test]
    fn test_sanitize_rejects_condition_below_one() {
        let mut defaults = CorrectionDefaults {
            max_condition_number: 0.5,
            ..CorrectionDefaults::default()
        };
        defaults.sanitize();
        assert_eq!(defaults.max_condition_number, DEFAULT_MAX_CONDITION_NUMBER);
    }

    #[test]
    fn test_sanitize_keeps_valid_values() {
        let mut defaults = CorrectionDefaults {
            parallel: false,
            parallel_threshold: 1024,
            max_condition_number: 1e8,
            matrix_precision: 3,
        };
        let before = defaults.clone();
        defaults.sanitize();
        assert_eq!(defaults, before);
    }
}
