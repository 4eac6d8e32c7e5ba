//! Least-squares estimation of the color correction matrix
//!
//! The fit minimizes `sum ||M * s - t||^2` over all pixel correspondences.
//! That objective separates into one independent problem per output channel,
//! all sharing the Gram matrix of the source samples, so the accumulator only
//! keeps fixed-size sufficient statistics and the solver factors the Gram
//! matrix once for all three rows.

mod accumulate;
mod normal_equations;
mod report;


pub use accumulate::{
    accumulate, accumulate_with, validate_pair, SufficientStatistics, ACCUMULATION_BLOCK_PIXELS,
};
pub use normal_equations::{
    Cholesky3, NormalEquationsSolver, Solution, DEFAULT_MAX_CONDITION_NUMBER, PIVOT_TOLERANCE,
};
pub use report::FitReport;
