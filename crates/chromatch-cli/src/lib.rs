//! Shared pieces of the chromatch command-line front end
//!
//! Command implementations, console reporting and the stderr log backend
//! live here so they can be exercised without spawning the binary.

pub mod commands;
pub mod error;
pub mod logging;
pub mod report;

pub use commands::{cmd_apply, cmd_solve, configure_threads, RunSettings, SolveArgs};
pub use error::CommandError;
pub use report::Reporter;
