//! Application-level configuration.
//!
//! - [`RunParams`]: loop control for a generation run (turn bound, timeouts, retries)

pub mod run_params;

pub use run_params::RunParams;
