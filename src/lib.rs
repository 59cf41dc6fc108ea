//! lsqcalc - least-squares line fitting and standard-error calculator
//!
//! Fits `y = ax + b` to (x, y) points or to directly entered sums, with
//! standard errors for both coefficients, a per-point derivation table and
//! undo/redo over point edits. A second calculator summarises independent
//! lists of values by mean, sample standard deviation and standard error.

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod format;
pub mod import;
pub mod json_output;
pub mod regression;
pub mod repl;
pub mod sample_stats;
pub mod text_output;
