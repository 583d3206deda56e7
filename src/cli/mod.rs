// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for scoring a CSV file.
//!
//! This module contains the command-line interface logic, including argument parsing,
//! console logging and the scoring run itself.

// Modules
/// CLI arguments.
pub mod args;

/// Console logging macros.
pub mod logging;

/// Scoring run.
pub mod score;
