// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Regression Inference
//!
//! Score the rows of a CSV file with an exported regression model running on
//! [ONNX Runtime](https://onnxruntime.ai), and summarise how far the rounded
//! predictions are from the labels.
//!
//! The bundled defaults target a wine-quality DNN regressor: twelve
//! physicochemical measurements go in as named scalar feeds, one quality
//! score comes out of `dnn/head/logits:0`.
//!
//! ## Input Format
//!
//! A header line followed by data lines of exactly 15 comma-separated fields
//! (no quoting):
//!
//! | Column | Content |
//! |--------|---------|
//! | 0 | Row identifier (not parsed) |
//! | 1-12 | Model inputs, see [`FEATURE_NAMES`] |
//! | 13 | Ground-truth label |
//! | 14 | Reference prediction from an earlier run |
//!
//! Blank lines are ignored. Lines with the wrong number of fields or a
//! non-numeric value are reported on stderr and skipped.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Score the default file with the default model directory
//! regression-inference
//!
//! # Pick model directory and CSV file
//! regression-inference --saved_model saved_models/1513701267 wine_test_predicted.csv
//!
//! # Percentages over scored rows instead of all lines
//! regression-inference -s models/wine --percent-of scored data.csv
//! ```
//!
//! **CLI Options:**
//!
//! | Option | Short | Description | Default |
//! |--------|-------|-------------|---------|
//! | `--saved_model` | `-s` | Model directory | `saved_models/1513701267` |
//! | `CSV_FILE` | | CSV file to score | `wine_test_predicted.csv` |
//! | `--tag` | | Serving tag (selects `<tag>.onnx`) | `serve` |
//! | `--fetch` | | Output node | `dnn/head/logits:0` |
//! | `--tolerance` | | Max deviation from reference for `OK` | `0.00001` |
//! | `--percent-of` | | Summary denominator, `lines` or `scored` | `lines` |
//! | `--threads` | | ONNX Runtime intra-op threads | `0` |
//! | `--verbose` | | Header and timing output | `false` |
//!
//! Exit code is `0` on success and `-1` when the model directory or CSV file
//! can't be read or the model fails to load.
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use std::io;
//! use regression_inference::{InferenceConfig, RegressionModel, score_file};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InferenceConfig::new();
//!     let mut model = RegressionModel::load_with_config("saved_models/1513701267", &config)?;
//!
//!     let mut out = io::stdout().lock();
//!     let report = score_file("wine_test_predicted.csv", &mut model, &config, &mut out)?;
//!     report.write_summary(config.percent_base, &mut out)?;
//!     Ok(())
//! }
//! ```
//!
//! Any `FnMut(&Features) -> Result<f32>` is a [`Regressor`], which makes it
//! easy to drive the scoring loop without a model:
//!
//! ```rust
//! use std::io::Cursor;
//! use regression_inference::{Features, InferenceConfig, Result, score_reader};
//!
//! let csv = "header\nx,1,7.0,0.3,0.2,5.0,0.05,15,50,0.99,3.2,0.6,9.5,6,6.1\n";
//! let mut stub = |_: &Features| -> Result<f32> { Ok(6.05) };
//! let mut out = Vec::new();
//! let report = score_reader(Cursor::new(csv), &mut stub, &InferenceConfig::new(), &mut out)?;
//! assert_eq!(report.buckets.count(0), 1);
//! # Ok::<(), regression_inference::InferenceError>(())
//! ```
//!
//! ## Model Directory
//!
//! The serving tag selects `<dir>/<tag>.onnx`. A directory holding a single
//! `.onnx` file is used as is. Graph inputs may be named `alcohol` or
//! `alcohol:0`.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | [`RegressionModel`] and the [`Regressor`] trait |
//! | [`scoring`] | Row-by-row scoring ([`score_reader`], [`ScoreReport`]) |
//! | [`row`] | CSV line parsing ([`Row`], [`RowError`]) |
//! | [`features`] | Named model inputs ([`Features`]) |
//! | [`stats`] | Rounded error buckets ([`ErrorBuckets`]) |
//! | [`inference`] | [`InferenceConfig`] |
//! | [`error`] | Error types ([`InferenceError`], [`Result`]) |
//! | [`cli`] | Command-line interface |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cuda` | NVIDIA CUDA execution provider |
//! | `coreml` | Apple `CoreML` execution provider |

// Modules
pub mod cli;
pub mod error;
pub mod features;
pub mod inference;
pub mod model;
pub mod row;
pub mod scoring;
pub mod stats;

// Re-export main types for convenience
pub use error::{InferenceError, Result};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, Features};
pub use inference::InferenceConfig;
pub use model::{RegressionModel, Regressor};
pub use row::{COLUMN_COUNT, Row, RowError, parse_line};
pub use scoring::{ScoreReport, Scored, score_file, score_reader};
pub use stats::{ErrorBuckets, PercentBase};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
