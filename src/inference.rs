// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Inference configuration.
//!
//! This module defines the [`InferenceConfig`] struct, which controls how the
//! model is loaded (serving tag, output node, runtime threads) and how scored
//! rows are judged and summarised.

use crate::stats::PercentBase;

/// Serving tag the model is exported with by default.
pub const DEFAULT_TAG: &str = "serve";

/// Output node holding the regression result.
pub const DEFAULT_FETCH: &str = "dnn/head/logits:0";

/// Maximum deviation from the reference prediction still reported as `OK`.
pub const DEFAULT_TOLERANCE: f32 = 0.000_01;

/// Configuration for scoring a CSV file.
///
/// # Example
///
/// ```rust
/// use regression_inference::{InferenceConfig, PercentBase};
///
/// let config = InferenceConfig::new()
///     .with_tag("serve")
///     .with_tolerance(0.001)
///     .with_percent_base(PercentBase::Scored)
///     .with_threads(2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    /// Serving tag that selects the graph variant inside the model directory.
    pub tag: String,
    /// Name of the output node to read the prediction from.
    pub fetch: String,
    /// Number of intra-op threads for ONNX Runtime.
    /// Setting this to `0` allows ONNX Runtime to choose the optimal number.
    pub num_threads: usize,
    /// Maximum absolute difference between prediction and reference for a
    /// row to be reported as matching.
    pub tolerance: f32,
    /// Denominator for the bucket percentages in the summary.
    pub percent_base: PercentBase,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            fetch: DEFAULT_FETCH.to_string(),
            num_threads: 0,
            tolerance: DEFAULT_TOLERANCE,
            percent_base: PercentBase::Lines,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the serving tag.
    ///
    /// # Arguments
    ///
    /// * `tag` - Tag of the exported graph variant (e.g. `serve`).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the output node name.
    #[must_use]
    pub fn with_fetch(mut self, fetch: impl Into<String>) -> Self {
        self.fetch = fetch.into();
        self
    }

    /// Set the number of threads for inference.
    ///
    /// # Arguments
    ///
    /// * `threads` - The number of intra-op threads. Set to `0` for auto-configuration.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Set the tolerance for matching the reference prediction.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the denominator used for bucket percentages.
    #[must_use]
    pub const fn with_percent_base(mut self, base: PercentBase) -> Self {
        self.percent_base = base;
        self
    }
}
