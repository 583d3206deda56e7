// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::Parser;

use crate::inference::{DEFAULT_FETCH, DEFAULT_TAG, DEFAULT_TOLERANCE, InferenceConfig};
use crate::stats::PercentBase;

/// Default model directory.
pub const DEFAULT_SAVED_MODEL: &str = "saved_models/1513701267";

/// Default CSV file to score.
pub const DEFAULT_CSV_FILE: &str = "wine_test_predicted.csv";

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"Output:
    One line per scored row:
        <line>, prediction <p>, label <l>, diff: <l - p>, python: <reference>, OK|ERROR
    followed by one line per rounded error:
        Off by <k> : <percent>%

Examples:
    regression-inference
    regression-inference --saved_model saved_models/1513701267 wine_test_predicted.csv
    regression-inference -s models/wine --tag serve --percent-of scored data.csv"#)]
pub struct Cli {
    /// Folder with the saved model to use
    #[arg(short = 's', long = "saved_model", default_value = DEFAULT_SAVED_MODEL)]
    pub saved_model: String,

    /// CSV file to create predictions for
    #[arg(default_value = DEFAULT_CSV_FILE)]
    pub csv_file: String,

    /// Serving tag selecting the graph variant in the model folder
    #[arg(long, default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Output node holding the prediction
    #[arg(long, default_value = DEFAULT_FETCH)]
    pub fetch: String,

    /// Maximum deviation from the reference prediction reported as OK
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f32,

    /// Denominator for the error summary (lines or scored)
    #[arg(long = "percent-of", default_value_t = PercentBase::Lines)]
    pub percent_of: PercentBase,

    /// Number of ONNX Runtime intra-op threads (0 = let the runtime decide)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Show verbose output
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Build the inference configuration from the parsed arguments.
    #[must_use]
    pub fn config(&self) -> InferenceConfig {
        InferenceConfig::new()
            .with_tag(self.tag.clone())
            .with_fetch(self.fetch.clone())
            .with_tolerance(self.tolerance)
            .with_percent_base(self.percent_of)
            .with_threads(self.threads)
    }
}
