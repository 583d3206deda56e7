// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use crate::cli::args::Cli;
use crate::cli::logging::set_verbose;
use crate::scoring::score_file;
use crate::{RegressionModel, VERSION};
use crate::{error, section, verbose};

/// Exit code for unreadable inputs and load failures.
pub const EXIT_FAILURE: i32 = -1;

/// Returns `true` if `path` is a directory whose entries can be listed.
fn is_readable_dir(path: &Path) -> bool {
    path.is_dir() && fs::read_dir(path).is_ok()
}

/// Returns `true` if `path` is a regular file that can be opened.
fn is_readable_file(path: &Path) -> bool {
    path.is_file() && fs::File::open(path).is_ok()
}

/// Load the model, score the CSV file and print the error summary.
///
/// Returns the process exit code.
#[allow(clippy::cast_precision_loss)]
pub fn run_scoring(args: &Cli) -> i32 {
    set_verbose(args.verbose);
    let config = args.config();

    let model_dir = Path::new(&args.saved_model);
    if !is_readable_dir(model_dir) {
        error!("Cannot read folder '{}'", model_dir.display());
        return EXIT_FAILURE;
    }

    let mut model = match RegressionModel::load_with_config(model_dir, &config) {
        Ok(m) => m,
        Err(e) => {
            error!("Error loading model: {e}");
            return EXIT_FAILURE;
        }
    };

    let csv_path = Path::new(&args.csv_file);
    if !is_readable_file(csv_path) {
        error!("Cannot read CSV file '{}'", csv_path.display());
        return EXIT_FAILURE;
    }

    verbose!("Regression inference {VERSION} 🚀 Rust ONNX");
    verbose!(
        "Model {} (tag '{}'), {} inputs -> {}",
        model.path().display(),
        config.tag,
        model.feeds().len(),
        model.fetch()
    );
    verbose!("Scoring {}", csv_path.display());

    let start = Instant::now();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let report = match score_file(csv_path, &mut model, &config, &mut out) {
        Ok(report) => report,
        Err(e) => {
            error!("Scoring failed: {e}");
            return EXIT_FAILURE;
        }
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    if let Err(e) = report
        .write_summary(config.percent_base, &mut out)
        .and_then(|()| out.flush())
    {
        error!("Failed to write summary: {e}");
        return EXIT_FAILURE;
    }
    drop(out);

    section!("Summary");
    verbose!(
        "{} lines, {} scored, {} skipped, {} blank, percentages over {} ({})",
        report.lines,
        report.scored,
        report.skipped,
        report.blank,
        report.denominator(config.percent_base),
        config.percent_base
    );
    verbose!(
        "Speed: {:.1}ms total, {:.3}ms per row",
        elapsed_ms,
        elapsed_ms / report.scored.max(1) as f64
    );

    0
}
