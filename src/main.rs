// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use regression_inference::cli::args::Cli;
use regression_inference::cli::score::run_scoring;

fn main() {
    let cli = Cli::parse();
    process::exit(run_scoring(&cli));
}
