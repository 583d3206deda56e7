// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Scoring a CSV file row by row.
//!
//! The first line of the input is a header and is skipped. Every following
//! line is parsed, fed to a [`Regressor`] and written out as one result line.
//! Lines that can't be parsed or scored are reported on stderr and skipped;
//! the run only stops on I/O errors.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{InferenceError, Result};
use crate::inference::InferenceConfig;
use crate::model::Regressor;
use crate::row::{Row, parse_line};
use crate::stats::{ErrorBuckets, PercentBase};
use crate::warn;

/// Result of scoring one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    /// Line number the row came from.
    pub line: usize,
    /// Model output.
    pub prediction: f32,
    /// Ground-truth label.
    pub label: f32,
    /// Prediction of the reference run.
    pub reference: f32,
    /// Whether the prediction agrees with the reference within tolerance.
    pub matches: bool,
}

impl Scored {
    /// Label minus prediction.
    #[must_use]
    pub fn diff(&self) -> f32 {
        self.label - self.prediction
    }
}

impl fmt::Display for Scored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, prediction {:.2}, label {:.2}, diff: {:.2}, python: {:.2}, {}",
            self.line,
            self.prediction,
            self.label,
            self.diff(),
            self.reference,
            if self.matches { "OK" } else { "ERROR" }
        )
    }
}

/// Totals of one pass over a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    /// Final line counter. The header is line 1, so this is one more than the
    /// number of lines after the header.
    pub lines: usize,
    /// Rows scored and recorded in `buckets`.
    pub scored: usize,
    /// Whitespace-only lines.
    pub blank: usize,
    /// Lines rejected by the parser or the model.
    pub skipped: usize,
    /// Rounded error distribution of scored rows.
    pub buckets: ErrorBuckets,
}

impl Default for ScoreReport {
    fn default() -> Self {
        Self {
            lines: 1,
            scored: 0,
            blank: 0,
            skipped: 0,
            buckets: ErrorBuckets::new(),
        }
    }
}

impl ScoreReport {
    /// Denominator for bucket percentages.
    #[must_use]
    pub const fn denominator(&self, base: PercentBase) -> usize {
        match base {
            PercentBase::Lines => self.lines,
            PercentBase::Scored => self.scored,
        }
    }

    /// Percentage of rows per rounded error, ascending by error.
    #[must_use]
    pub fn summary(&self, base: PercentBase) -> Vec<(u64, f32)> {
        self.buckets.percentages(self.denominator(base))
    }

    /// Write one `Off by <k> : <pct>%` line per bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_summary<W: Write>(&self, base: PercentBase, out: &mut W) -> io::Result<()> {
        for (key, percent) in self.summary(base) {
            writeln!(out, "Off by {key} : {percent:.2}%")?;
        }
        Ok(())
    }
}

/// Run one row through the model.
///
/// # Errors
///
/// Returns the model's error if the prediction fails.
pub fn score_row<M: Regressor + ?Sized>(model: &mut M, row: &Row, tolerance: f32) -> Result<Scored> {
    let prediction = model.predict(&row.features)?;
    Ok(Scored {
        line: row.line,
        prediction,
        label: row.label,
        reference: row.reference,
        matches: (row.reference - prediction).abs() < tolerance,
    })
}

/// Score every data line of `reader`, writing one result line per scored row
/// to `out`.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`.
///
/// Bytes that are not valid UTF-8 are replaced, so such lines fail numeric
/// parsing and are skipped like any other malformed line.
///
/// # Errors
///
/// Returns an error if reading the input or writing the output fails.
pub fn score_reader<R, W, M>(
    reader: R,
    model: &mut M,
    config: &InferenceConfig,
    out: &mut W,
) -> Result<ScoreReport>
where
    R: BufRead,
    W: Write,
    M: Regressor + ?Sized,
{
    let mut report = ScoreReport::default();
    let mut header = true;

    for chunk in reader.split(b'\n') {
        let chunk = chunk?;
        let chunk = chunk.strip_suffix(b"\r").unwrap_or(&chunk[..]);

        // a lone CR also ends a line
        for raw in chunk.split(|&b| b == b'\r') {
            if header {
                header = false;
                continue;
            }
            report.lines += 1;
            let line_number = report.lines;
            let text = String::from_utf8_lossy(raw);

            let row = match parse_line(&text, line_number) {
                Ok(Some(row)) => row,
                Ok(None) => {
                    report.blank += 1;
                    continue;
                }
                Err(e) => {
                    warn!("{e}");
                    report.skipped += 1;
                    continue;
                }
            };

            match score_row(model, &row, config.tolerance) {
                Ok(scored) => {
                    writeln!(out, "{scored}")?;
                    report.buckets.record(scored.prediction, scored.label);
                    report.scored += 1;
                }
                Err(e) => {
                    warn!(
                        "Prediction failed in line {line_number} (row '{}'), skipping line: {e}",
                        row.id
                    );
                    report.skipped += 1;
                }
            }
        }
    }

    Ok(report)
}

/// Score a CSV file on disk.
///
/// # Errors
///
/// Returns [`InferenceError::IoError`] if the file can't be opened, or any
/// error from [`score_reader`].
pub fn score_file<P, W, M>(
    path: P,
    model: &mut M,
    config: &InferenceConfig,
    out: &mut W,
) -> Result<ScoreReport>
where
    P: AsRef<Path>,
    W: Write,
    M: Regressor + ?Sized,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        InferenceError::IoError(format!("Cannot read CSV file '{}': {e}", path.display()))
    })?;
    score_reader(BufReader::new(file), model, config, out)
}
