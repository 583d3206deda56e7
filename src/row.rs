// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CSV row parsing.
//!
//! Input files are plain comma-separated numbers without quoting. Each data
//! line holds a row identifier, the twelve model inputs, the ground-truth
//! label and a reference prediction produced by an earlier run.

use std::fmt;

use crate::features::{FEATURE_COUNT, Features};

/// Number of comma-separated fields in a data line.
pub const COLUMN_COUNT: usize = 15;

/// Column index of the ground-truth label.
const LABEL_COLUMN: usize = 1 + FEATURE_COUNT;

/// Column index of the reference prediction.
const REFERENCE_COLUMN: usize = LABEL_COLUMN + 1;

/// One parsed data line.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line number in the source file (the header is line 1).
    pub line: usize,
    /// Row identifier from column 0, kept verbatim.
    pub id: String,
    /// Model inputs from columns 1 to 12.
    pub features: Features,
    /// Ground-truth label.
    pub label: f32,
    /// Prediction of the reference run for the same row.
    pub reference: f32,
}

/// Reason a data line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The line does not have [`COLUMN_COUNT`] fields.
    ColumnCount {
        /// Line number.
        line: usize,
        /// Number of fields found.
        found: usize,
    },
    /// A value field is not a number.
    InvalidValue {
        /// Line number.
        line: usize,
        /// 1-based column of the offending field.
        column: usize,
        /// The raw field text.
        value: String,
    },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnCount { line, found } => write!(
                f,
                "Invalid number of columns ({found}) in line {line}, skipping line."
            ),
            Self::InvalidValue {
                line,
                column,
                value,
            } => write!(
                f,
                "Cannot parse value '{value}' in line {line}, column {column}, skipping line."
            ),
        }
    }
}

impl std::error::Error for RowError {}

/// Split a line on commas, dropping trailing empty fields.
///
/// `"1,2,3,"` yields three fields, while empty fields in the middle of the
/// line are kept so that they fail numeric parsing.
#[must_use]
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(',').collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Parse one numeric field.
///
/// Non-finite values are only accepted as `Infinity` or `NaN`, optionally
/// signed. Other spellings such as `inf` or `nan` are rejected.
fn parse_value(field: &str) -> Option<f32> {
    let text = field.trim();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic())
        && unsigned != "Infinity"
        && unsigned != "NaN"
    {
        return None;
    }
    text.parse().ok()
}

/// Parse one data line.
///
/// Returns `Ok(None)` for blank lines, which carry no data but still count
/// towards line numbering in the caller.
///
/// # Errors
///
/// Returns [`RowError::ColumnCount`] if the line does not have exactly
/// [`COLUMN_COUNT`] fields, or [`RowError::InvalidValue`] for the first value
/// field that does not parse as a float.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<Row>, RowError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields = split_fields(line);
    if fields.len() != COLUMN_COUNT {
        return Err(RowError::ColumnCount {
            line: line_number,
            found: fields.len(),
        });
    }

    let mut values = [0.0f32; COLUMN_COUNT - 1];
    for (i, field) in fields.iter().enumerate().skip(1) {
        values[i - 1] = parse_value(field).ok_or_else(|| RowError::InvalidValue {
            line: line_number,
            column: i + 1,
            value: (*field).to_string(),
        })?;
    }

    let mut inputs = [0.0f32; FEATURE_COUNT];
    inputs.copy_from_slice(&values[..FEATURE_COUNT]);

    Ok(Some(Row {
        line: line_number,
        id: fields[0].trim().to_string(),
        features: Features::new(inputs),
        label: values[LABEL_COLUMN - 1],
        reference: values[REFERENCE_COLUMN - 1],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "x,1,7.0,0.3,0.2,5.0,0.05,15,50,0.99,3.2,0.6,9.5,6,6.1";

    #[test]
    fn test_parse_valid_line() {
        let row = parse_line(SAMPLE, 2).unwrap().unwrap();
        assert_eq!(row.line, 2);
        assert_eq!(row.id, "x");
        assert_eq!(row.features.get("wine_type"), Some(1.0));
        assert_eq!(row.features.get("alcohol"), Some(9.5));
        assert!((row.label - 6.0).abs() < f32::EPSILON);
        assert!((row.reference - 6.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(parse_line("", 3), Ok(None));
        assert_eq!(parse_line("   \t ", 4), Ok(None));
    }

    #[test]
    fn test_wrong_column_count() {
        let err = parse_line("0,1,2,3", 5).unwrap_err();
        assert_eq!(err, RowError::ColumnCount { line: 5, found: 4 });
        assert_eq!(
            err.to_string(),
            "Invalid number of columns (4) in line 5, skipping line."
        );

        let long = format!("{SAMPLE},7");
        assert!(matches!(
            parse_line(&long, 6),
            Err(RowError::ColumnCount { found: 16, .. })
        ));
    }

    #[test]
    fn test_unparseable_value_reports_column() {
        let line = "0,1,7.0,0.3,0.2,abc,0.05,15,50,0.99,3.2,0.6,9.5,6,6.1";
        let err = parse_line(line, 9).unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidValue {
                line: 9,
                column: 6,
                value: "abc".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Cannot parse value 'abc' in line 9, column 6, skipping line."
        );
    }

    #[test]
    fn test_unparseable_label_and_reference() {
        let bad_label = "0,1,7.0,0.3,0.2,5.0,0.05,15,50,0.99,3.2,0.6,9.5,six,6.1";
        assert!(matches!(
            parse_line(bad_label, 2),
            Err(RowError::InvalidValue { column: 14, .. })
        ));

        let bad_reference = "0,1,7.0,0.3,0.2,5.0,0.05,15,50,0.99,3.2,0.6,9.5,6,?";
        assert!(matches!(
            parse_line(bad_reference, 2),
            Err(RowError::InvalidValue { column: 15, .. })
        ));
    }

    #[test]
    fn test_empty_inner_field_fails_parse() {
        let line = "0,1,,0.3,0.2,5.0,0.05,15,50,0.99,3.2,0.6,9.5,6,6.1";
        assert!(matches!(
            parse_line(line, 2),
            Err(RowError::InvalidValue { column: 3, .. })
        ));
    }

    #[test]
    fn test_trailing_separator_is_ignored() {
        let line = format!("{SAMPLE},");
        assert!(parse_line(&line, 2).unwrap().is_some());
        assert_eq!(split_fields("1,2,,,").len(), 2);
        assert!(split_fields(",,,").is_empty());
    }

    #[test]
    fn test_whitespace_around_values() {
        let line = "7, 1 ,7.0,0.3,0.2,5.0,0.05,15,50,0.99,3.2,0.6,9.5, 6 ,6.1";
        let row = parse_line(line, 2).unwrap().unwrap();
        assert_eq!(row.id, "7");
        assert!((row.label - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_finite_spellings() {
        assert_eq!(parse_value("Infinity"), Some(f32::INFINITY));
        assert_eq!(parse_value("-Infinity"), Some(f32::NEG_INFINITY));
        assert_eq!(parse_value(" +Infinity "), Some(f32::INFINITY));
        assert!(parse_value("NaN").is_some_and(f32::is_nan));
        assert!(parse_value("-NaN").is_some_and(f32::is_nan));

        for rejected in ["inf", "INF", "-inf", "infinity", "INFINITY", "nan", "NAN", "+nan"] {
            assert_eq!(parse_value(rejected), None, "{rejected}");
        }
        assert_eq!(parse_value("1e3"), Some(1000.0));
        assert_eq!(parse_value("-.5"), Some(-0.5));
    }

    #[test]
    fn test_lowercase_inf_is_rejected_in_line() {
        let line = "0,1,7.0,0.3,0.2,5.0,0.05,15,50,0.99,3.2,0.6,inf,6,6.1";
        assert_eq!(
            parse_line(line, 3),
            Err(RowError::InvalidValue {
                line: 3,
                column: 13,
                value: "inf".to_string(),
            })
        );

        let line = "0,1,7.0,0.3,0.2,5.0,0.05,15,50,0.99,3.2,0.6,Infinity,6,6.1";
        let row = parse_line(line, 3).unwrap().unwrap();
        assert_eq!(row.features.get("alcohol"), Some(f32::INFINITY));
    }
}
