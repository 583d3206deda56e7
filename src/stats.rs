// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Prediction error statistics.
//!
//! Labels are integer quality scores, so predictions are compared to labels
//! after rounding both to the nearest integer. [`ErrorBuckets`] counts how
//! many rows were off by 0, 1, 2, ... points.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Denominator used when turning bucket counts into percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PercentBase {
    /// Every line read, counting the header, blank lines and skipped lines.
    #[default]
    Lines,
    /// Only rows that were scored.
    Scored,
}

impl PercentBase {
    /// Returns the string used on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Scored => "scored",
        }
    }
}

impl fmt::Display for PercentBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PercentBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" => Ok(Self::Lines),
            "scored" => Ok(Self::Scored),
            _ => Err(format!("Unknown percent base: {s} (expected 'lines' or 'scored')")),
        }
    }
}

/// Absolute difference between rounded prediction and rounded label.
///
/// Rounding is half away from zero. Float to integer casts saturate, so
/// infinities map to the `i64` bounds and NaN maps to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rounded_error(prediction: f32, label: f32) -> u64 {
    let predicted = prediction.round() as i64;
    let actual = label.round() as i64;
    predicted.abs_diff(actual)
}

/// Count of scored rows per absolute rounded error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBuckets {
    counts: BTreeMap<u64, usize>,
}

impl ErrorBuckets {
    /// Create an empty set of buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scored row and return the bucket it landed in.
    pub fn record(&mut self, prediction: f32, label: f32) -> u64 {
        let key = rounded_error(prediction, label);
        *self.counts.entry(key).or_insert(0) += 1;
        key
    }

    /// Number of rows in a bucket.
    #[must_use]
    pub fn count(&self, key: u64) -> usize {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Total number of recorded rows.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(error, count)` in ascending error order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// Share of `denominator` per bucket, in percent, ascending by error.
    ///
    /// A zero denominator yields `0.0` for every bucket.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentages(&self, denominator: usize) -> Vec<(u64, f32)> {
        self.iter()
            .map(|(key, count)| {
                let percent = if denominator == 0 {
                    0.0
                } else {
                    count as f32 / denominator as f32 * 100.0
                };
                (key, percent)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_error() {
        assert_eq!(rounded_error(6.05, 6.0), 0);
        assert_eq!(rounded_error(5.4, 6.0), 1);
        assert_eq!(rounded_error(7.6, 5.0), 3);
        assert_eq!(rounded_error(3.0, 8.0), 5);
        // half away from zero
        assert_eq!(rounded_error(5.5, 5.0), 1);
        assert_eq!(rounded_error(-0.5, 0.0), 1);
    }

    #[test]
    fn test_rounded_error_large_values() {
        assert_eq!(rounded_error(0.0, 4_294_967_296.0), 4_294_967_296);
        assert_eq!(rounded_error(6.0, 1e10), 9_999_999_994);

        let mut buckets = ErrorBuckets::new();
        assert_eq!(buckets.record(0.0, 4_294_967_296.0), 4_294_967_296);
        assert_eq!(buckets.count(0), 0);
        assert_eq!(buckets.count(4_294_967_296), 1);
    }

    #[test]
    fn test_rounded_error_non_finite() {
        assert_eq!(rounded_error(f32::INFINITY, 6.0), i64::MAX.abs_diff(6));
        assert_eq!(rounded_error(f32::NEG_INFINITY, 6.0), i64::MIN.abs_diff(6));
        assert_eq!(rounded_error(f32::NAN, 6.0), 6);

        let mut buckets = ErrorBuckets::new();
        let key = buckets.record(f32::INFINITY, 6.0);
        assert_ne!(key, 0);
        assert_eq!(buckets.count(key), 1);
        assert_eq!(buckets.total(), 1);
    }

    #[test]
    fn test_record_and_count() {
        let mut buckets = ErrorBuckets::new();
        assert!(buckets.is_empty());

        assert_eq!(buckets.record(6.05, 6.0), 0);
        assert_eq!(buckets.record(5.2, 6.0), 1);
        assert_eq!(buckets.record(6.7, 6.0), 1);
        assert_eq!(buckets.record(4.1, 7.0), 3);

        assert_eq!(buckets.count(0), 1);
        assert_eq!(buckets.count(1), 2);
        assert_eq!(buckets.count(2), 0);
        assert_eq!(buckets.count(3), 1);
        assert_eq!(buckets.total(), 4);
    }

    #[test]
    fn test_iteration_is_ascending() {
        let mut buckets = ErrorBuckets::new();
        buckets.record(1.0, 5.0);
        buckets.record(5.0, 5.0);
        buckets.record(3.0, 5.0);

        let keys: Vec<u64> = buckets.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![0, 2, 4]);
    }

    #[test]
    fn test_percentages() {
        let mut buckets = ErrorBuckets::new();
        buckets.record(6.0, 6.0);
        buckets.record(6.0, 6.0);
        buckets.record(6.0, 6.0);
        buckets.record(5.0, 6.0);

        let pct = buckets.percentages(4);
        assert_eq!(pct.len(), 2);
        assert_eq!(pct[0].0, 0);
        assert!((pct[0].1 - 75.0).abs() < 1e-4);
        assert!((pct[1].1 - 25.0).abs() < 1e-4);

        // a larger denominator (header and skipped lines) shrinks every share
        let sum: f32 = buckets.percentages(5).iter().map(|(_, p)| p).sum();
        assert!((sum - 80.0).abs() < 1e-3);

        assert!(buckets.percentages(0).iter().all(|(_, p)| *p == 0.0));
    }

    #[test]
    fn test_percent_base_parse() {
        assert_eq!("lines".parse::<PercentBase>(), Ok(PercentBase::Lines));
        assert_eq!("Scored".parse::<PercentBase>(), Ok(PercentBase::Scored));
        assert!("rows".parse::<PercentBase>().is_err());
        assert_eq!(PercentBase::default(), PercentBase::Lines);
        assert_eq!(PercentBase::Scored.to_string(), "scored");
    }
}
