// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Named model inputs.
//!
//! The exported regressor takes one scalar feed per physicochemical
//! measurement of a wine sample. [`Features`] keeps the twelve values of a
//! row in feed order so they can be handed to the model by name.

/// Number of scalar inputs the regressor expects.
pub const FEATURE_COUNT: usize = 12;

/// Feed names in the order they appear in a CSV row (columns 1 to 12).
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "wine_type",
    "fixed_acidity",
    "volatile_acidity",
    "citric_acid",
    "residual_sugar",
    "chlorides",
    "free_sulfur_dioxide",
    "total_sulfur_dioxide",
    "density",
    "ph",
    "sulphates",
    "alcohol",
];

/// The twelve scalar inputs of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    values: [f32; FEATURE_COUNT],
}

impl Features {
    /// Wrap feature values given in [`FEATURE_NAMES`] order.
    #[must_use]
    pub const fn new(values: [f32; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Raw values in feed order.
    #[must_use]
    pub const fn values(&self) -> &[f32; FEATURE_COUNT] {
        &self.values
    }

    /// Look up a value by feed name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f32> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    /// Iterate over `(feed name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}
