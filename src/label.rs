//! Star-rating label normalization.
//!
//! The sentiment classifier emits five-class star ratings (`"1 star"` ..
//! `"5 stars"`). [`Sentiment`] translates those into the human-readable
//! categories exposed by the API. Labels outside the classifier's
//! vocabulary map to [`Sentiment::Unknown`] — normalization never fails.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable sentiment category.
///
/// Serializes to the exact strings the API contract uses
/// (`"Very Negative"`, `"Negative"`, `"Neutral"`, `"Positive"`,
/// `"Very Positive"`, `"Unknown"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "Very Negative")]
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    #[serde(rename = "Very Positive")]
    VeryPositive,
    Unknown,
}

impl Sentiment {
    /// Translate a raw classifier label into a sentiment category.
    ///
    /// The mapping is an exact string match over the classifier's
    /// five-label vocabulary:
    ///
    /// | Raw label | Category |
    /// |-----------|----------|
    /// | `"1 star"` | Very Negative |
    /// | `"2 stars"` | Negative |
    /// | `"3 stars"` | Neutral |
    /// | `"4 stars"` | Positive |
    /// | `"5 stars"` | Very Positive |
    ///
    /// Any other string (including capitalization or wording variants)
    /// maps to [`Sentiment::Unknown`].
    pub fn from_raw_label(label: &str) -> Self {
        match label {
            "1 star" => Sentiment::VeryNegative,
            "2 stars" => Sentiment::Negative,
            "3 stars" => Sentiment::Neutral,
            "4 stars" => Sentiment::Positive,
            "5 stars" => Sentiment::VeryPositive,
            _ => Sentiment::Unknown,
        }
    }

    /// Returns the category as its API string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::VeryNegative => "Very Negative",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
            Sentiment::VeryPositive => "Very Positive",
            Sentiment::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
