//! Core data models used throughout Sentiscope.
//!
//! These types represent the analysis results, summaries, and history
//! entries that flow through the API and the history store.

use serde::{Deserialize, Serialize};

use crate::label::Sentiment;

/// Composite result produced by the analysis orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The analyzed text (input after whitespace trimming).
    pub text: String,
    /// Whole-text sentiment, resolved through the label normalizer.
    pub overall_sentiment: Sentiment,
    /// Whole-text classifier confidence in `[0, 1]`, rounded to 3 decimals.
    pub score: f64,
    /// The untranslated classifier label (e.g. `"4 stars"`), kept for
    /// traceability.
    pub raw_label: String,
    /// Noun phrases in order of appearance. May be empty; duplicates are
    /// not removed.
    pub key_phrases: Vec<String>,
    /// Per-sentence sentiment, one entry per detected sentence, in
    /// document order.
    pub sentence_analysis: Vec<SentenceSentiment>,
}

/// Sentiment of a single sentence within an analyzed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceSentiment {
    pub sentence: String,
    pub sentiment: Sentiment,
    /// Classifier confidence for this sentence, rounded to 3 decimals.
    pub score: f64,
}

/// Result of the summarization policy: either the summarizer's output or
/// the original text verbatim when it is short enough already.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
}

/// A persisted analysis record in the history log.
///
/// `timestamp` is assigned by the store at insertion time (local time,
/// `YYYY-MM-DD HH:MM:SS`) and doubles as the entry's identity key for
/// deletion. Timestamps are not guaranteed unique: two saves within the
/// same second collide, and deleting that timestamp removes both entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub overall_sentiment: String,
    pub score: Option<f64>,
    pub timestamp: String,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// Caller-supplied payload for `POST /save-history`.
///
/// All fields are optional at the boundary: absent strings default to
/// empty, an absent score stays absent (`null` in the stored entry), and
/// an absent phrase list defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveHistoryRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub overall_sentiment: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub summary: String,
}
