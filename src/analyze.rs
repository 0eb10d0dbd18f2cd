//! Analysis orchestration.
//!
//! Combines the raw outputs of the sentiment classifier and the segmenter
//! into one composite [`AnalysisResult`]: whole-text sentiment, a
//! per-sentence breakdown, and the extracted noun phrases.
//!
//! # Algorithm
//!
//! 1. Trim the input; reject empty text before any model call.
//! 2. Classify the whole text once and take the top result.
//! 3. Segment the text into sentences and noun phrases.
//! 4. Classify each sentence independently — one classifier call per
//!    sentence, no caching or batching.
//! 5. Normalize every label through [`Sentiment::from_raw_label`] and
//!    round every confidence to 3 decimals.
//!
//! The overall sentiment reflects the whole-text classification and may
//! legitimately differ from any individual sentence's sentiment.
//!
//! Adapter failures propagate unchanged: no retry, and no partial result
//! is ever returned.

use anyhow::{bail, Result};

use crate::inference::InferenceStack;
use crate::label::Sentiment;
use crate::models::{AnalysisResult, SentenceSentiment};

/// Analyze `text` and return the composite result.
///
/// # Errors
///
/// Fails with `"No text provided"` when `text` is empty after trimming,
/// and with the adapter's error when a classifier or segmenter call fails.
pub async fn analyze_text(stack: &InferenceStack, text: &str) -> Result<AnalysisResult> {
    let text = text.trim();
    if text.is_empty() {
        bail!("No text provided");
    }

    let overall = stack.classifier.classify(text).await?;
    let segmentation = stack.segmenter.segment(text).await?;

    let mut sentence_analysis = Vec::with_capacity(segmentation.sentences.len());
    for sentence in &segmentation.sentences {
        let result = stack.classifier.classify(&sentence.text).await?;
        sentence_analysis.push(SentenceSentiment {
            sentence: sentence.text.clone(),
            sentiment: Sentiment::from_raw_label(&result.label),
            score: round3(result.score),
        });
    }

    Ok(AnalysisResult {
        text: text.to_string(),
        overall_sentiment: Sentiment::from_raw_label(&overall.label),
        score: round3(overall.score),
        raw_label: overall.label,
        key_phrases: segmentation.noun_phrases,
        sentence_analysis,
    })
}

/// Round a confidence score to 3 decimal places.
fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
