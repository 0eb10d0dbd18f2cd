//! Summarization policy.
//!
//! Short text needs no condensation: the summarizer is only invoked when
//! the input exceeds [`SUMMARY_TRIGGER_WORDS`] whitespace-delimited
//! tokens. Below that threshold the original text is returned verbatim —
//! a pass-through, not an error. The thresholds are fixed policy
//! constants, not configurable per call.

use anyhow::{bail, Result};

use crate::inference::Summarizer;
use crate::models::SummaryResult;

/// Word count above which text is summarized rather than passed through.
pub const SUMMARY_TRIGGER_WORDS: usize = 100;
/// Upper length bound handed to the summarizer.
pub const SUMMARY_MAX_LENGTH: usize = 100;
/// Lower length bound handed to the summarizer.
pub const SUMMARY_MIN_LENGTH: usize = 50;

/// Summarize `text`, or return it unchanged when it is already short.
///
/// # Errors
///
/// Fails with `"No text provided"` when `text` is empty after trimming,
/// and with the adapter's error when the summarizer call fails.
pub async fn summarize_text(summarizer: &dyn Summarizer, text: &str) -> Result<SummaryResult> {
    let text = text.trim();
    if text.is_empty() {
        bail!("No text provided");
    }

    if text.split_whitespace().count() > SUMMARY_TRIGGER_WORDS {
        let summary = summarizer
            .summarize(text, SUMMARY_MAX_LENGTH, SUMMARY_MIN_LENGTH)
            .await?;
        Ok(SummaryResult { summary })
    } else {
        Ok(SummaryResult {
            summary: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSummarizer {
        calls: AtomicUsize,
    }

    impl StubSummarizer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Summarizer for StubSummarizer {
        async fn summarize(&self, _text: &str, max_length: usize, min_length: usize) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(max_length, SUMMARY_MAX_LENGTH);
            assert_eq!(min_length, SUMMARY_MIN_LENGTH);
            Ok("condensed".to_string())
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[tokio::test]
    async fn test_exactly_100_words_passes_through() {
        let summarizer = StubSummarizer::new();
        let text = words(100);
        let result = summarize_text(&summarizer, &text).await.unwrap();
        assert_eq!(result.summary, text);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_101_words_is_summarized() {
        let summarizer = StubSummarizer::new();
        let text = words(101);
        let result = summarize_text(&summarizer, &text).await.unwrap();
        assert_eq!(result.summary, "condensed");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_text_passes_through() {
        let summarizer = StubSummarizer::new();
        let result = summarize_text(&summarizer, "Just a few words.").await.unwrap();
        assert_eq!(result.summary, "Just a few words.");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_text_errors_before_summarizer() {
        let summarizer = StubSummarizer::new();
        for input in ["", "   "] {
            let err = summarize_text(&summarizer, input).await.unwrap_err();
            assert_eq!(err.to_string(), "No text provided");
        }
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_adapter_failure_propagates() {
        struct FailingSummarizer;

        #[async_trait]
        impl Summarizer for FailingSummarizer {
            async fn summarize(&self, _: &str, _: usize, _: usize) -> Result<String> {
                bail!("model unreachable")
            }
        }

        let text = words(150);
        let err = summarize_text(&FailingSummarizer, &text).await.unwrap_err();
        assert!(err.to_string().contains("model unreachable"));
    }
}
