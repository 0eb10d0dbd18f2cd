//! Model adapter abstraction and implementations.
//!
//! Defines the three capability traits the orchestration layer consumes —
//! [`SentimentClassifier`], [`Segmenter`], and [`Summarizer`] — and the
//! concrete backends:
//! - **[`DisabledInference`]** — returns errors; used when no model backend
//!   is configured.
//! - **[`HttpInference`]** — calls a model sidecar over HTTP with a
//!   configured timeout.
//!
//! # Backend Selection
//!
//! Use [`InferenceStack::from_config`] to instantiate all three adapters
//! from the `[inference]` configuration section:
//!
//! ```rust
//! # use sentiscope::config::InferenceConfig;
//! # use sentiscope::inference::InferenceStack;
//! let config = InferenceConfig::default(); // provider = "disabled"
//! let stack = InferenceStack::from_config(&config).unwrap();
//! ```
//!
//! # Failure Semantics
//!
//! Adapter calls are synchronous (awaited inline) and fallible. A failed
//! call is **not** retried here: errors propagate to the caller and become
//! the request's terminal outcome. Callers that need bounded latency rely
//! on the client timeout (`inference.timeout_secs`).
//!
//! # Sidecar Wire Format
//!
//! The HTTP backend expects a model server exposing three JSON endpoints
//! under `inference.base_url`:
//!
//! | Endpoint | Request | Response |
//! |----------|---------|----------|
//! | `POST /classify` | `{"text"}` | ranked array of `{"label", "score"}` |
//! | `POST /segment` | `{"text"}` | `{"sentences": [{"text","start","end"}], "noun_phrases": ["..."]}` |
//! | `POST /summarize` | `{"text","max_length","min_length","do_sample":false}` | `{"summary_text"}` |
//!
//! If the `INFERENCE_API_KEY` environment variable is set, it is sent as a
//! bearer token on every request.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::InferenceConfig;

/// Top classifier result for one piece of text: the raw star-rating label
/// and the confidence in `[0, 1]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

/// A sentence detected by the segmenter, with its byte span in the
/// original text.
#[derive(Debug, Clone, Deserialize)]
pub struct SentenceSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Segmenter output: sentence boundaries and noun-phrase spans, both in
/// document order.
#[derive(Debug, Clone, Deserialize)]
pub struct Segmentation {
    pub sentences: Vec<SentenceSpan>,
    pub noun_phrases: Vec<String>,
}

/// Five-class sentiment classifier over a single text.
///
/// Called once per whole document and once per sentence, so
/// implementations must tolerate both paragraph- and sentence-length
/// inputs.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify `text` and return the top result.
    async fn classify(&self, text: &str) -> Result<Classification>;
}

/// Sentence-boundary and noun-phrase detection over a single text.
#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Segment `text` into sentences and noun phrases, both in document
    /// order.
    async fn segment(&self, text: &str) -> Result<Segmentation>;
}

/// Abstractive summarization with length bounds.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text` to between `min_length` and `max_length` tokens
    /// using deterministic decoding.
    async fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String>;
}

/// The three model adapters bundled for the orchestration layer.
#[derive(Clone)]
pub struct InferenceStack {
    pub classifier: Arc<dyn SentimentClassifier>,
    pub segmenter: Arc<dyn Segmenter>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl InferenceStack {
    /// Create the adapter stack for the configured provider.
    ///
    /// # Supported Providers
    ///
    /// | Config Value | Backend |
    /// |-------------|---------|
    /// | `"disabled"` | [`DisabledInference`] |
    /// | `"http"` | [`HttpInference`] |
    ///
    /// # Errors
    ///
    /// Returns an error for unknown provider names or if the HTTP backend
    /// cannot be initialized (missing `base_url`, client build failure).
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        match config.provider.as_str() {
            "disabled" => {
                let backend = Arc::new(DisabledInference);
                Ok(Self {
                    classifier: backend.clone(),
                    segmenter: backend.clone(),
                    summarizer: backend,
                })
            }
            "http" => {
                let backend = Arc::new(HttpInference::new(config)?);
                Ok(Self {
                    classifier: backend.clone(),
                    segmenter: backend.clone(),
                    summarizer: backend,
                })
            }
            other => bail!("Unknown inference provider: {}", other),
        }
    }
}

// ============ Disabled Backend ============

/// A no-op backend that always returns errors.
///
/// Used when `inference.provider = "disabled"` in the configuration. Any
/// attempt to classify, segment, or summarize will fail with a descriptive
/// error message.
pub struct DisabledInference;

#[async_trait]
impl SentimentClassifier for DisabledInference {
    async fn classify(&self, _text: &str) -> Result<Classification> {
        bail!("Inference provider is disabled")
    }
}

#[async_trait]
impl Segmenter for DisabledInference {
    async fn segment(&self, _text: &str) -> Result<Segmentation> {
        bail!("Inference provider is disabled")
    }
}

#[async_trait]
impl Summarizer for DisabledInference {
    async fn summarize(
        &self,
        _text: &str,
        _max_length: usize,
        _min_length: usize,
    ) -> Result<String> {
        bail!("Inference provider is disabled")
    }
}

// ============ HTTP Backend ============

/// Model adapter backed by an HTTP model sidecar.
///
/// Each trait method issues one `POST` to the corresponding endpoint
/// under `base_url`. There is no retry: transport errors, non-2xx
/// statuses, and malformed response bodies all surface as errors.
pub struct HttpInference {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpInference {
    /// Create a new HTTP backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not set in config or the HTTP
    /// client cannot be built.
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("inference.base_url required for HTTP provider"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: std::env::var("INFERENCE_API_KEY").ok(),
            client,
        })
    }

    /// POST a JSON body to `{base_url}/{endpoint}` and return the decoded
    /// JSON response.
    async fn post_json(&self, endpoint: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Inference request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Inference server error {} from /{}: {}", status, endpoint, body_text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Invalid JSON from /{}", endpoint))
    }
}

#[async_trait]
impl SentimentClassifier for HttpInference {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let json = self
            .post_json("classify", &serde_json::json!({ "text": text }))
            .await?;
        parse_classify_response(&json)
    }
}

#[async_trait]
impl Segmenter for HttpInference {
    async fn segment(&self, text: &str) -> Result<Segmentation> {
        let json = self
            .post_json("segment", &serde_json::json!({ "text": text }))
            .await?;
        parse_segment_response(&json)
    }
}

#[async_trait]
impl Summarizer for HttpInference {
    async fn summarize(&self, text: &str, max_length: usize, min_length: usize) -> Result<String> {
        let json = self
            .post_json(
                "summarize",
                &serde_json::json!({
                    "text": text,
                    "max_length": max_length,
                    "min_length": min_length,
                    "do_sample": false,
                }),
            )
            .await?;
        parse_summarize_response(&json)
    }
}

/// Parse the classify endpoint response: a ranked array of
/// `{label, score}` objects. The first element is the top result.
fn parse_classify_response(json: &serde_json::Value) -> Result<Classification> {
    let ranked: Vec<Classification> = serde_json::from_value(json.clone())
        .with_context(|| "Invalid classify response: expected array of {label, score}")?;

    ranked
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Empty classify response"))
}

/// Parse the segment endpoint response into a [`Segmentation`].
fn parse_segment_response(json: &serde_json::Value) -> Result<Segmentation> {
    serde_json::from_value(json.clone())
        .with_context(|| "Invalid segment response: expected {sentences, noun_phrases}")
}

/// Parse the summarize endpoint response and extract `summary_text`.
fn parse_summarize_response(json: &serde_json::Value) -> Result<String> {
    json.get("summary_text")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Invalid summarize response: missing summary_text"))
}
