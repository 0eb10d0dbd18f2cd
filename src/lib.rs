//! # Sentiscope
//!
//! A sentiment analysis and summarization service with a file-backed
//! history log.
//!
//! Sentiscope takes a block of text and returns a composite analysis —
//! an overall sentiment classification, a per-sentence breakdown, and the
//! extracted key noun phrases — plus an optional condensed summary.
//! Results can be persisted to and retrieved from an append-only JSON
//! history log. The sentiment classifier, sentence/phrase segmenter, and
//! summarizer are external pretrained models consumed through narrow
//! adapter traits.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ HTTP / CLI   │──▶│ Orchestration │──▶│ Model sidecar │
//! │ axum / senti │   │ analyze,      │   │ classify /    │
//! └──────┬───────┘   │ summarize     │   │ segment /     │
//!        │           └───────────────┘   │ summarize     │
//!        ▼                               └───────────────┘
//! ┌──────────────┐
//! │ History log  │
//! │ (JSON file)  │
//! └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! senti serve                              # start the HTTP server
//! senti analyze "The phone is great."      # one-shot analysis
//! senti summarize "Long review text ..."   # one-shot summarization
//! senti history list                       # dump the history log
//! senti history delete "2026-08-07 12:00:00"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`label`] | Star-rating label normalization |
//! | [`inference`] | Model adapter traits and backends |
//! | [`analyze`] | Analysis orchestration |
//! | [`summarize`] | Summarization policy |
//! | [`history`] | File-backed history store |
//! | [`server`] | HTTP API server |

pub mod analyze;
pub mod config;
pub mod history;
pub mod inference;
pub mod label;
pub mod models;
pub mod server;
pub mod summarize;
