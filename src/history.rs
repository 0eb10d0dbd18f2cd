//! File-backed history log.
//!
//! The history is one pretty-printed JSON array of [`HistoryEntry`] in a
//! single file. There is no in-memory cache: every operation loads the
//! current on-disk state, mutates it, and rewrites the whole file. An
//! absent file is treated as an empty log on `save` and `list`; `delete`
//! treats it as not found.
//!
//! # Consistency
//!
//! Every read-modify-write sequence runs under the store's mutex, so
//! writers within one process are serialized and no interleaving can lose
//! an append or a deletion. Writers in *other* processes are not
//! coordinated — concurrent external mutation of the same file can still
//! lose updates. Single-operator deployments run one process, so this is
//! an accepted limitation rather than a guaranteed invariant.

use anyhow::{bail, Context, Result};
use chrono::Local;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use crate::models::{HistoryEntry, SaveHistoryRequest};

/// Timestamp format stamped onto every saved entry.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append/list/delete over one shared JSON log file.
pub struct HistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Append a new entry built from the caller's payload.
    ///
    /// The entry's `timestamp` is stamped with the current local time at
    /// the moment of insertion; callers cannot supply one. Returns the
    /// stored entry.
    pub fn save(&self, payload: SaveHistoryRequest) -> Result<HistoryEntry> {
        let _guard = self.lock.lock();

        let mut log = self.load()?;

        let entry = HistoryEntry {
            text: payload.text,
            overall_sentiment: payload.overall_sentiment,
            score: payload.score,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            key_phrases: payload.key_phrases,
            summary: payload.summary,
        };

        log.push(entry.clone());
        self.write(&log)?;

        tracing::info!(entries = log.len(), "History entry saved");
        Ok(entry)
    }

    /// Return the full log in stored (append) order.
    ///
    /// An absent file yields an empty vec, never an error.
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        let _guard = self.lock.lock();
        self.load()
    }

    /// Remove every entry whose timestamp equals `timestamp` and rewrite
    /// the file with the filtered log. Returns the number of entries
    /// removed; zero matches is not an error.
    ///
    /// # Errors
    ///
    /// Fails with `"History file not found"` when no log file exists.
    pub fn delete(&self, timestamp: &str) -> Result<usize> {
        let _guard = self.lock.lock();

        if !self.path.exists() {
            bail!("History file not found");
        }

        let log = self.load()?;
        let before = log.len();
        let kept: Vec<HistoryEntry> = log
            .into_iter()
            .filter(|entry| entry.timestamp != timestamp)
            .collect();
        let removed = before - kept.len();

        self.write(&kept)?;

        tracing::info!(removed, timestamp, "History entries deleted");
        Ok(removed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("History file is not valid JSON: {}", self.path.display()))
    }

    fn write(&self, log: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(log)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))
    }
}
