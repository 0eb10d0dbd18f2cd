use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
        }
    }
}

fn default_history_path() -> PathBuf {
    PathBuf::from("history.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl InferenceConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate server
    if config.server.bind.is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    // Validate inference
    match config.inference.provider.as_str() {
        "disabled" | "http" => {}
        other => anyhow::bail!(
            "Unknown inference provider: '{}'. Must be disabled or http.",
            other
        ),
    }

    if config.inference.is_enabled() {
        match &config.inference.base_url {
            Some(url) if !url.is_empty() => {}
            _ => anyhow::bail!(
                "inference.base_url must be set when provider is '{}'",
                config.inference.provider
            ),
        }
    }

    if config.inference.timeout_secs == 0 {
        anyhow::bail!("inference.timeout_secs must be > 0");
    }

    Ok(config)
}
