// src/config.rs
use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.2-3B-Instruct";
pub const DEFAULT_INFERENCE_URL: &str = "https://router.huggingface.co/v1/chat/completions";
pub const DEFAULT_IMAGE_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_PROMPT_PATH: &str = "prompt.txt";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

// Must fit a full 800-token completion; the image search stays at a few seconds.
const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API_TOKEN is not set (HF_API_TOKEN is accepted too)")]
    MissingToken,

    #[error("{key} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },

    #[error("ENRICHMENT must be on or off, got {0:?}")]
    InvalidEnrichment(String),
}

/// Whether recipe replies get image lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Enrichment {
    #[default]
    On,
    Off,
}

impl FromStr for Enrichment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => Ok(Enrichment::On),
            "off" | "false" | "0" | "no" => Ok(Enrichment::Off),
            _ => Err(ConfigError::InvalidEnrichment(s.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_token: String,
    pub model_name: String,
    pub inference_url: String,
    pub image_search_url: String,
    pub prompt_path: PathBuf,
    pub bind_addr: String,
    pub enrichment: Enrichment,
    pub inference_timeout: Duration,
    pub image_timeout: Duration,
}

// Keeps the token out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.token_hint())
            .field("model_name", &self.model_name)
            .field("inference_url", &self.inference_url)
            .field("image_search_url", &self.image_search_url)
            .field("prompt_path", &self.prompt_path)
            .field("bind_addr", &self.bind_addr)
            .field("enrichment", &self.enrichment)
            .field("inference_timeout", &self.inference_timeout)
            .field("image_timeout", &self.image_timeout)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let api_token = get("API_TOKEN")
            .or_else(|| get("HF_API_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;

        let enrichment = match get("ENRICHMENT") {
            Some(raw) => raw.parse()?,
            None => Enrichment::default(),
        };

        Ok(Self {
            api_token,
            model_name: get("MODEL_NAME")
                .or_else(|| get("TEXT_MODEL"))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            inference_url: get("INFERENCE_URL").unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
            image_search_url: get("IMAGE_SEARCH_URL").unwrap_or_else(|| DEFAULT_IMAGE_SEARCH_URL.to_string()),
            prompt_path: get("PROMPT_PATH").unwrap_or_else(|| DEFAULT_PROMPT_PATH.to_string()).into(),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            enrichment,
            inference_timeout: timeout(get("INFERENCE_TIMEOUT_SECS"), "INFERENCE_TIMEOUT_SECS", DEFAULT_INFERENCE_TIMEOUT_SECS)?,
            image_timeout: timeout(get("IMAGE_TIMEOUT_SECS"), "IMAGE_TIMEOUT_SECS", DEFAULT_IMAGE_TIMEOUT_SECS)?,
        })
    }

    /// First few characters of the token followed by an ellipsis.
    pub fn token_hint(&self) -> String {
        let prefix: String = self.api_token.chars().take(6).collect();
        format!("{prefix}...")
    }
}

fn timeout(raw: Option<String>, key: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default_secs));
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout { key, value: raw }),
    }
}
