// src/message.rs
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { session_id: None, message: message.into() }
    }

    /// Session id to log against; blank ids fall back to the shared default.
    pub fn session_id(&self) -> &str {
        match self.session_id.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => DEFAULT_SESSION_ID,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
