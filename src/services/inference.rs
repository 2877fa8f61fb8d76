//! Chat-completion client for the hosted inference provider.
//!
//! [`CompletionProvider`] is the seam: [`HuggingFaceClient`] talks to the real endpoint,
//! tests plug in their own implementations. [`ChatAgent`] sits on top and turns every
//! provider failure into [`FALLBACK_REPLY`], so callers always get text back.

use std::{path::Path, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned by [`ChatAgent::chat`] whenever the provider cannot be reached or answers garbage.
pub const FALLBACK_REPLY: &str = r#"{"recipes": []}"#;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request to inference provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inference provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode provider response: {0}")]
    Parse(String),

    #[error("provider response contained no completion")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A hosted chat-completion endpoint.
///
/// Implementations must be stateless per call: one instance is shared by every request.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion and return the text of the first choice.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, InferenceError>;

    fn model_name(&self) -> &str;
}

/// OpenAI-compatible chat completions, as served by the Hugging Face router.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HuggingFaceClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl CompletionProvider for HuggingFaceClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, InferenceError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(InferenceError::Api { status: status.as_u16(), message: body });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| InferenceError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(InferenceError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Read the system prompt once at startup. Never fails: a missing, unreadable or blank
/// file gives [`DEFAULT_SYSTEM_PROMPT`].
pub fn load_system_prompt(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "system prompt file is empty, using default");
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "could not read system prompt, using default");
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}

/// System prompt plus provider. Cheap to clone; holds nothing request-specific.
#[derive(Clone)]
pub struct ChatAgent {
    provider: Arc<dyn CompletionProvider>,
    system_prompt: Arc<str>,
}

impl ChatAgent {
    pub fn new(provider: Arc<dyn CompletionProvider>, system_prompt: impl Into<Arc<str>>) -> Self {
        Self { provider, system_prompt: system_prompt.into() }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Ask the model about `user_input`. The session id is only used for logging;
    /// conversation history is not sent to the provider.
    pub async fn chat(&self, user_input: &str, session_id: &str) -> String {
        let messages = [
            ChatMessage::system(&*self.system_prompt),
            ChatMessage::user(user_input),
        ];

        match self.provider.complete(&messages).await {
            Ok(reply) => {
                tracing::debug!(session_id, chars = reply.len(), "model replied");
                reply
            }
            Err(err) => {
                tracing::error!(session_id, error = %err, "inference failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
