// src/services/orchestrator.rs
use std::sync::Arc;

use anyhow::Context;
use tracing::Instrument;
use uuid::Uuid;

use super::{enricher::enrich, image_lookup::ImageFinder, inference::ChatAgent, sanitizer::sanitize};
use crate::{
    config::Enrichment,
    error::AppError,
    message::{ChatRequest, ChatResponse},
    recipe::parse_recipes,
};

pub const NO_MESSAGE: &str = "No message provided";

/// Turns one chat request into one best-effort response.
///
/// Upstream trouble never surfaces from here: the agent falls back to an empty
/// collection, image misses become placeholders, and replies that are not recipe JSON
/// are passed through as text.
#[derive(Clone)]
pub struct Orchestrator {
    agent: ChatAgent,
    images: Arc<dyn ImageFinder>,
    enrichment: Enrichment,
}

impl Orchestrator {
    pub fn new(agent: ChatAgent, images: Arc<dyn ImageFinder>, enrichment: Enrichment) -> Self {
        Self { agent, images, enrichment }
    }

    pub fn model_name(&self) -> &str {
        self.agent.model_name()
    }

    pub async fn respond(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::BadRequest(NO_MESSAGE.to_string()));
        }

        let session_id = request.session_id();
        let span = tracing::info_span!("chat", request_id = %Uuid::new_v4(), session_id);

        self.run(message, session_id).instrument(span).await
    }

    async fn run(&self, message: &str, session_id: &str) -> Result<ChatResponse, AppError> {
        let reply = self.agent.chat(message, session_id).await;
        let cleaned = sanitize(&reply);

        if self.enrichment == Enrichment::Off {
            return Ok(self.with_model(cleaned));
        }

        let Some(collection) = parse_recipes(&cleaned) else {
            tracing::info!("reply is not a recipe collection, passing text through");
            return Ok(ChatResponse { response: cleaned, model: None });
        };

        let count = collection.recipes.len();
        let enriched = enrich(collection, self.images.as_ref()).await;
        let encoded = serde_json::to_string(&enriched).context("could not encode enriched recipes")?;

        tracing::info!(recipes = count, "answered with enriched recipes");
        Ok(self.with_model(encoded))
    }

    fn with_model(&self, response: String) -> ChatResponse {
        ChatResponse { response, model: Some(self.model_name().to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::inference::{ChatMessage, CompletionProvider, InferenceError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned(&'static str);

    #[async_trait]
    impl CompletionProvider for Canned {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, InferenceError> {
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "canned-model"
        }
    }

    #[derive(Default)]
    struct CountingFinder(AtomicUsize);

    #[async_trait]
    impl ImageFinder for CountingFinder {
        async fn find_image(&self, query: &str) -> Option<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Some(format!("http://img/{}.jpg", query.to_lowercase()))
        }
    }

    fn orchestrator(reply: &'static str, finder: Arc<CountingFinder>, enrichment: Enrichment) -> Orchestrator {
        let agent = ChatAgent::new(Arc::new(Canned(reply)), "prompt");
        Orchestrator::new(agent, finder, enrichment)
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_inference() {
        let orch = orchestrator("unused", Arc::default(), Enrichment::On);
        for message in ["", "   ", "\n\t"] {
            let err = orch.respond(&ChatRequest::new(message)).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(ref m) if m == NO_MESSAGE));
        }
    }

    #[tokio::test]
    async fn fenced_recipes_are_enriched() {
        let finder = Arc::new(CountingFinder::default());
        let orch = orchestrator("```json\n{\"recipes\":[{\"title\":\"Pasta\"}]}\n```", finder.clone(), Enrichment::On);

        let resp = orch.respond(&ChatRequest::new("pasta?")).await.unwrap();
        assert_eq!(resp.model.as_deref(), Some("canned-model"));

        let value: serde_json::Value = serde_json::from_str(&resp.response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"recipes":[{"title":"Pasta","image":"http://img/pasta.jpg"}]})
        );
        assert_eq!(finder.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn odd_image_and_title_values_still_get_enriched() {
        let finder = Arc::new(CountingFinder::default());
        let reply = r#"{"recipes":[
            {"title":"Pasta","image":{"url":"http://x/y.jpg"}},
            {"title":"Soup","image":7},
            {"title":42}
        ]}"#;
        let orch = orchestrator(reply, finder.clone(), Enrichment::On);

        let resp = orch.respond(&ChatRequest::new("dinner?")).await.unwrap();
        assert_eq!(resp.model.as_deref(), Some("canned-model"));

        let value: serde_json::Value = serde_json::from_str(&resp.response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"recipes":[
                {"title":"Pasta","image":"http://img/pasta.jpg"},
                {"title":"Soup","image":"http://img/soup.jpg"},
                {"title":42,"image":crate::services::enricher::PLACEHOLDER_IMAGE_URL}
            ]})
        );
        // the numeric title is never searched
        assert_eq!(finder.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn prose_is_passed_through_without_model() {
        let orch = orchestrator("I don't know", Arc::default(), Enrichment::On);
        let resp = orch.respond(&ChatRequest::new("huh")).await.unwrap();
        assert_eq!(resp.response, "I don't know");
        assert_eq!(resp.model, None);
    }

    #[tokio::test]
    async fn enrichment_off_skips_lookups() {
        let finder = Arc::new(CountingFinder::default());
        let orch = orchestrator("```json\n{\"recipes\":[{\"title\":\"Pasta\"}]}\n```", finder.clone(), Enrichment::Off);

        let resp = orch.respond(&ChatRequest::new("pasta?")).await.unwrap();
        assert_eq!(resp.response, r#"{"recipes":[{"title":"Pasta"}]}"#);
        assert_eq!(resp.model.as_deref(), Some("canned-model"));
        assert_eq!(finder.0.load(Ordering::SeqCst), 0);
    }
}
