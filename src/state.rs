// src/state.rs
use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::services::image_lookup::{GoogleImageScraper, ImageFinder};
use crate::services::inference::{ChatAgent, CompletionProvider, HuggingFaceClient, load_system_prompt};
use crate::services::orchestrator::Orchestrator;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Wire the production clients. Both HTTP clients are built once here and shared
    /// by every request.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn CompletionProvider> = Arc::new(
            HuggingFaceClient::new(
                &config.inference_url,
                &config.api_token,
                &config.model_name,
                config.inference_timeout,
            )
            .context("building inference client")?,
        );

        let images: Arc<dyn ImageFinder> = Arc::new(
            GoogleImageScraper::new(&config.image_search_url, config.image_timeout)
                .context("building image search client")?,
        );

        let system_prompt = load_system_prompt(&config.prompt_path);
        let agent = ChatAgent::new(provider, system_prompt);

        Ok(Self::new(Orchestrator::new(agent, images, config.enrichment)))
    }
}
