//! LLM integration for Dietary Assist.
//!
//! The assistant talks to an Ollama server over its HTTP API. Everything
//! else depends only on the `LlmProvider` trait, so tests swap in stubs.

pub mod ollama;
pub mod provider;

pub use ollama::OllamaProvider;
pub use provider::*;

use std::sync::Arc;

use crate::config::AssistantConfig;

/// Create the LLM provider described by the configuration.
pub fn create_provider(config: &AssistantConfig) -> Arc<dyn LlmProvider> {
    tracing::info!(
        "Using Ollama at {} (model: {})",
        config.ollama_url,
        config.model
    );
    Arc::new(OllamaProvider::new(
        config.ollama_url.clone(),
        config.model.clone(),
        config.api_key.clone(),
        config.request_timeout,
    ))
}
