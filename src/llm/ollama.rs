//! Ollama provider — non-streaming calls to `/api/generate`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::error::LlmError;

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider};

const PROVIDER: &str = "ollama";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

/// Talks to a local or remote Ollama server.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            timeout,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model, prompt_len = request.prompt.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = self.generate_url();
        let payload = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            stream: false,
            options: request
                .temperature
                .map(|temperature| GenerateOptions { temperature }),
        };

        let mut builder = self.client.post(&url).timeout(self.timeout).json(&payload);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    provider: PROVIDER.to_string(),
                    timeout: self.timeout,
                }
            } else {
                LlmError::RequestFailed {
                    provider: PROVIDER.to_string(),
                    reason: format!("Failed to send request to {url}: {e}"),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Ollama API request failed");
            return Err(LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("status {status}: {body}"),
            });
        }

        let parsed: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse {
                    provider: PROVIDER.to_string(),
                    reason: e.to_string(),
                })?;

        debug!(done = parsed.done, len = parsed.response.len(), "Received Ollama response");

        let content = parsed.response.trim().to_string();
        if content.is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: PROVIDER.to_string(),
            });
        }

        Ok(CompletionResponse { content })
    }
}
