//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default chat model.
pub const DEFAULT_MODEL: &str = "llama3.1";
/// Low-randomness sampling.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// Model name passed to the server.
    pub model: String,
    /// Sampling temperature for every chat completion.
    pub temperature: f32,
    /// Upper bound for a single model call.
    pub request_timeout: Duration,
    /// Bearer token for Ollama servers behind an authenticating proxy.
    pub api_key: Option<SecretString>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(120), // 2 minutes
            api_key: None,
        }
    }
}

impl AssistantConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ollama_url = lookup("OLLAMA_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.ollama_url);

        let model = lookup("DIETARY_ASSIST_MODEL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.model);

        let temperature = match lookup("DIETARY_ASSIST_TEMPERATURE") {
            Some(raw) => parse_temperature(&raw)?,
            None => defaults.temperature,
        };

        let request_timeout = match lookup("DIETARY_ASSIST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "DIETARY_ASSIST_TIMEOUT_SECS".to_string(),
                    message: format!("expected a whole number of seconds, got {raw:?}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "DIETARY_ASSIST_TIMEOUT_SECS".to_string(),
                        message: "timeout must be greater than zero".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let api_key = lookup("OLLAMA_API_KEY")
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            ollama_url,
            model,
            temperature,
            request_timeout,
            api_key,
        })
    }
}

fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let value: f32 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: "DIETARY_ASSIST_TEMPERATURE".to_string(),
        message: format!("expected a number, got {raw:?}"),
    })?;
    if !(0.0..=2.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            key: "DIETARY_ASSIST_TEMPERATURE".to_string(),
            message: format!("{value} is outside 0.0..=2.0"),
        });
    }
    Ok(value)
}
