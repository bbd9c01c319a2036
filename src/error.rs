//! Error types for Dietary Assist.

use std::time::Duration;

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Onboarding form validation errors.
///
/// Reported inline on the form; the session does not advance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("At least one dietary restriction must be selected")]
    MissingRestrictions,

    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

impl ValidationError {
    /// Message shown to the user next to the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingName | Self::MissingRestrictions => {
                "Por favor, preencha seu nome e selecione ao menos uma restrição alimentar."
                    .to_string()
            }
            Self::UnknownOption(option) => format!("Opção inválida: {option}"),
        }
    }
}

/// Session lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Session is already onboarded; reset it before creating a new profile")]
    AlreadyOnboarded,
}

/// Presentation channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Provider {provider} returned an empty response")]
    EmptyResponse { provider: String },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
