//! Language-model backends that turn a diff payload into a commit message.

pub mod json;
pub mod ollama;
pub mod openai;

use std::env;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::commit::CommitMessage;
use crate::config::Settings;
use crate::error::BackendError;

pub use json::{extract_json, parse_commit_message};
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

/// Default timeout for one backend request (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "ACW_BACKEND_TIMEOUT";

/// Get the configured request timeout.
///
/// Reads ACW_BACKEND_TIMEOUT (seconds) if set; a zero or non-numeric value
/// logs a warning and falls back to the default.
pub(crate) fn request_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Backends selectable in the config file under `MODEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted OpenAI chat-completions API.
    OpenAi,
    /// Locally running Ollama server.
    Ollama,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::OpenAi, BackendKind::Ollama];

    /// Identifier stored in the config file.
    pub fn config_value(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "GPT_3_5_TURBO",
            BackendKind::Ollama => "LLAMA3",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "OpenAI, needs an OpenAI API key",
            BackendKind::Ollama => "Ollama, runs locally",
        }
    }

    pub fn needs_api_key(&self) -> bool {
        matches!(self, BackendKind::OpenAi)
    }

    pub fn from_config_value(value: &str) -> Option<Self> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.config_value() == value.trim())
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_value())
    }
}

/// Something that can write a commit message for a diff.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    /// Send `system_prompt` as the system turn and `payload` as the user turn.
    async fn generate(&self, system_prompt: &str, payload: &str) -> Result<CommitMessage, BackendError>;
}

/// The configured backend.
#[derive(Debug)]
pub enum Backend {
    OpenAi(OpenAiBackend),
    Ollama(OllamaBackend),
}

impl Backend {
    /// Build the backend named by `settings.model`.
    ///
    /// Fails with [`BackendError::Unsupported`] when the identifier matches
    /// neither backend.
    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        let kind = BackendKind::from_config_value(&settings.model)
            .ok_or_else(|| BackendError::Unsupported(settings.model.clone()))?;
        debug!("Using {} backend", kind);

        match kind {
            BackendKind::OpenAi => Ok(Backend::OpenAi(OpenAiBackend::from_settings(settings)?)),
            BackendKind::Ollama => Ok(Backend::Ollama(OllamaBackend::from_settings(settings)?)),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::OpenAi(_) => BackendKind::OpenAi,
            Backend::Ollama(_) => BackendKind::Ollama,
        }
    }
}

#[async_trait]
impl MessageGenerator for Backend {
    async fn generate(&self, system_prompt: &str, payload: &str) -> Result<CommitMessage, BackendError> {
        match self {
            Backend::OpenAi(backend) => backend.generate(system_prompt, payload).await,
            Backend::Ollama(backend) => backend.generate(system_prompt, payload).await,
        }
    }
}
