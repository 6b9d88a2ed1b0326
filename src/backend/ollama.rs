//! Local Ollama backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{MessageGenerator, parse_commit_message, request_timeout};
use crate::commit::CommitMessage;
use crate::config::Settings;
use crate::config::settings::{DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_MODEL, OLLAMA_HOST, OLLAMA_MODEL};
use crate::error::BackendError;

const BACKEND_NAME: &str = "Ollama";

/// Client for a local Ollama server's `/api/chat` endpoint.
#[derive(Debug)]
pub struct OllamaBackend {
    client: Client,
    host: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(request_timeout())
            .build()
            .map_err(BackendError::Client)?;

        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        Self::new(
            settings.get_or(OLLAMA_HOST, DEFAULT_OLLAMA_HOST),
            settings.get_or(OLLAMA_MODEL, DEFAULT_OLLAMA_MODEL),
        )
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }
}

#[async_trait]
impl MessageGenerator for OllamaBackend {
    async fn generate(&self, system_prompt: &str, payload: &str) -> Result<CommitMessage, BackendError> {
        let request = OllamaRequest {
            model: &self.model,
            messages: vec![
                OllamaMessage {
                    role: "system",
                    content: system_prompt,
                },
                OllamaMessage {
                    role: "user",
                    content: payload,
                },
            ],
            stream: false,
            format: "json",
        };
        debug!("Sending {} chars to {} model {}", payload.len(), BACKEND_NAME, self.model);

        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .map_err(|source| BackendError::Request {
                backend: BACKEND_NAME,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                backend: BACKEND_NAME,
                status: status.as_u16(),
                body,
            });
        }

        let reply: OllamaResponse = response.json().await.map_err(|source| BackendError::Request {
            backend: BACKEND_NAME,
            source,
        })?;

        let content = reply.message.content;
        if content.trim().is_empty() {
            return Err(BackendError::EmptyReply {
                backend: BACKEND_NAME,
            });
        }

        debug!("Raw {} reply: {}", BACKEND_NAME, content);
        parse_commit_message(&content)
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaReply,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: String,
}
