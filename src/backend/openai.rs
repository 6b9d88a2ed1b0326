//! Hosted OpenAI chat-completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{MessageGenerator, parse_commit_message, request_timeout};
use crate::commit::CommitMessage;
use crate::config::Settings;
use crate::config::settings::{
    DEFAULT_FREQUENCY_PENALTY, DEFAULT_MAX_TOKENS, DEFAULT_OPEN_AI_BASE_URL, DEFAULT_OPEN_AI_MODEL,
    DEFAULT_PRESENCE_PENALTY, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, OPEN_AI_API_KEY,
    OPEN_AI_BASE_URL, OPEN_AI_FREQUENCY_PENALTY, OPEN_AI_MAX_TOKENS, OPEN_AI_MODEL,
    OPEN_AI_PRESENCE_PENALTY, OPEN_AI_TEMPERATURE, OPEN_AI_TOP_P,
};
use crate::error::BackendError;

const BACKEND_NAME: &str = "OpenAI";

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
            frequency_penalty: DEFAULT_FREQUENCY_PENALTY,
            presence_penalty: DEFAULT_PRESENCE_PENALTY,
        }
    }
}

impl GenerationParams {
    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        Ok(Self {
            temperature: settings.parse_or(OPEN_AI_TEMPERATURE, DEFAULT_TEMPERATURE)?,
            top_p: settings.parse_or(OPEN_AI_TOP_P, DEFAULT_TOP_P)?,
            max_tokens: settings.parse_or(OPEN_AI_MAX_TOKENS, DEFAULT_MAX_TOKENS)?,
            frequency_penalty: settings
                .parse_or(OPEN_AI_FREQUENCY_PENALTY, DEFAULT_FREQUENCY_PENALTY)?,
            presence_penalty: settings.parse_or(OPEN_AI_PRESENCE_PENALTY, DEFAULT_PRESENCE_PENALTY)?,
        })
    }
}

/// Client for `POST {base_url}/chat/completions`.
#[derive(Debug)]
pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    params: GenerationParams,
}

impl OpenAiBackend {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        params: GenerationParams,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(request_timeout())
            .build()
            .map_err(BackendError::Client)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_OPEN_AI_BASE_URL.to_string(),
            params,
        })
    }

    /// Point at an OpenAI-compatible server instead of api.openai.com.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        let api_key = settings.require(OPEN_AI_API_KEY)?;
        let model = settings.get_or(OPEN_AI_MODEL, DEFAULT_OPEN_AI_MODEL);
        let params = GenerationParams::from_settings(settings)?;
        let base_url = settings.get_or(OPEN_AI_BASE_URL, DEFAULT_OPEN_AI_BASE_URL);

        Ok(Self::new(api_key, model, params)?.with_base_url(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request<'a>(&'a self, system_prompt: &'a str, payload: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: payload,
                },
            ],
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            max_tokens: self.params.max_tokens,
            frequency_penalty: self.params.frequency_penalty,
            presence_penalty: self.params.presence_penalty,
        }
    }
}

#[async_trait]
impl MessageGenerator for OpenAiBackend {
    async fn generate(&self, system_prompt: &str, payload: &str) -> Result<CommitMessage, BackendError> {
        let request = self.build_request(system_prompt, payload);
        debug!(
            "Sending {} chars to {} model {}",
            payload.len(),
            BACKEND_NAME,
            self.model
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
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

        let completion: ChatResponse = response.json().await.map_err(|source| BackendError::Request {
            backend: BACKEND_NAME,
            source,
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(BackendError::EmptyReply {
                backend: BACKEND_NAME,
            })?;

        debug!("Raw {} reply: {}", BACKEND_NAME, content);
        parse_commit_message(&content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigMap;
    use crate::config::settings::MODEL;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let map: ConfigMap = pairs.iter().copied().collect();
        Settings::from_map(&map).unwrap()
    }

    #[test]
    fn test_params_default_when_keys_absent() {
        let s = settings(&[(MODEL, "GPT_3_5_TURBO")]);
        assert_eq!(GenerationParams::from_settings(&s).unwrap(), GenerationParams::default());
    }

    #[test]
    fn test_params_parse_values() {
        let s = settings(&[
            (MODEL, "GPT_3_5_TURBO"),
            (OPEN_AI_TEMPERATURE, "0.5"),
            (OPEN_AI_MAX_TOKENS, "256"),
        ]);
        let params = GenerationParams::from_settings(&s).unwrap();
        assert_eq!(params.temperature, 0.5);
        assert_eq!(params.max_tokens, 256);
        assert_eq!(params.top_p, DEFAULT_TOP_P);
    }

    #[test]
    fn test_params_invalid_value() {
        let s = settings(&[(MODEL, "GPT_3_5_TURBO"), (OPEN_AI_TOP_P, "high")]);
        let err = GenerationParams::from_settings(&s).unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }

    #[test]
    fn test_request_shape() {
        let backend = OpenAiBackend::new("sk", "gpt-3.5-turbo", GenerationParams::default()).unwrap();
        let request = backend.build_request("system text", "diff text");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "system text");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "diff text");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = OpenAiBackend::new("sk", "m", GenerationParams::default())
            .unwrap()
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(backend.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_from_settings_uses_model_key() {
        let s = settings(&[
            (MODEL, "GPT_3_5_TURBO"),
            (OPEN_AI_API_KEY, "sk"),
            (OPEN_AI_MODEL, "gpt-4o-mini"),
        ]);
        let backend = OpenAiBackend::from_settings(&s).unwrap();
        assert_eq!(backend.model(), "gpt-4o-mini");
    }
}
