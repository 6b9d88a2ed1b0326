//! Config keys, defaults, and the typed view threaded through the workflow.

use std::str::FromStr;

use crate::backend::BackendKind;
use crate::config::store::ConfigMap;
use crate::error::ConfigError;

pub const MODEL: &str = "MODEL";
pub const COMMIT_MESSAGE_LANGUAGE: &str = "COMMIT_MESSAGE_LANGUAGE";
pub const PROMPT_MESSAGE: &str = "PROMPT_MESSAGE";
pub const OPEN_AI_API_KEY: &str = "OPEN_AI_API_KEY";
pub const OPEN_AI_MODEL: &str = "OPEN_AI_MODEL";
pub const OPEN_AI_BASE_URL: &str = "OPEN_AI_BASE_URL";
pub const OPEN_AI_TEMPERATURE: &str = "OPEN_AI_TEMPERATURE";
pub const OPEN_AI_TOP_P: &str = "OPEN_AI_TOP_P";
pub const OPEN_AI_MAX_TOKENS: &str = "OPEN_AI_MAX_TOKENS";
pub const OPEN_AI_FREQUENCY_PENALTY: &str = "OPEN_AI_FREQUENCY_PENALTY";
pub const OPEN_AI_PRESENCE_PENALTY: &str = "OPEN_AI_PRESENCE_PENALTY";
pub const OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const OLLAMA_HOST: &str = "OLLAMA_HOST";

pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_OPEN_AI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPEN_AI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_FREQUENCY_PENALTY: f32 = 0.0;
pub const DEFAULT_PRESENCE_PENALTY: f32 = 0.0;
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Default system instruction for the given commit message language.
pub fn default_prompt_message(language: &str) -> String {
    format!(
        "You will be provided with a piece of code, and your task is to generate a commit \
         message for it in a conventional commit message format (e.g., feat: add new feature). \
         Please respond in JSON format with the keys 'subject', 'body'. Subject and Body should \
         be up to 70 characters each line in {language}."
    )
}

/// Build the full default mapping written by first-run setup.
///
/// The hosted backend gets its credential and generation parameters; the
/// local backend only needs a model name and the server address.
pub fn default_config(kind: BackendKind, api_key: Option<&str>) -> ConfigMap {
    let mut map = ConfigMap::new();
    map.set(MODEL, kind.config_value());
    map.set(COMMIT_MESSAGE_LANGUAGE, DEFAULT_LANGUAGE);
    map.set(PROMPT_MESSAGE, default_prompt_message(DEFAULT_LANGUAGE));

    match kind {
        BackendKind::OpenAi => {
            map.set(OPEN_AI_API_KEY, api_key.unwrap_or_default());
            map.set(OPEN_AI_MODEL, DEFAULT_OPEN_AI_MODEL);
            map.set(OPEN_AI_TEMPERATURE, DEFAULT_TEMPERATURE.to_string());
            map.set(OPEN_AI_TOP_P, DEFAULT_TOP_P.to_string());
            map.set(OPEN_AI_MAX_TOKENS, DEFAULT_MAX_TOKENS.to_string());
            map.set(OPEN_AI_FREQUENCY_PENALTY, DEFAULT_FREQUENCY_PENALTY.to_string());
            map.set(OPEN_AI_PRESENCE_PENALTY, DEFAULT_PRESENCE_PENALTY.to_string());
        }
        BackendKind::Ollama => {
            map.set(OLLAMA_MODEL, DEFAULT_OLLAMA_MODEL);
            map.set(OLLAMA_HOST, DEFAULT_OLLAMA_HOST);
        }
    }

    map
}

/// Immutable settings for one run, built from the loaded config file.
///
/// `model` is kept as the raw identifier: an unknown value is only an error
/// once a backend is actually needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub language: String,
    pub prompt_message: String,
    values: ConfigMap,
}

impl Settings {
    pub fn from_map(map: &ConfigMap) -> Result<Self, ConfigError> {
        let model = required(map, MODEL)?.to_string();
        let language = map
            .get(COMMIT_MESSAGE_LANGUAGE)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();
        let prompt_message = match map.get(PROMPT_MESSAGE).filter(|v| !v.is_empty()) {
            Some(prompt) => prompt.to_string(),
            None => default_prompt_message(&language),
        };

        Ok(Self {
            model,
            language,
            prompt_message,
            values: map.clone(),
        })
    }

    /// Raw value for a backend-specific key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key)
    }

    /// Value for `key`, or an error naming the missing key.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        required(&self.values, key)
    }

    /// Parse `key` if present, falling back to `default` when absent or empty.
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.values.get(key).map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
            }),
            None => Ok(default),
        }
    }

    /// String value for `key`, or `default` when absent or empty.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values
            .get(key)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}

fn required<'a>(map: &'a ConfigMap, key: &str) -> Result<&'a str, ConfigError> {
    map.get(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_openai_key_order() {
        let map = default_config(BackendKind::OpenAi, Some("sk-123"));
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(
            keys,
            vec![
                MODEL,
                COMMIT_MESSAGE_LANGUAGE,
                PROMPT_MESSAGE,
                OPEN_AI_API_KEY,
                OPEN_AI_MODEL,
                OPEN_AI_TEMPERATURE,
                OPEN_AI_TOP_P,
                OPEN_AI_MAX_TOKENS,
                OPEN_AI_FREQUENCY_PENALTY,
                OPEN_AI_PRESENCE_PENALTY,
            ]
        );
        assert_eq!(map.get(MODEL), Some("GPT_3_5_TURBO"));
        assert_eq!(map.get(OPEN_AI_API_KEY), Some("sk-123"));
        assert_eq!(map.get(OPEN_AI_TOP_P), Some("0.95"));
        assert_eq!(map.get(OPEN_AI_MAX_TOKENS), Some("500"));
    }

    #[test]
    fn test_default_config_ollama_has_no_credential() {
        let map = default_config(BackendKind::Ollama, None);
        assert_eq!(map.get(MODEL), Some("LLAMA3"));
        assert!(!map.contains_key(OPEN_AI_API_KEY));
        assert_eq!(map.get(OLLAMA_MODEL), Some("llama3"));
        assert_eq!(map.get(OLLAMA_HOST), Some("http://localhost:11434"));
    }

    #[test]
    fn test_default_prompt_mentions_language_and_keys() {
        let prompt = default_prompt_message("Korean");
        assert!(prompt.contains("in Korean"));
        assert!(prompt.contains("'subject'"));
        assert!(prompt.contains("'body'"));
        assert!(prompt.contains("70 characters"));
        assert!(!prompt.contains('='));
    }

    #[test]
    fn test_settings_from_map() {
        let map = default_config(BackendKind::OpenAi, Some("sk"));
        let settings = Settings::from_map(&map).unwrap();
        assert_eq!(settings.model, "GPT_3_5_TURBO");
        assert_eq!(settings.language, "English");
        assert!(settings.prompt_message.contains("conventional commit"));
    }

    #[test]
    fn test_settings_missing_model() {
        let map: ConfigMap = [(COMMIT_MESSAGE_LANGUAGE, "English")].into_iter().collect();
        let err = Settings::from_map(&map).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == MODEL));
    }

    #[test]
    fn test_settings_keeps_unknown_model() {
        let map: ConfigMap = [(MODEL, "CLAUDE")].into_iter().collect();
        let settings = Settings::from_map(&map).unwrap();
        assert_eq!(settings.model, "CLAUDE");
    }

    #[test]
    fn test_prompt_falls_back_to_language_default() {
        let map: ConfigMap = [(MODEL, "LLAMA3"), (COMMIT_MESSAGE_LANGUAGE, "German")]
            .into_iter()
            .collect();
        let settings = Settings::from_map(&map).unwrap();
        assert!(settings.prompt_message.ends_with("in German."));
    }

    #[test]
    fn test_parse_or_values() {
        let map: ConfigMap = [(MODEL, "GPT_3_5_TURBO"), (OPEN_AI_TEMPERATURE, "0.7"), (OPEN_AI_MAX_TOKENS, "lots")]
            .into_iter()
            .collect();
        let settings = Settings::from_map(&map).unwrap();

        assert_eq!(settings.parse_or(OPEN_AI_TEMPERATURE, 0.0f32).unwrap(), 0.7);
        assert_eq!(settings.parse_or(OPEN_AI_TOP_P, 0.95f32).unwrap(), 0.95);
        let err = settings.parse_or(OPEN_AI_MAX_TOKENS, 500u32).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref value, .. } if value == "lots"));
    }
}
