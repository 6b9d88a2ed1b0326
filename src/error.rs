//! Error types for acw modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing the `~/.acw` settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the home directory. Set ACW_CONFIG to a config file path.")]
    NoHomeDirectory,

    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed line {line_number} in config file (expected key=value): {line}")]
    MalformedLine { line_number: usize, line: String },

    #[error("Config is missing required key '{0}'. Run `acw config` to fix it.")]
    MissingKey(String),

    #[error("Config value for '{key}' is invalid: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Errors from git subprocess operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found in PATH")]
    NotInstalled,

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the language-model backends.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Unsupported model '{0}'. Run `acw config` and pick GPT_3_5_TURBO or LLAMA3.")]
    Unsupported(String),

    #[error("Backend configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {backend} failed: {source}")]
    Request {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{backend} returned HTTP {status}: {body}")]
    Status {
        backend: &'static str,
        status: u16,
        body: String,
    },

    #[error("{backend} returned an empty reply")]
    EmptyReply { backend: &'static str },

    #[error("Could not parse commit message JSON: {0}")]
    InvalidJson(String),
}

/// Errors from interactive prompts.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Cancelled")]
    Cancelled,

    #[error("Prompt failed: {0}")]
    Interaction(String),

    #[error("Failed to read from stdin: {0}")]
    Stdin(#[source] std::io::Error),
}

impl From<dialoguer::Error> for PromptError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                PromptError::Cancelled
            }
            other => PromptError::Interaction(other.to_string()),
        }
    }
}

/// Top-level errors from the `config` and `commit` commands.
#[derive(Error, Debug)]
pub enum AcwError {
    #[error("No files have been changed.")]
    NoChanges,

    #[error("The commit message is empty; nothing was staged or committed.")]
    EmptyMessage,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}
