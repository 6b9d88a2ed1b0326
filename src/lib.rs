//! acw - A CLI tool that writes commit messages for your local changes.
//!
//! # Overview
//!
//! acw lets you pick untracked and modified files, sends their contents and
//! diffs to a language model (the OpenAI API or a local Ollama server), shows
//! the suggested conventional commit message, and commits the chosen files
//! once you confirm. Settings live in a flat `key=value` file at `~/.acw`.

pub mod backend;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod ui;

// Re-export commonly used types
pub use backend::{Backend, BackendKind, MessageGenerator};
pub use commit::{CommitMessage, CommitOutcome, DiffPayload};
pub use config::{ConfigMap, ConfigStore, Settings};
pub use error::{AcwError, BackendError, ConfigError, GitError, PromptError};
pub use git::{GitClient, SystemGit};
pub use ui::{Prompter, TerminalPrompter};
