//! AI-generated commit messages for selected working-tree changes.

pub mod message;
pub mod payload;
pub mod workflow;

pub use message::CommitMessage;
pub use payload::{DiffPayload, build_payload};
pub use workflow::{CommitOutcome, run_commit, run_commit_with};
