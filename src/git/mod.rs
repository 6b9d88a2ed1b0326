//! Git operations by shelling out to the system `git` binary.

pub mod system;

use crate::error::GitError;

pub use system::{SystemGit, ensure_git_installed};

/// Remote that `push` sets as upstream.
pub const DEFAULT_REMOTE: &str = "origin";

/// Queries and mutations the commit workflow needs from git.
///
/// Queries are best-effort: a failing git command yields an empty result.
/// Mutations report failures.
#[cfg_attr(test, mockall::automock)]
pub trait GitClient {
    /// Files not known to git and not ignored.
    fn list_untracked(&self) -> Vec<String>;

    /// Tracked files with unstaged changes.
    fn list_modified(&self) -> Vec<String>;

    /// Unified diff of unstaged changes to `path`.
    fn diff_of(&self, path: &str) -> String;

    /// Current contents of the working-tree file at `path`.
    fn contents_of(&self, path: &str) -> Result<String, GitError>;

    /// Stage exactly these paths.
    fn stage(&self, paths: &[String]) -> Result<(), GitError>;

    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Name of the checked-out branch.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Push `branch` to the default remote and set it as upstream.
    fn push(&self, branch: &str) -> Result<(), GitError>;
}
