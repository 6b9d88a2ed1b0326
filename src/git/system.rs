//! [`GitClient`] backed by `std::process::Command`.
//!
//! Shelling out inherits the user's git config, hooks, SSH agent, and
//! credential store, which matters for `commit` and `push`.
//!
//! Every command runs from the repository's top-level directory, so the paths
//! git reports and the paths it is given share one base no matter where acw
//! was started.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::error::GitError;
use crate::git::{DEFAULT_REMOTE, GitClient};

/// Check that a `git` executable is on PATH.
pub fn ensure_git_installed() -> Result<(), GitError> {
    which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled)
}

/// Runs git against the repository containing the current directory, or the
/// one containing a fixed working directory.
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    workdir: Option<PathBuf>,
    root: OnceLock<PathBuf>,
}

impl SystemGit {
    /// Operate on the repository containing the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Operate on the repository containing `workdir`.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
            root: OnceLock::new(),
        }
    }

    /// Top-level directory of the repository, resolved on first use.
    ///
    /// Outside a repository this is the starting directory itself; the git
    /// commands run there then fail with git's own message.
    pub fn root(&self) -> &Path {
        self.root.get_or_init(|| {
            let start = self.workdir.clone().unwrap_or_else(|| PathBuf::from("."));
            let mut cmd = Command::new("git");
            cmd.current_dir(&start);
            match run(cmd, &["rev-parse", "--show-toplevel"], "find repository root") {
                Ok(stdout) => {
                    let top = stdout.trim_end_matches(['\n', '\r']);
                    debug!("Repository root: {}", top);
                    PathBuf::from(top)
                }
                Err(e) => {
                    warn!("Could not find repository root: {}", e);
                    start
                }
            }
        })
    }

    /// Run a git command from the repository root and return its stdout.
    fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        cmd.current_dir(self.root());
        run(cmd, args, operation)
    }

    /// Run a read-only query; failures are logged and read as empty output.
    fn query(&self, args: &[&str], operation: &str) -> String {
        match self.run_git(args, operation) {
            Ok(stdout) => stdout,
            Err(e) => {
                warn!("Error executing git command: {}", e);
                String::new()
            }
        }
    }
}

/// Run `cmd` with `args` and return its stdout, or a descriptive error.
fn run(mut cmd: Command, args: &[&str], operation: &str) -> Result<String, GitError> {
    debug!("git {}", args.join(" "));
    let output = cmd
        .args(args)
        .output()
        .map_err(|source| GitError::SpawnFailed {
            operation: operation.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Split NUL-terminated `-z` output into paths, verbatim.
fn split_paths(output: &str) -> Vec<String> {
    output
        .split('\0')
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

impl GitClient for SystemGit {
    fn list_untracked(&self) -> Vec<String> {
        split_paths(&self.query(
            &["ls-files", "-z", "--others", "--exclude-standard"],
            "list untracked files",
        ))
    }

    fn list_modified(&self) -> Vec<String> {
        split_paths(&self.query(&["diff", "-z", "--name-only"], "list modified files"))
    }

    fn diff_of(&self, path: &str) -> String {
        self.query(&["diff", "--", path], "diff")
    }

    fn contents_of(&self, path: &str) -> Result<String, GitError> {
        let full_path = self.root().join(path);
        let bytes = std::fs::read(&full_path).map_err(|source| GitError::ReadFile {
            path: full_path.clone(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn stage(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }

        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run_git(&args, "stage files").map(|_| ())
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run_git(&["commit", "-m", message], "create commit")
            .map(|_| ())
    }

    fn current_branch(&self) -> Result<String, GitError> {
        let stdout = self.run_git(&["rev-parse", "--abbrev-ref", "HEAD"], "resolve branch")?;
        let branch = stdout.lines().next().unwrap_or_default().trim().to_string();
        if branch.is_empty() {
            return Err(GitError::CommandFailed {
                operation: "resolve branch".to_string(),
                stderr: "no branch name returned".to_string(),
            });
        }
        Ok(branch)
    }

    fn push(&self, branch: &str) -> Result<(), GitError> {
        self.run_git(&["push", "--set-upstream", DEFAULT_REMOTE, branch], "push")
            .map(|_| ())
    }
}
