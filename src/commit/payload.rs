//! Diff payload sent to the backend as the user turn.

use tracing::debug;

use crate::error::GitError;
use crate::git::GitClient;

/// Ordered pieces of change text: untracked file contents first, then diff
/// lines of modified files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffPayload {
    entries: Vec<String>,
}

impl DiffPayload {
    /// True when nothing was collected, i.e. there is nothing to describe.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Everything joined with newlines.
    pub fn text(&self) -> String {
        self.entries.join("\n")
    }
}

/// Build the payload for the chosen files.
///
/// Untracked files contribute their full contents. Modified files contribute
/// their unified diff split into lines, minus the final line of each diff.
pub fn build_payload<G: GitClient + ?Sized>(
    git: &G,
    untracked: &[String],
    modified: &[String],
) -> Result<DiffPayload, GitError> {
    let mut entries = Vec::new();

    for path in untracked {
        entries.push(git.contents_of(path)?);
    }

    for path in modified {
        let diff = git.diff_of(path);
        let diff = diff.trim();
        if diff.is_empty() {
            debug!("No diff for {}", path);
            continue;
        }

        let lines: Vec<&str> = diff.split('\n').collect();
        entries.extend(lines[..lines.len() - 1].iter().map(|l| l.to_string()));
    }

    debug!(
        "Payload: {} untracked, {} modified, {} entries",
        untracked.len(),
        modified.len(),
        entries.len()
    );
    Ok(DiffPayload { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockGitClient;
    use mockall::predicate::eq;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_nothing_selected_is_empty() {
        let git = MockGitClient::new();
        let payload = build_payload(&git, &[], &[]).unwrap();
        assert!(payload.is_empty());
        assert_eq!(payload.text(), "");
    }

    #[test]
    fn test_untracked_contents_come_first() {
        let mut git = MockGitClient::new();
        git.expect_contents_of()
            .with(eq("new.rs"))
            .returning(|_| Ok("fn main() {}\n".to_string()));
        git.expect_diff_of()
            .with(eq("lib.rs"))
            .returning(|_| "diff --git a/lib.rs b/lib.rs\n-old\n+new\n trailing".to_string());

        let payload = build_payload(&git, &paths(&["new.rs"]), &paths(&["lib.rs"])).unwrap();

        assert_eq!(
            payload.entries(),
            &paths(&["fn main() {}\n", "diff --git a/lib.rs b/lib.rs", "-old", "+new"])[..]
        );
        assert_eq!(
            payload.text(),
            "fn main() {}\n\ndiff --git a/lib.rs b/lib.rs\n-old\n+new"
        );
    }

    #[test]
    fn test_modified_diff_drops_last_line() {
        let mut git = MockGitClient::new();
        git.expect_diff_of()
            .returning(|_| "line one\nline two\nline three\n".to_string());

        let payload = build_payload(&git, &[], &paths(&["a.txt"])).unwrap();

        assert_eq!(payload.entries(), &paths(&["line one", "line two"])[..]);
    }

    #[test]
    fn test_empty_diff_is_skipped() {
        let mut git = MockGitClient::new();
        git.expect_diff_of().returning(|_| String::new());

        let payload = build_payload(&git, &[], &paths(&["a.txt"])).unwrap();

        assert!(payload.is_empty());
    }

    #[test]
    fn test_unreadable_untracked_file_is_error() {
        let mut git = MockGitClient::new();
        git.expect_contents_of().returning(|path| {
            Err(GitError::ReadFile {
                path: path.into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        });

        let err = build_payload(&git, &paths(&["gone.txt"]), &[]).unwrap_err();
        assert!(matches!(err, GitError::ReadFile { .. }));
    }
}
