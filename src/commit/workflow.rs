//! The commit workflow: select files, describe them, commit, push.

use tracing::debug;

use crate::backend::{Backend, MessageGenerator};
use crate::commit::payload::build_payload;
use crate::config::Settings;
use crate::error::{AcwError, BackendError};
use crate::git::GitClient;
use crate::ui::{Prompter, render_message_box};

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Files that were staged, untracked first.
    pub files: Vec<String>,
    /// Message the commit was created with.
    pub message: String,
    /// Branch that was pushed, if the user chose to push.
    pub pushed_branch: Option<String>,
}

/// Run the workflow with the backend named in `settings`.
pub async fn run_commit<G, P>(
    settings: &Settings,
    git: &G,
    prompter: &mut P,
) -> Result<CommitOutcome, AcwError>
where
    G: GitClient,
    P: Prompter,
{
    run_commit_with(settings, git, prompter, Backend::from_settings).await
}

/// Run the workflow with a caller-supplied backend resolver.
///
/// The resolver is only called once there is a non-empty payload, so a bad
/// backend identifier never matters when there is nothing to commit.
pub async fn run_commit_with<G, P, M, R>(
    settings: &Settings,
    git: &G,
    prompter: &mut P,
    resolve: R,
) -> Result<CommitOutcome, AcwError>
where
    G: GitClient,
    P: Prompter,
    M: MessageGenerator,
    R: FnOnce(&Settings) -> Result<M, BackendError>,
{
    // Step 1: pick files
    let untracked = select_files(prompter, "Select from [Untracked files]", git.list_untracked())?;
    let modified = select_files(
        prompter,
        "Select from [Changes not staged for commit]",
        git.list_modified(),
    )?;

    // Step 2: collect what changed
    let payload = build_payload(git, &untracked, &modified)?;
    if payload.is_empty() {
        return Err(AcwError::NoChanges);
    }

    // Step 3: ask the model
    let generator = resolve(settings)?;
    println!("Generating commit message...");
    let generated = generator
        .generate(&settings.prompt_message, &payload.text())
        .await?;

    // Step 4: confirm or rewrite
    let message = confirm_message(prompter, &generated.format())?;
    if message.trim().is_empty() {
        return Err(AcwError::EmptyMessage);
    }

    // Step 5: stage exactly the chosen files and commit
    let files: Vec<String> = untracked.into_iter().chain(modified).collect();
    git.stage(&files)?;
    git.commit(&message)?;
    println!("Committed {} file(s).", files.len());

    // Step 6: optional push
    let pushed_branch = push_if_requested(git, prompter)?;

    Ok(CommitOutcome {
        files,
        message,
        pushed_branch,
    })
}

/// Let the user choose from `candidates`; an empty list skips the prompt.
fn select_files<P: Prompter>(
    prompter: &mut P,
    prompt: &str,
    candidates: Vec<String>,
) -> Result<Vec<String>, AcwError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let chosen = prompter.multi_select(prompt, &candidates)?;
    Ok(candidates
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| chosen.contains(idx))
        .map(|(_, path)| path)
        .collect())
}

/// Show the generated message; on rejection read a replacement typed line by
/// line, ending with a blank line.
fn confirm_message<P: Prompter>(prompter: &mut P, generated: &str) -> Result<String, AcwError> {
    println!("Generated Commit Message:");
    println!();
    println!("{}", render_message_box(generated));
    println!();

    if prompter.confirm("Do you like the generated commit message?", true)? {
        return Ok(generated.to_string());
    }

    println!("Please enter a commit message (finish with an empty line).");
    let lines = prompter.read_lines()?;
    debug!("User wrote a {}-line message", lines.len());
    Ok(lines.join("\n"))
}

fn push_if_requested<G: GitClient, P: Prompter>(
    git: &G,
    prompter: &mut P,
) -> Result<Option<String>, AcwError> {
    if !prompter.confirm("Shall we continue with the push?", false)? {
        return Ok(None);
    }

    let branch = git.current_branch()?;
    git.push(&branch)?;
    println!("Pushed {}.", branch);
    Ok(Some(branch))
}
