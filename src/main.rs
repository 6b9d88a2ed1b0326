//! acw - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acw::commit::run_commit;
use acw::config::{ConfigStore, Settings, ensure_config, run_config};
use acw::git::{SystemGit, ensure_git_installed};
use acw::{AcwError, TerminalPrompter};

/// Write commit messages for your local changes with an LLM.
#[derive(Parser, Debug)]
#[command(name = "acw")]
#[command(about = "Write commit messages for your local changes with an LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or edit the settings in ~/.acw
    Config,
    /// Pick changed files, generate a message, and commit (the default)
    Commit,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<AcwError>() {
            Some(AcwError::NoChanges) => {
                println!("No files have been changed.");
                ExitCode::SUCCESS
            }
            _ => {
                eprintln!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let store = ConfigStore::default_location().context("Failed to locate the config file")?;
    let mut prompter = TerminalPrompter::new();

    match cli.command.unwrap_or(Command::Commit) {
        Command::Config => {
            run_config(&store, &mut prompter)?;
        }
        Command::Commit => {
            ensure_git_installed().context("git is required")?;

            let map = ensure_config(&store, &mut prompter)?;
            let settings = Settings::from_map(&map)
                .with_context(|| format!("Invalid settings in {}", store.path().display()))?;

            let git = SystemGit::new();
            run_commit(&settings, &git, &mut prompter).await?;
        }
    }

    Ok(())
}
