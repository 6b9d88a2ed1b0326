//! Interactive prompts.
//!
//! Everything that reads from the terminal goes through [`Prompter`] so the
//! setup and commit flows can be driven by scripted answers in tests.

mod message_box;

use std::io::BufRead;

use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::error::PromptError;

pub use message_box::render_message_box;

/// Terminal interactions needed by setup and the commit workflow.
pub trait Prompter {
    /// Pick one item; returns its index.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError>;

    /// Pick any number of items; returns their indices in list order.
    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Vec<usize>, PromptError>;

    /// Yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError>;

    /// Single line of text. An empty answer is allowed.
    fn input(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Free-form lines, terminated by the first blank line.
    fn read_lines(&mut self) -> Result<Vec<String>, PromptError>;
}

/// [`Prompter`] backed by dialoguer on the real terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?
            .ok_or(PromptError::Cancelled)
    }

    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Vec<usize>, PromptError> {
        MultiSelect::new()
            .with_prompt(prompt)
            .items(items)
            .interact_opt()?
            .ok_or(PromptError::Cancelled)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_opt()?
            .ok_or(PromptError::Cancelled)
    }

    fn input(&mut self, prompt: &str) -> Result<String, PromptError> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn read_lines(&mut self) -> Result<Vec<String>, PromptError> {
        read_lines_until_blank(std::io::stdin().lock())
    }
}

/// Collect lines until the first blank one (or end of input).
pub fn read_lines_until_blank<R: BufRead>(reader: R) -> Result<Vec<String>, PromptError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(PromptError::Stdin)?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}
