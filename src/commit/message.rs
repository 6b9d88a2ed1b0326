//! The commit message returned by a backend.

use serde::{Deserialize, Deserializer};

/// A parsed commit message from the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitMessage {
    pub subject: String,
    /// Some models return the body as a list of lines; those are joined.
    #[serde(default, deserialize_with = "string_or_lines")]
    pub body: String,
}

impl CommitMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Format the message for git.
    ///
    /// Produces:
    /// ```text
    /// type(scope): subject
    ///
    /// Body text.
    /// ```
    /// A blank body leaves only the subject line.
    pub fn format(&self) -> String {
        let subject = self.subject.trim();
        let body = self.body.trim();

        if body.is_empty() {
            subject.to_string()
        } else {
            format!("{subject}\n\n{body}")
        }
    }
}

fn string_or_lines<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Body {
        Text(String),
        Lines(Vec<String>),
        Null(()),
    }

    Ok(match Body::deserialize(deserializer)? {
        Body::Text(text) => text,
        Body::Lines(lines) => lines.join("\n"),
        Body::Null(()) => String::new(),
    })
}
