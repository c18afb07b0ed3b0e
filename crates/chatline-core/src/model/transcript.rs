use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded `{speaker, message}` unit of conversation.
///
/// Older records carry neither a timestamp nor, occasionally, a speaker or
/// message; those load with placeholder values instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptEntry {
    #[serde(default = "unknown_speaker")]
    pub speaker: String,
    #[serde(default = "blank_message")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn unknown_speaker() -> String {
    "Unknown".to_string()
}

fn blank_message() -> String {
    " ".to_string()
}

impl TranscriptEntry {
    pub fn new(speaker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            message: message.into(),
            timestamp: None,
        }
    }

    /// Same as [`TranscriptEntry::new`], stamped with the current time.
    pub fn now(speaker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Some(Utc::now()),
            ..Self::new(speaker, message)
        }
    }

    /// `"<speaker>: <message>"`, the line format used by history listings.
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker, self.message)
    }
}

/// Who produced a message, before it is resolved to a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Agent,
    System,
}

impl Speaker {
    /// Resolve the role to the name written into the transcript. Anything
    /// not said by the user is attributed to the agent.
    pub fn display_name<'a>(&self, user: &'a str, agent: &'a str) -> &'a str {
        match self {
            Speaker::User => user,
            Speaker::Agent | Speaker::System => agent,
        }
    }
}
