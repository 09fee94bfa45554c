//! Conversation transcripts for download.

use medassist_types::chat::{ChatMessage, MessageRole};

use std::fmt;
use std::str::FromStr;

/// Speaker label of the assistant in text transcripts.
pub const ASSISTANT_LABEL: &str = "MedAssist";

/// Speaker label of the user in text transcripts.
pub const USER_LABEL: &str = "You";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Text => "medical-chat.txt",
            ExportFormat::Json => "medical-chat.json",
        }
    }

    pub fn render(&self, messages: &[ChatMessage]) -> Result<String, serde_json::Error> {
        match self {
            ExportFormat::Text => Ok(to_text(messages)),
            ExportFormat::Json => to_json(messages),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("invalid export format: '{other}'")),
        }
    }
}

/// `You: ...` / `MedAssist: ...` blocks separated by a blank line.
pub fn to_text(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let speaker = match m.role {
                MessageRole::User => USER_LABEL,
                MessageRole::Assistant => ASSISTANT_LABEL,
            };
            format!("{speaker}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pretty-printed JSON array of the full messages.
pub fn to_json(messages: &[ChatMessage]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(messages)
}
