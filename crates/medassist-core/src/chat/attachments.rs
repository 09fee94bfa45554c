//! Attachment pre-processing for a chat turn.
//!
//! Files are uploaded one at a time, in attachment order, all bound to the
//! same session. A file that fails is reported in the summary and the batch
//! moves on; only the failure to obtain a session aborts the batch.

use medassist_types::attachment::{Attachment, FileProcessingResult, FileProcessingStatus};
use medassist_types::error::ApiError;
use tracing::{debug, info, warn};

use crate::remote::backend::ChatBackend;

/// Opening message of a session created only to receive attachments.
pub const ATTACHMENT_SESSION_PROMPT: &str = "Starting a new consultation with attached files.";

/// Outcome of one attached file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub name: String,
    pub result: Result<FileProcessingResult, String>,
}

impl FileOutcome {
    fn line(&self) -> String {
        match &self.result {
            Ok(result) if result.status == FileProcessingStatus::Error => format!(
                "- {} (error): {}",
                self.name,
                result.detail().unwrap_or("processing failed")
            ),
            Ok(result) => format!(
                "- {} ({}): {}",
                self.name,
                result.status,
                result.detail().unwrap_or("processed")
            ),
            Err(message) => format!("- {} (error): {message}", self.name),
        }
    }

    pub fn is_error(&self) -> bool {
        match &self.result {
            Ok(result) => result.status == FileProcessingStatus::Error,
            Err(_) => true,
        }
    }
}

/// Result of processing every attachment of a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBatch {
    /// Session the files were bound to.
    pub session_id: String,
    /// Whether `session_id` was created by this batch.
    pub created_session: bool,
    pub outcomes: Vec<FileOutcome>,
}

impl ProcessedBatch {
    /// Human-readable block describing every file, in attachment order.
    pub fn summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.outcomes.len() + 1);
        lines.push("[Attached files]".to_string());
        lines.extend(self.outcomes.iter().map(FileOutcome::line));
        lines.join("\n")
    }
}

/// Process `files` against `session_id`, creating one session first if there
/// is none.
pub async fn process_attachments<B: ChatBackend>(
    backend: &B,
    session_id: Option<&str>,
    files: &[Attachment],
) -> Result<ProcessedBatch, ApiError> {
    let (session_id, created_session) = match session_id {
        Some(id) if !id.trim().is_empty() => (id.to_string(), false),
        _ => {
            let reply = backend.create_new_chat(ATTACHMENT_SESSION_PROMPT).await?;
            let id = reply.session_id.ok_or_else(|| {
                ApiError::Deserialization("new chat response carried no session_id".to_string())
            })?;
            info!(session_id = %id, "Session created for attachments");
            (id, true)
        }
    };

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        debug!(file = %file.name, session_id = %session_id, "Processing attachment");
        let result = match backend.process_file(file, &session_id).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(file = %file.name, "Attachment processing failed: {e}");
                Err(e.to_string())
            }
        };
        outcomes.push(FileOutcome {
            name: file.name.clone(),
            result,
        });
    }

    Ok(ProcessedBatch {
        session_id,
        created_session,
        outcomes,
    })
}

/// The user message for a turn: typed text, a blank line, then the summary.
/// With no typed text the summary stands alone.
pub fn compose_message(text: &str, summary: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        summary.to_string()
    } else {
        format!("{text}\n\n{summary}")
    }
}
