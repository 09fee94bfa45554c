//! Attachment types for file processing before a chat turn.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::pinned::FileCategory;

/// A file attached to the pending turn.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_mime(&self.mime_type)
    }
}

// Attachments can be megabytes of binary data; keep Debug output to the metadata.
impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Outcome reported by the backend for one processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileProcessingStatus {
    Success,
    Processed,
    Error,
}

impl fmt::Display for FileProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileProcessingStatus::Success => write!(f, "success"),
            FileProcessingStatus::Processed => write!(f, "processed"),
            FileProcessingStatus::Error => write!(f, "error"),
        }
    }
}

/// Response body of `POST /chat/process-file/{session_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileProcessingResult {
    pub status: FileProcessingStatus,
    #[serde(default, alias = "text", skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FileProcessingResult {
    /// The most useful human-readable detail: summary, then extracted text, then message.
    pub fn detail(&self) -> Option<&str> {
        [&self.summary, &self.extracted_text, &self.message]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_bytes() {
        let att = Attachment::new("scan.png", "image/png", vec![0u8; 2048]);
        let dbg = format!("{att:?}");
        assert!(dbg.contains("len: 2048"));
        assert!(!dbg.contains("[0, 0"));
    }

    #[test]
    fn test_processing_result_accepts_text_alias() {
        let result: FileProcessingResult =
            serde_json::from_str(r#"{"status": "processed", "text": "Hb 13.2 g/dL"}"#).unwrap();
        assert_eq!(result.status, FileProcessingStatus::Processed);
        assert_eq!(result.detail(), Some("Hb 13.2 g/dL"));
    }

    #[test]
    fn test_detail_prefers_summary_and_skips_blank() {
        let result = FileProcessingResult {
            status: FileProcessingStatus::Success,
            extracted_text: Some("raw text".to_string()),
            summary: Some("   ".to_string()),
            message: None,
        };
        assert_eq!(result.detail(), Some("raw text"));
    }
}
