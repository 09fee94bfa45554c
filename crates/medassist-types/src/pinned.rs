//! Pinned file references.
//!
//! Pinned files are kept for quick reference next to the conversation and are
//! persisted independently of the message list.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Coarse category of a pinned file, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileCategory {
    Pdf,
    Image,
    Document,
}

impl FileCategory {
    /// `pdf` anywhere in the MIME type wins over `image`; anything else is a document.
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.to_ascii_lowercase();
        if mime.contains("pdf") {
            FileCategory::Pdf
        } else if mime.contains("image") {
            FileCategory::Image
        } else {
            FileCategory::Document
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileCategory::Pdf => write!(f, "PDF"),
            FileCategory::Image => write!(f, "IMAGE"),
            FileCategory::Document => write!(f, "DOCUMENT"),
        }
    }
}

/// A pinned file. Identity is the `(name, category)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinnedFile {
    pub name: String,
    #[serde(rename = "type")]
    pub category: FileCategory,
}

impl PinnedFile {
    pub fn new(name: impl Into<String>, mime_type: &str) -> Self {
        Self {
            name: name.into(),
            category: FileCategory::from_mime(mime_type),
        }
    }
}
