//! Wire types of the backend chat API.
//!
//! These mirror the backend's response schemas. Timestamps are ISO-8601; the
//! backend emits them without an offset, so they are kept as strings here and
//! parsed only where displayed.

use serde::{Deserialize, Serialize};

use crate::chat::{MessageRole, Source};

/// A message as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMessage {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Full server-side chat session (`GET /chat/{session_id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSession {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<RemoteMessage>,
}

/// Response of `GET /chat/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionList {
    #[serde(default)]
    pub sessions: Vec<RemoteSession>,
}

/// Response of `DELETE /chat/{session_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// A normalized assistant reply from `POST /chat/new` or `POST /chat/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Present on replies that create or echo a session.
    pub session_id: Option<String>,
    pub session_title: Option<String>,
    pub content: String,
    pub sources: Vec<Source>,
}
