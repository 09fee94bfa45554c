//! ChatBackend trait definition.
//!
//! One method per backend endpoint. Implementations are stateless apart from
//! configuration and perform no retries; retry policy belongs to the caller.

use medassist_types::attachment::{Attachment, FileProcessingResult};
use medassist_types::chat::Source;
use medassist_types::error::ApiError;
use medassist_types::remote::{ChatReply, DeleteAck, RemoteSession, SessionList};

/// Trait for the remote chat API.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in medassist-infra (e.g., `HttpChatBackend`).
pub trait ChatBackend: Send + Sync {
    /// Start a new conversation server-side. The reply carries the assigned
    /// `session_id` that every later call in this conversation must use.
    fn create_new_chat(
        &self,
        message: &str,
    ) -> impl std::future::Future<Output = Result<ChatReply, ApiError>> + Send;

    /// Append a user message to an existing session and return the reply.
    fn send_message(
        &self,
        session_id: &str,
        message: &str,
        sources: &[Source],
    ) -> impl std::future::Future<Output = Result<ChatReply, ApiError>> + Send;

    /// Fetch the full server-side history of one session.
    fn get_chat_history(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<RemoteSession, ApiError>> + Send;

    /// List every session of the authenticated user.
    fn get_all_chats(
        &self,
    ) -> impl std::future::Future<Output = Result<SessionList, ApiError>> + Send;

    /// Delete a session. Deleting an unknown or already deleted session
    /// surfaces the backend's HTTP error.
    fn delete_chat(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<DeleteAck, ApiError>> + Send;

    /// Upload a file without binding it to a session.
    fn upload_file(
        &self,
        file: &Attachment,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, ApiError>> + Send;

    /// Upload a file bound to a session and return its extraction outcome.
    fn process_file(
        &self,
        file: &Attachment,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<FileProcessingResult, ApiError>> + Send;
}
