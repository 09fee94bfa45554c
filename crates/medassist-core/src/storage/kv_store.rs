//! Key-value store trait.
//!
//! The durable local store is a flat string-keyed map of JSON values, the
//! same model as a browser's local storage. Writes are whole-value
//! overwrites.

use medassist_types::error::StorageError;

/// Key under which the conversation's message array is stored.
pub const CONVERSATION_KEY: &str = "medical-chat";

/// Key under which the pinned file array is stored.
pub const PINNED_FILES_KEY: &str = "medical-chat-pinned-files";

/// Key under which the backend-assigned session id is stored.
pub const SESSION_ID_KEY: &str = "medical-chat-session";

/// Trait for local persistent key-value storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in medassist-infra.
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, StorageError>> + Send;

    /// Set a value for a key (upsert, full overwrite).
    fn set(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Delete a key. No-op if key does not exist.
    fn delete(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
