//! SQLite key-value store implementation.
//!
//! Implements `KvStore` from `medassist-core` over the `local_store` table.
//! Values are stored as JSON text and deserialized on read.

use chrono::Utc;
use medassist_core::storage::kv_store::KvStore;
use medassist_types::error::StorageError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `KvStore`.
pub struct SqliteKvStore {
    pool: DatabasePool,
}

impl SqliteKvStore {
    /// Create a new KV store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn query_error(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StorageError::Connection,
        other => StorageError::Query(other.to_string()),
    }
}

impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let row = sqlx::query("SELECT value FROM local_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let value_str: String = row.try_get("value").map_err(query_error)?;
                let value = serde_json::from_str(&value_str).map_err(|e| {
                    StorageError::Serialization(format!("invalid JSON value for {key}: {e}"))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization(format!("failed to serialize value: {e}")))?;

        sqlx::query(
            r#"INSERT INTO local_store (key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(&value_str)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM local_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_core::chat::store::SessionStore;
    use medassist_core::storage::kv_store::CONVERSATION_KEY;
    use serde_json::json;
    use std::sync::Arc;

    async fn test_store() -> (SqliteKvStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("kv.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (SqliteKvStore::new(pool), dir)
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let (store, _dir) = test_store().await;
        let value = json!([{"name": "labs.pdf", "type": "PDF"}]);

        store.set("medical-chat-pinned-files", &value).await.unwrap();
        let got = store.get("medical-chat-pinned-files").await.unwrap();
        assert_eq!(got, Some(value));
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let (store, _dir) = test_store().await;
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (store, _dir) = test_store().await;
        store.set("medical-chat-session", &json!("abc123")).await.unwrap();
        store.set("medical-chat-session", &json!("def456")).await.unwrap();

        let got = store.get("medical-chat-session").await.unwrap();
        assert_eq!(got, Some(json!("def456")));
    }

    #[tokio::test]
    async fn test_delete_and_delete_missing() {
        let (store, _dir) = test_store().await;
        store.set("temp", &json!(1)).await.unwrap();
        store.delete("temp").await.unwrap();
        assert!(store.get("temp").await.unwrap().is_none());

        store.delete("nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_row_surfaces_serialization_error() {
        let (store, _dir) = test_store().await;
        sqlx::query(
            "INSERT INTO local_store (key, value, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(CONVERSATION_KEY)
        .bind("{not json")
        .bind(Utc::now().to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .execute(&store.pool.writer)
        .await
        .unwrap();

        let err = store.get(CONVERSATION_KEY).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));

        // The session store treats it as an empty conversation.
        let session = SessionStore::load(Arc::new(store)).await;
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_conversation_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("kv.db").display());

        let kv = Arc::new(SqliteKvStore::new(DatabasePool::new(&url).await.unwrap()));
        let mut session = SessionStore::load(kv).await;
        session.append_user("What is fever?").await.unwrap();
        session.append_assistant("Fever is...", Vec::new()).await.unwrap();
        let before = session.snapshot();

        let kv = Arc::new(SqliteKvStore::new(DatabasePool::new(&url).await.unwrap()));
        let reopened = SessionStore::load(kv).await;
        assert_eq!(reopened.messages(), before.as_slice());
    }
}
