//! Pinned files, persisted apart from the conversation.

use std::sync::Arc;

use medassist_types::error::StorageError;
use medassist_types::pinned::PinnedFile;
use tracing::warn;

use crate::storage::kv_store::{KvStore, PINNED_FILES_KEY};

/// Deduplicated list of pinned files.
pub struct PinnedFiles<K: KvStore> {
    kv: Arc<K>,
    files: Vec<PinnedFile>,
}

impl<K: KvStore> PinnedFiles<K> {
    /// Restore the persisted list; a malformed record is logged and ignored.
    pub async fn load(kv: Arc<K>) -> Self {
        let files = match kv.get(PINNED_FILES_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Failed to parse pinned files, starting empty: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read pinned files, starting empty: {e}");
                Vec::new()
            }
        };
        Self { kv, files }
    }

    pub fn files(&self) -> &[PinnedFile] {
        &self.files
    }

    /// Pin a file by name and MIME type. Returns `false` when the same
    /// `(name, category)` pair is already pinned.
    pub async fn pin(&mut self, name: &str, mime_type: &str) -> Result<bool, StorageError> {
        let file = PinnedFile::new(name, mime_type);
        if self.files.contains(&file) {
            return Ok(false);
        }

        let mut next = self.files.clone();
        next.push(file);
        let value = serde_json::to_value(&next)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(PINNED_FILES_KEY, &value).await?;
        self.files = next;
        Ok(true)
    }

    pub async fn unpin_all(&mut self) -> Result<(), StorageError> {
        self.kv.delete(PINNED_FILES_KEY).await?;
        self.files.clear();
        Ok(())
    }
}
