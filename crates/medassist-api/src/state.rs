//! Application state wiring the controller to concrete adapters.
//!
//! `ChatController` is generic over its backend and store; AppState pins it
//! to the reqwest backend and to either the SQLite or the in-memory store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use medassist_core::chat::controller::ChatController;
use medassist_core::storage::kv_store::KvStore;
use medassist_infra::config::{load_config, resolve_api_key};
use medassist_infra::filesystem::resolve_data_dir;
use medassist_infra::http::HttpChatBackend;
use medassist_infra::memory::InMemoryKvStore;
use medassist_infra::sqlite::kv::SqliteKvStore;
use medassist_infra::sqlite::pool::{DatabasePool, database_url};
use medassist_types::config::ClientConfig;
use medassist_types::error::StorageError;
use serde_json::Value;

/// The local store selected at startup.
pub enum LocalStore {
    Sqlite(SqliteKvStore),
    Memory(InMemoryKvStore),
}

impl KvStore for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match self {
            LocalStore::Sqlite(store) => store.get(key).await,
            LocalStore::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        match self {
            LocalStore::Sqlite(store) => store.set(key, value).await,
            LocalStore::Memory(store) => store.set(key, value).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self {
            LocalStore::Sqlite(store) => store.delete(key).await,
            LocalStore::Memory(store) => store.delete(key).await,
        }
    }
}

pub type ConcreteController = ChatController<HttpChatBackend, LocalStore>;

/// Shared application state for every command.
pub struct AppState {
    pub config: ClientConfig,
    pub data_dir: PathBuf,
    pub backend: Arc<HttpChatBackend>,
    pub store: Arc<LocalStore>,
}

impl AppState {
    /// Load configuration, open the local store, and build the HTTP backend.
    pub async fn init(ephemeral: bool) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_config(&data_dir).await;

        let store = if ephemeral {
            LocalStore::Memory(InMemoryKvStore::new())
        } else {
            tokio::fs::create_dir_all(&data_dir)
                .await
                .with_context(|| format!("Failed to create {}", data_dir.display()))?;
            let url = format!("{}?mode=rwc", database_url(&data_dir));
            let pool = DatabasePool::new(&url)
                .await
                .context("Failed to open local database")?;
            LocalStore::Sqlite(SqliteKvStore::new(pool))
        };

        let api_key = resolve_api_key(&config);
        if api_key.is_none() {
            tracing::warn!("No API key configured; set MEDASSIST_API_KEY or api_key in config.toml");
        }
        let backend =
            HttpChatBackend::new(&config, api_key).context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            data_dir,
            backend: Arc::new(backend),
            store: Arc::new(store),
        })
    }

    /// A controller restored from the local store.
    pub async fn controller(&self) -> ConcreteController {
        ChatController::load(self.backend.clone(), self.store.clone()).await
    }
}
