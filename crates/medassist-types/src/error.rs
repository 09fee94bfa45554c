use thiserror::Error;

/// Errors from the remote chat API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx body did not match the schema of a fixed-shape endpoint.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The request was rejected locally and never sent.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl ApiError {
    /// HTTP status code, if the failure came from the backend.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport and HTTP failures roll back the optimistic local change.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Http { .. })
    }
}

/// Errors from the local key-value store (used by trait definitions in medassist-core).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced by the chat controller.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("a turn is already in progress")]
    Busy,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
