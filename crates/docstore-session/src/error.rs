use docstore_store::StoreError;

/// Errors from session encoding and storage.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no session keys configured")]
    NoKeys,

    #[error("session key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("session encryption failed")]
    Encryption,

    /// The value is malformed, tampered with, or sealed under an unknown key.
    #[error("session value could not be decoded: {0}")]
    Decode(String),

    #[error("session value expired")]
    Expired,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session storage error: {0}")]
    Store(#[from] StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;
