use docstore_types::EntryId;

/// Errors from collection operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested identifier has no backing entry.
    #[error("entry does not exist")]
    EntryDoesNotExist,

    /// A stored entry does not decode into the requested shape.
    #[error("entry {collection}/{id}.json contains bad data")]
    EntryNotParsable { id: EntryId, collection: String },

    /// A `.json` file in a collection directory is not named after an identifier.
    #[error("invalid entry file {collection}/{file}")]
    InvalidEntryFile { collection: String, file: String },

    /// The collection name cannot be used as a directory name.
    #[error("invalid collection name: {0:?}")]
    InvalidCollectionName(String),

    /// Encoding or decoding JSON failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection lock was poisoned by a panicking holder.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// The request to a remote collection could not be completed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A remote collection answered with an error status.
    #[error("remote error {status}: {message}")]
    Remote { status: u16, message: String },
}

/// Result alias for collection operations.
pub type StoreResult<T> = Result<T, StoreError>;
