use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use docstore_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("request body is not a JSON object")]
    InvalidJson,

    #[error("limit is not an integer: {0:?}")]
    InvalidLimit(String),

    #[error("invalid entry id: {0:?}")]
    InvalidId(String),

    #[error("invalid collection name: {0:?}")]
    InvalidCollection(String),

    #[error("entry not found")]
    NotFound,

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EntryDoesNotExist => Self::NotFound,
            StoreError::InvalidCollectionName(name) => Self::InvalidCollection(name),
            other => Self::Store(other),
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::InvalidLimit(_) | Self::InvalidId(_) | Self::InvalidCollection(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client. Internal details stay in the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidJson => "Invalid JSON",
            Self::InvalidLimit(_) => "Limit must be integer",
            Self::InvalidId(_) => "Invalid UUID",
            Self::InvalidCollection(_) => "Invalid collection name",
            Self::NotFound => "Not Found",
            _ => "Internal Server Error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "message": self.public_message() }))).into_response()
    }
}
