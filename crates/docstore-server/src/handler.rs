use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use docstore_filter::Filter;
use docstore_store::{Collection, Storage};
use docstore_types::{CollectionInfo, Entry, EntryId, UntypedEntry};

use crate::error::{ServerError, ServerResult};

/// Query parameter that bounds a listing; every other parameter is a filter field.
const LIMIT_PARAM: &str = "limit";

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }
}

/// Body returned after a successful persist.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    #[serde(rename = "ID")]
    pub id: EntryId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Run blocking engine work off the async executor.
async fn blocking<T, F>(work: F) -> ServerResult<T>
where
    F: FnOnce() -> ServerResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
}

fn parse_id(raw: &str) -> ServerResult<EntryId> {
    raw.parse().map_err(|_| ServerError::InvalidId(raw.to_string()))
}

/// `GET /`: the collection registry.
pub async fn list_collections(State(state): State<AppState>) -> ServerResult<Json<Vec<CollectionInfo>>> {
    blocking(move || Ok(state.storage.list_collections()?))
        .await
        .map(Json)
}

/// `POST /{collection}`: persist the body as an untyped entry.
pub async fn create_entry(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Bytes,
) -> ServerResult<Json<IdResponse>> {
    let mut entry: UntypedEntry = serde_json::from_slice(&body).map_err(|_| ServerError::InvalidJson)?;

    blocking(move || {
        state.storage.collection(&collection)?.persist(&mut entry)?;
        Ok(Json(IdResponse { id: entry.id() }))
    })
    .await
}

/// `GET /{collection}`: list or query entries.
///
/// `limit` bounds the result and a negative one yields no entries; any
/// other parameter becomes a filter field.
/// When a parameter repeats, its first value is used.
pub async fn list_entries(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ServerResult<Json<Vec<UntypedEntry>>> {
    let mut limit: i64 = 0;
    let mut seen = HashSet::new();
    let mut filter_pairs = Vec::new();
    for (key, value) in params {
        if !seen.insert(key.clone()) {
            continue;
        }
        if key == LIMIT_PARAM {
            if !value.is_empty() {
                limit = value.parse().map_err(|_| ServerError::InvalidLimit(value.clone()))?;
            }
        } else {
            filter_pairs.push((key, value));
        }
    }
    // A negative limit admits nothing.
    let Ok(limit) = usize::try_from(limit) else {
        return Ok(Json(Vec::new()));
    };

    blocking(move || {
        let entries = state.storage.collection(&collection)?;
        let found: Vec<UntypedEntry> = if filter_pairs.is_empty() {
            entries.load_all(limit)?
        } else {
            entries.query(&Filter::from_query_pairs(filter_pairs), limit)?
        };
        Ok(Json(found))
    })
    .await
}

/// `GET /{collection}/{id}`: load one entry.
pub async fn get_entry(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ServerResult<Json<UntypedEntry>> {
    let id = parse_id(&id)?;
    blocking(move || {
        let entry: UntypedEntry = state.storage.collection(&collection)?.load(id)?;
        Ok(Json(entry))
    })
    .await
}

/// `DELETE /{collection}/{id}`: remove one entry.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> ServerResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    blocking(move || {
        let mut entry = UntypedEntry::new();
        entry.set_id(id);
        state.storage.collection(&collection)?.delete(&entry)?;
        Ok(Json(MessageResponse {
            message: "OK".to_string(),
        }))
    })
    .await
}
