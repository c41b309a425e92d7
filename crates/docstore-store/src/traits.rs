use serde::de::DeserializeOwned;
use serde::Serialize;

use docstore_filter::Filterable;
use docstore_types::{Entry, EntryId};

use crate::error::StoreResult;

/// A named set of entries.
///
/// All implementations must satisfy these invariants:
/// - Identifiers are unique within a collection.
/// - `persist` assigns a fresh random identifier if and only if the entry's
///   current identifier is nil, and fully overwrites any previous version.
/// - `delete` and `load` of an unknown identifier fail with
///   [`StoreError::EntryDoesNotExist`](crate::StoreError::EntryDoesNotExist).
/// - `load_all` and `query` return entries in unspecified order; `limit == 0`
///   means unbounded, otherwise at most `limit` entries are returned.
pub trait Collection: Send + Sync {
    /// The collection's namespace key.
    fn name(&self) -> &str;

    /// Create or overwrite an entry. The assigned identifier is written back
    /// into `entry`.
    fn persist<E>(&self, entry: &mut E) -> StoreResult<()>
    where
        E: Entry + Serialize;

    /// Remove the entry with `entry.id()`.
    fn delete<E>(&self, entry: &E) -> StoreResult<()>
    where
        E: Entry + ?Sized;

    /// Read and decode the entry with the given identifier.
    fn load<E>(&self, id: EntryId) -> StoreResult<E>
    where
        E: DeserializeOwned;

    /// Decode every entry, stopping after `limit` entries.
    fn load_all<E>(&self, limit: usize) -> StoreResult<Vec<E>>
    where
        E: DeserializeOwned;

    /// Decode every entry and keep those that pass `filter`, stopping after
    /// `limit` passing entries.
    fn query<F, E>(&self, filter: &F, limit: usize) -> StoreResult<Vec<E>>
    where
        F: Filterable + ?Sized,
        E: Serialize + DeserializeOwned;
}
