use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::EntryId;

/// Reserved key under which untyped entries keep their identifier.
///
/// Typed entries use the same key (`#[serde(rename = "ID")]`) so that a file
/// written through one view can be read through the other.
pub const ID_KEY: &str = "ID";

/// Identity contract every stored object satisfies.
///
/// A nil identifier means "not yet assigned"; a collection assigns a fresh
/// random identifier before the first persist if and only if [`Entry::id`]
/// returns nil.
pub trait Entry {
    /// The entry's current identifier.
    fn id(&self) -> EntryId;

    /// Replace the entry's identifier.
    fn set_id(&mut self, id: EntryId);
}

/// Schema-less entry: an open map from field name to JSON value.
///
/// Unknown keys pass through serialization unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UntypedEntry(Map<String, Value>);

impl UntypedEntry {
    /// Create an empty untyped entry.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Consume the entry and return the underlying map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Entry for UntypedEntry {
    /// Returns nil when `"ID"` is absent, not a string, or not parsable.
    fn id(&self) -> EntryId {
        self.0
            .get(ID_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    fn set_id(&mut self, id: EntryId) {
        self.0.insert(ID_KEY.to_string(), Value::String(id.to_string()));
    }
}

impl From<Map<String, Value>> for UntypedEntry {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl Deref for UntypedEntry {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for UntypedEntry {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
