use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use docstore_types::{Entry, EntryId};

/// Thirty days.
pub const DEFAULT_MAX_AGE: i64 = 86_400 * 30;

/// Cookie attributes applied to every session a store opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub path: String,
    /// Empty means the cookie is scoped to the issuing host.
    pub domain: String,
    /// Lifetime in seconds. Zero or less means the session is deleted on save.
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: String::new(),
            max_age: DEFAULT_MAX_AGE,
            secure: false,
            http_only: false,
        }
    }
}

/// An HTTP session: a named bag of values, stored server side under `id`.
#[derive(Clone, Debug)]
pub struct Session {
    name: String,
    pub(crate) id: Option<EntryId>,
    pub(crate) is_new: bool,
    pub values: Map<String, Value>,
    pub options: SessionOptions,
}

impl Session {
    pub fn new(name: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            name: name.into(),
            id: None,
            is_new: true,
            values: Map::new(),
            options,
        }
    }

    /// The cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage identifier, assigned on first save.
    pub fn id(&self) -> Option<EntryId> {
        self.id
    }

    /// True unless the session was restored from storage.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
}

/// The record kept in the backing collection: the sealed session values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(rename = "ID", default)]
    pub id: EntryId,
    #[serde(rename = "Data")]
    pub data: String,
}

impl Entry for StoredSession {
    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }
}

/// A cookie to hand back to the client after a save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub options: SessionOptions,
}

impl SessionCookie {
    /// True when this cookie tells the client to drop the session.
    pub fn is_removal(&self) -> bool {
        self.options.max_age <= 0
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if !self.options.path.is_empty() {
            out.push_str("; Path=");
            out.push_str(&self.options.path);
        }
        if !self.options.domain.is_empty() {
            out.push_str("; Domain=");
            out.push_str(&self.options.domain);
        }
        if self.is_removal() {
            out.push_str("; Expires=Thu, 01 Jan 1970 00:00:01 GMT; Max-Age=0");
        } else {
            out.push_str(&format!("; Max-Age={}", self.options.max_age));
        }
        if self.options.http_only {
            out.push_str("; HttpOnly");
        }
        if self.options.secure {
            out.push_str("; Secure");
        }
        out
    }
}
