use serde_json::{Map, Value};

use docstore_remote::RemoteCollection;
use docstore_store::{Collection, StoreError};
use docstore_types::EntryId;

use crate::codec::SessionCodec;
use crate::error::{SessionError, SessionResult};
use crate::session::{Session, SessionCookie, SessionOptions, StoredSession};

/// Keeps session values in a collection and hands the client only a sealed
/// session identifier.
///
/// The stored blob is sealed too, so whoever can read the collection cannot
/// read or forge session contents without the keys.
#[derive(Debug)]
pub struct SessionStore<C: Collection> {
    collection: C,
    codec: SessionCodec,
    options: SessionOptions,
}

impl SessionStore<RemoteCollection> {
    /// Store sessions in the collection at `url` on a docstore peer.
    pub fn with_remote<K, I>(url: &str, domain: &str, keys: I) -> SessionResult<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let collection = RemoteCollection::new(url)?;
        let options = SessionOptions {
            domain: domain.to_string(),
            ..SessionOptions::default()
        };
        Ok(Self::new(collection, SessionCodec::new(keys)?, options))
    }
}

impl<C: Collection> SessionStore<C> {
    pub fn new(collection: C, codec: SessionCodec, options: SessionOptions) -> Self {
        let mut store = Self {
            collection,
            codec,
            options,
        };
        store.set_max_age(store.options.max_age);
        store
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Set the lifetime of new sessions and of sealed values.
    pub fn set_max_age(&mut self, seconds: i64) {
        self.options.max_age = seconds;
        self.codec.set_max_age(seconds);
    }

    /// Open the session named `name`.
    ///
    /// `cookie_value` is the client's cookie, if it sent one. A cookie that
    /// does not decode, has expired, or names a session that is no longer
    /// stored yields a fresh session. Storage failures are returned.
    pub fn open(&self, name: &str, cookie_value: Option<&str>) -> SessionResult<Session> {
        let mut session = Session::new(name, self.options.clone());
        let Some(cookie_value) = cookie_value else {
            return Ok(session);
        };

        let id: EntryId = match self.codec.decode(name, cookie_value) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(session = name, error = %e, "ignoring session cookie");
                return Ok(session);
            }
        };

        match self.load(name, id) {
            Ok(values) => {
                session.id = Some(id);
                session.values = values;
                session.is_new = false;
            }
            Err(SessionError::Store(StoreError::EntryDoesNotExist)) => {
                tracing::debug!(session = name, %id, "session no longer stored");
            }
            Err(e @ (SessionError::Decode(_) | SessionError::Expired | SessionError::Json(_))) => {
                tracing::debug!(session = name, %id, error = %e, "discarding stored session");
            }
            Err(e) => return Err(e),
        }
        Ok(session)
    }

    /// Persist `session` and return the cookie the client should receive.
    ///
    /// When the session's max age is zero or less the stored values are
    /// erased and the returned cookie removes the client's copy.
    pub fn save(&self, session: &mut Session) -> SessionResult<SessionCookie> {
        if session.options.max_age <= 0 {
            self.erase(session)?;
            return Ok(SessionCookie {
                name: session.name().to_string(),
                value: String::new(),
                options: session.options.clone(),
            });
        }

        let id = *session.id.get_or_insert_with(EntryId::new_random);
        let mut stored = StoredSession {
            id,
            data: self.codec.encode(session.name(), &session.values)?,
        };
        self.collection.persist(&mut stored)?;
        tracing::debug!(session = session.name(), %id, "session saved");

        Ok(SessionCookie {
            name: session.name().to_string(),
            value: self.codec.encode(session.name(), &id)?,
            options: session.options.clone(),
        })
    }

    /// Remove the stored values of `session`. Erasing a session that was
    /// never saved, or is already gone, succeeds.
    pub fn erase(&self, session: &Session) -> SessionResult<()> {
        let Some(id) = session.id else {
            return Ok(());
        };
        let stored = StoredSession {
            id,
            ..StoredSession::default()
        };
        match self.collection.delete(&stored) {
            Ok(()) | Err(StoreError::EntryDoesNotExist) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn load(&self, name: &str, id: EntryId) -> SessionResult<Map<String, Value>> {
        let stored: StoredSession = self.collection.load(id)?;
        self.codec.decode(name, &stored.data)
    }
}
