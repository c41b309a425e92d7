//! Encrypted HTTP sessions kept in a docstore collection.
//!
//! The client's cookie carries only the sealed session identifier. The
//! session values live in the backing collection as a [`StoredSession`]
//! whose `Data` field is sealed under the same keys, so neither the client
//! nor a reader of the collection can see or forge them.
//!
//! ```no_run
//! use docstore_session::{SessionCodec, SessionStore};
//!
//! let key = SessionCodec::generate_key();
//! let store = SessionStore::with_remote("http://localhost:8080/sessions", "example.org", [key])?;
//!
//! let mut session = store.open("sid", None)?;
//! session.insert("user", "selma");
//! let cookie = store.save(&mut session)?;
//! println!("Set-Cookie: {}", cookie.to_header_value());
//! # Ok::<(), docstore_session::SessionError>(())
//! ```

pub mod codec;
pub mod error;
pub mod session;
pub mod store;

pub use codec::{SessionCodec, KEY_SIZE};
pub use error::{SessionError, SessionResult};
pub use session::{Session, SessionCookie, SessionOptions, StoredSession, DEFAULT_MAX_AGE};
pub use store::SessionStore;
