//! File-backed collection engine for docstore.
//!
//! A collection is a named directory under a storage root holding one JSON
//! file per entry, at `<root>/<collection>/<id>.json`. Collections are
//! created lazily on first persist.
//!
//! # Backends
//!
//! All backends implement the [`Collection`] trait:
//!
//! - [`FilesystemCollection`]: local directory of entry files, handed out by [`Storage`]
//! - `RemoteCollection` (in `docstore-remote`): the same contract over HTTP
//!
//! # Design Rules
//!
//! 1. The storage root is injected; there is no process-wide default.
//! 2. Every operation on a collection holds that collection's lock for its
//!    full duration, and all handles for one name share the same lock.
//! 3. A nil identifier is replaced with a fresh random one on persist.
//! 4. A file that cannot be decoded aborts the listing that reached it.
//! 5. Missing directories read as empty; missing files as `EntryDoesNotExist`.
//! 6. All other I/O errors are propagated, never silently ignored.

pub mod error;
pub mod filesystem;
pub mod storage;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use filesystem::FilesystemCollection;
pub use storage::{validate_collection_name, Storage};
pub use traits::Collection;
