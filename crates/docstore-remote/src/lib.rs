//! HTTP client backend for docstore.
//!
//! [`RemoteCollection`] implements [`docstore_store::Collection`] by turning
//! each operation into one request against a peer running `docstore-server`:
//!
//! - `persist` -> `POST /{collection}`, reading back `{"ID": ...}`
//! - `delete` -> `DELETE /{collection}/{id}`
//! - `load` -> `GET /{collection}/{id}`
//! - `load_all` -> `GET /{collection}?limit=N`
//! - `query` -> `GET /{collection}?limit=N&Field=value...`
//!
//! Requests are blocking, like the filesystem backend, so callers in async
//! code should run them on a blocking thread.

pub mod collection;

pub use collection::RemoteCollection;
