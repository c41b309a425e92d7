//! Foundation types for docstore.
//!
//! Every other docstore crate depends on `docstore-types`. It defines what an
//! entry is: a JSON document that can report and accept a single unique
//! identifier.
//!
//! # Key Types
//!
//! - [`EntryId`]: 128-bit random identifier; the nil value means "unassigned"
//! - [`Entry`]: identity contract implemented by typed and untyped entries
//! - [`UntypedEntry`]: schema-less document with its identifier under `"ID"`
//! - [`CollectionInfo`]: read-only summary of one collection

pub mod entry;
pub mod error;
pub mod id;
pub mod info;

pub use entry::{Entry, UntypedEntry, ID_KEY};
pub use error::TypeError;
pub use id::EntryId;
pub use info::CollectionInfo;
