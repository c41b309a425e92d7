//! Structural filter matching for docstore.
//!
//! A [`Filter`] is a partially-populated description of an entry: every
//! field whose value is non-zero constrains the match, every zero field is a
//! wildcard. Filters are built once per entry shape through the
//! [`Filterable`] trait and then matched against candidates in their JSON
//! form, so struct-shaped and map-shaped filters and candidates mix freely.
//!
//! # Field rules
//!
//! | [`FilterValue`] | passes when |
//! |---|---|
//! | `Wildcard` | always (built from `""`, `0`, the nil id, or its text form and the zero timestamp) |
//! | `Text` | candidate string is exactly equal |
//! | `Integer` | candidate is the same integer |
//! | `Id` | candidate string parses to the same [`EntryId`](docstore_types::EntryId) |
//! | `Nested` | the nested filter matches the candidate sub-object |
//! | `Unconstrained` | always (fields of any other type) |
//!
//! Because zero values double as wildcards, a filter cannot ask for
//! "integer field equals 0" or "text field is empty".

pub mod filter;
pub mod filterable;
pub mod matcher;
pub mod query;
pub mod value;

pub use filter::Filter;
pub use filterable::Filterable;
pub use value::FilterValue;
