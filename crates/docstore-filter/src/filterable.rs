use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use docstore_types::UntypedEntry;

use crate::filter::Filter;

/// Describes a value's shape as a [`Filter`].
///
/// Typed entries implement this once, naming each field the way it
/// serializes and declaring its kind:
///
/// ```
/// use docstore_filter::{Filter, Filterable};
/// use docstore_types::EntryId;
///
/// struct Book {
///     id: EntryId,
///     title: String,
///     rating: i32,
/// }
///
/// impl Filterable for Book {
///     fn to_filter(&self) -> Filter {
///         Filter::new()
///             .id("ID", self.id)
///             .text("Title", &self.title)
///             .integer("Rating", self.rating)
///     }
/// }
/// ```
///
/// Map-shaped values (JSON objects, untyped entries, query parameters)
/// implement it by dispatching on each value's JSON type.
pub trait Filterable {
    fn to_filter(&self) -> Filter;
}

impl Filterable for Filter {
    fn to_filter(&self) -> Filter {
        self.clone()
    }
}

impl Filterable for Value {
    fn to_filter(&self) -> Filter {
        Filter::from_json(self)
    }
}

impl Filterable for Map<String, Value> {
    fn to_filter(&self) -> Filter {
        Filter::from_json_map(self)
    }
}

impl Filterable for UntypedEntry {
    fn to_filter(&self) -> Filter {
        Filter::from_json_map(self)
    }
}

impl Filterable for HashMap<String, String> {
    fn to_filter(&self) -> Filter {
        Filter::from_query_pairs(self.iter())
    }
}

impl Filterable for BTreeMap<String, String> {
    fn to_filter(&self) -> Filter {
        Filter::from_query_pairs(self.iter())
    }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn to_filter(&self) -> Filter {
        (**self).to_filter()
    }
}
