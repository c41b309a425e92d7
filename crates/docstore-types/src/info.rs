use serde::{Deserialize, Serialize};

/// Summary of one collection, derived by scanning the storage root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    /// Route of the collection on the HTTP boundary, e.g. `/books/`.
    pub path: String,
    /// Number of entry files found; nothing is decoded to count them.
    pub entries: usize,
}

impl CollectionInfo {
    pub fn new(name: impl Into<String>, entries: usize) -> Self {
        let name = name.into();
        let path = format!("/{name}/");
        Self { name, path, entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_derived_from_name() {
        let info = CollectionInfo::new("books", 3);
        assert_eq!(info.path, "/books/");
        assert_eq!(info.entries, 3);
    }

    #[test]
    fn serializes_with_lowercase_keys() {
        let json = serde_json::to_value(CollectionInfo::new("authors", 1)).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "authors", "path": "/authors/", "entries": 1 }));
    }
}
