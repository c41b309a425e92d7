//! Query-string form of a [`Filter`].
//!
//! Nested fields are flattened with dotted keys (`Publisher.Name=Bonniers`).
//! Wildcard and unconstrained fields are left out, so the zero-as-wildcard
//! rule survives the trip through a URL. Every value arrives on the other
//! side as text.

use serde_json::{Map, Value};

use crate::filter::Filter;
use crate::value::{is_zero_form, FilterValue};

const PATH_SEPARATOR: char = '.';

impl Filter {
    /// Flatten the constraining fields into `(key, value)` query pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        flatten_into(self, None, &mut pairs);
        pairs
    }

    /// Rebuild a filter from query pairs. Dotted keys become nested
    /// filters; when a key is both a leaf and a parent, the later pair wins.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut root = Map::new();
        for (key, value) in pairs {
            let path: Vec<&str> = key.as_ref().split(PATH_SEPARATOR).collect();
            insert_path(&mut root, &path, Value::String(value.as_ref().to_string()));
        }
        Filter::from_json_map(&root)
    }
}

fn flatten_into(filter: &Filter, prefix: Option<&str>, pairs: &mut Vec<(String, String)>) {
    for (name, value) in filter.fields() {
        let key = match prefix {
            Some(prefix) => format!("{prefix}{PATH_SEPARATOR}{name}"),
            None => name.to_string(),
        };
        match value {
            FilterValue::Wildcard | FilterValue::Unconstrained => {}
            FilterValue::Text(text) if is_zero_form(text) => {}
            FilterValue::Text(text) => pairs.push((key, text.clone())),
            FilterValue::Integer(n) => pairs.push((key, n.to_string())),
            FilterValue::Id(id) => pairs.push((key, id.to_string())),
            FilterValue::Nested(nested) => flatten_into(nested, Some(&key), pairs),
        }
    }
}

fn insert_path(map: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let child = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstore_types::EntryId;
    use serde_json::json;

    #[test]
    fn wildcards_are_omitted() {
        let filter = Filter::new()
            .text("Title", "")
            .integer("Rating", 0)
            .id("Author", EntryId::nil())
            .unconstrained("Published");
        assert!(filter.to_query_pairs().is_empty());
    }

    #[test]
    fn encoded_zero_values_are_omitted() {
        let filter = Filter::from_json(&json!({
            "Name": "Selma",
            "ID": "00000000-0000-0000-0000-000000000000",
            "Published": "0001-01-01T00:00:00Z",
        }));
        assert_eq!(filter.to_query_pairs(), vec![("Name".to_string(), "Selma".to_string())]);

        let built = Filter::new()
            .field("ID", FilterValue::Text(EntryId::nil().to_string()))
            .nested("Publisher", Filter::new().field("Founded", FilterValue::Text("0001-01-01T00:00:00Z".into())));
        assert!(built.to_query_pairs().is_empty());
    }

    #[test]
    fn constraints_are_flattened() {
        let author = EntryId::new_random();
        let filter = Filter::new()
            .text("Title", "B")
            .integer("Rating", 3)
            .id("Author", author)
            .nested("Publisher", Filter::new().text("Name", "Bonniers").text("City", ""));
        assert_eq!(
            filter.to_query_pairs(),
            vec![
                ("Title".to_string(), "B".to_string()),
                ("Rating".to_string(), "3".to_string()),
                ("Author".to_string(), author.to_string()),
                ("Publisher.Name".to_string(), "Bonniers".to_string()),
            ]
        );
    }

    #[test]
    fn dotted_keys_become_nested_filters() {
        let filter = Filter::from_query_pairs([("Publisher.Name", "Bonniers"), ("Title", "B")]);
        assert!(filter.matches(&json!({ "Title": "B", "Publisher": { "Name": "Bonniers" } })));
        assert!(!filter.matches(&json!({ "Title": "B", "Publisher": { "Name": "Norstedts" } })));
    }

    #[test]
    fn pairs_survive_the_wire() {
        let author = EntryId::new_random();
        let filter = Filter::new().id("Author", author).integer("Rating", 3);
        let rebuilt = Filter::from_query_pairs(filter.to_query_pairs());
        let candidate = json!({ "Author": author.to_string(), "Rating": 3 });
        assert!(filter.matches(&candidate));
        assert!(rebuilt.matches(&candidate));
        assert!(!rebuilt.matches(&json!({ "Author": author.to_string(), "Rating": 4 })));
    }

    #[test]
    fn later_leaf_replaces_parent() {
        let filter = Filter::from_query_pairs([("A.B", "1"), ("A", "x")]);
        assert!(filter.matches(&json!({ "A": "x" })));
    }

    #[test]
    fn later_parent_replaces_leaf() {
        let filter = Filter::from_query_pairs([("A", "x"), ("A.B", "1")]);
        assert!(filter.matches(&json!({ "A": { "B": 1 } })));
    }
}
