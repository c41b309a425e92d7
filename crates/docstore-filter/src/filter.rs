use serde::Serialize;
use serde_json::{Map, Value};

use docstore_types::EntryId;

use crate::matcher;
use crate::value::FilterValue;

/// A sparse, ordered description of the entries a query should return.
///
/// Field names are the names the candidate serializes with (for typed
/// entries, after any `#[serde(rename)]`). Build one with the chained
/// constructors or from JSON:
///
/// ```
/// use docstore_filter::Filter;
///
/// let filter = Filter::new().text("Title", "Gösta Berlings saga").integer("Rating", 0);
/// assert!(filter.matches(&serde_json::json!({ "Title": "Gösta Berlings saga", "Rating": 2 })));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    fields: Vec<(String, FilterValue)>,
    reject_all: bool,
}

impl Filter {
    /// An empty filter. Matches every entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter that matches nothing. Produced for scalar (non-record) filters.
    pub fn reject_all() -> Self {
        Self {
            fields: Vec::new(),
            reject_all: true,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: FilterValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(name, FilterValue::text(value))
    }

    pub fn integer(self, name: impl Into<String>, value: impl Into<i64>) -> Self {
        self.field(name, FilterValue::integer(value))
    }

    pub fn id(self, name: impl Into<String>, value: EntryId) -> Self {
        self.field(name, FilterValue::id(value))
    }

    pub fn nested(self, name: impl Into<String>, filter: Filter) -> Self {
        self.field(name, FilterValue::Nested(filter))
    }

    /// Declare a field the matcher does not constrain (timestamps, floats,
    /// lists, ...).
    pub fn unconstrained(self, name: impl Into<String>) -> Self {
        self.field(name, FilterValue::Unconstrained)
    }

    /// Build a filter from a JSON value.
    ///
    /// Objects become record filters; any other top-level value yields
    /// [`Filter::reject_all`].
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_json_map(map),
            _ => Self::reject_all(),
        }
    }

    /// Build a record filter from a JSON object. Strings become text
    /// constraints, integral numbers integer constraints, objects nested
    /// filters; everything else is unconstrained.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let fields = map
            .iter()
            .map(|(key, value)| (key.clone(), json_field(value)))
            .collect();
        Self {
            fields,
            reject_all: false,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn rejects_all(&self) -> bool {
        self.reject_all
    }

    /// Returns `true` if no field constrains a candidate.
    pub fn is_wildcard(&self) -> bool {
        !self.reject_all && self.fields.iter().all(|(_, v)| v.is_unconstrained())
    }

    /// Match a candidate in its JSON form.
    pub fn matches(&self, candidate: &Value) -> bool {
        matcher::matches(self, candidate)
    }

    /// Match any serializable candidate. Candidates that fail to serialize
    /// do not match.
    pub fn matches_entry<T: Serialize + ?Sized>(&self, candidate: &T) -> bool {
        serde_json::to_value(candidate)
            .map(|value| self.matches(&value))
            .unwrap_or(false)
    }
}

fn json_field(value: &Value) -> FilterValue {
    match value {
        Value::String(s) => FilterValue::text(s.as_str()),
        Value::Number(n) => n
            .as_i64()
            .map(FilterValue::integer)
            .unwrap_or(FilterValue::Unconstrained),
        Value::Object(map) => FilterValue::Nested(Filter::from_json_map(map)),
        _ => FilterValue::Unconstrained,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_keeps_field_order() {
        let filter = Filter::new().text("B", "x").integer("A", 1);
        let names: Vec<&str> = filter.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn from_json_dispatches_on_type() {
        let filter = Filter::from_json(&json!({
            "Title": "B",
            "Rating": 3,
            "Score": 1.5,
            "Done": true,
            "Tags": ["a"],
            "Address": { "City": "Sunne" },
        }));
        let get = |name: &str| filter.fields().find(|(n, _)| *n == name).map(|(_, v)| v.clone());
        assert_eq!(get("Title"), Some(FilterValue::Text("B".into())));
        assert_eq!(get("Rating"), Some(FilterValue::Integer(3)));
        assert_eq!(get("Score"), Some(FilterValue::Unconstrained));
        assert_eq!(get("Done"), Some(FilterValue::Unconstrained));
        assert_eq!(get("Tags"), Some(FilterValue::Unconstrained));
        assert_eq!(
            get("Address"),
            Some(FilterValue::Nested(Filter::new().text("City", "Sunne")))
        );
    }

    #[test]
    fn from_json_zero_values_are_wildcards() {
        let filter = Filter::from_json(&json!({ "Title": "", "Rating": 0 }));
        assert!(filter.is_wildcard());
    }

    #[test]
    fn from_json_encoded_zero_values_are_wildcards() {
        let filter = Filter::from_json(&json!({
            "ID": "00000000-0000-0000-0000-000000000000",
            "Published": "0001-01-01T00:00:00Z",
        }));
        let values: Vec<&FilterValue> = filter.fields().map(|(_, v)| v).collect();
        assert_eq!(values, vec![&FilterValue::Wildcard, &FilterValue::Wildcard]);
        assert!(filter.is_wildcard());
    }

    #[test]
    fn scalar_json_rejects_all() {
        for value in [json!("Title"), json!(3), json!(null), json!([1, 2])] {
            let filter = Filter::from_json(&value);
            assert!(filter.rejects_all());
            assert!(!filter.is_wildcard());
        }
    }

    #[test]
    fn empty_filter_is_wildcard() {
        assert!(Filter::new().is_wildcard());
        assert!(Filter::new().is_empty());
    }

    #[test]
    fn matches_entry_serializes_candidate() {
        #[derive(Serialize)]
        struct Book {
            #[serde(rename = "Title")]
            title: String,
        }
        let book = Book { title: "B".into() };
        assert!(Filter::new().text("Title", "B").matches_entry(&book));
        assert!(!Filter::new().text("Title", "C").matches_entry(&book));
    }
}
