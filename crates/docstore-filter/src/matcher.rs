//! Field-by-field matching of a [`Filter`] against a JSON candidate.
//!
//! The walk is depth-first over the filter's fields and short-circuits on
//! the first field that fails. Candidate fields are looked up by name; a
//! candidate that is not an object has no fields at all.

use serde_json::{Map, Value};

use docstore_types::EntryId;

use crate::filter::Filter;
use crate::value::FilterValue;

/// Returns `true` if `candidate` passes every field of `filter`.
pub fn matches(filter: &Filter, candidate: &Value) -> bool {
    matches_object(filter, candidate.as_object())
}

fn matches_object(filter: &Filter, candidate: Option<&Map<String, Value>>) -> bool {
    if filter.rejects_all() {
        return false;
    }
    filter.fields().all(|(name, rule)| {
        let field = candidate.and_then(|object| object.get(name));
        field_passes(rule, field)
    })
}

/// Apply a single field rule. `candidate` is `None` when the field is absent.
pub fn field_passes(rule: &FilterValue, candidate: Option<&Value>) -> bool {
    match rule {
        FilterValue::Wildcard | FilterValue::Unconstrained => true,
        FilterValue::Text(expected) => match candidate {
            Some(Value::String(actual)) => actual == expected,
            // Query parameters arrive as text; compare against the literal.
            Some(literal @ (Value::Number(_) | Value::Bool(_))) => literal.to_string() == *expected,
            _ => false,
        },
        FilterValue::Integer(expected) => candidate.and_then(Value::as_i64) == Some(*expected),
        FilterValue::Id(expected) => candidate
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<EntryId>().ok())
            .is_some_and(|actual| actual == *expected),
        FilterValue::Nested(nested) => matches_object(nested, candidate.and_then(Value::as_object)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author_id() -> EntryId {
        "be4346f2-0721-45d0-b52f-218714aae7a8".parse().unwrap()
    }

    fn book() -> Value {
        json!({
            "ID": "0b9e1b0a-8f43-4b8a-9d5e-1c2f3a4b5c6d",
            "Title": "En herrgårdssägen",
            "ISBN": "9789174296150",
            "Author": "be4346f2-0721-45d0-b52f-218714aae7a8",
            "Rating": 3,
            "Published": "1899-01-01T00:00:00Z",
            "Publisher": { "Name": "Bonniers", "Founded": 1837 },
        })
    }

    #[test]
    fn text_is_exact_and_case_sensitive() {
        assert!(matches(&Filter::new().text("Title", "En herrgårdssägen"), &book()));
        assert!(!matches(&Filter::new().text("Title", "en herrgårdssägen"), &book()));
        assert!(!matches(&Filter::new().text("Title", "En herr"), &book()));
    }

    #[test]
    fn integer_is_exact() {
        assert!(matches(&Filter::new().integer("Rating", 3), &book()));
        assert!(!matches(&Filter::new().integer("Rating", 2), &book()));
    }

    #[test]
    fn integer_does_not_match_text_candidate() {
        assert!(!matches(&Filter::new().integer("ISBN", 9789174296150_i64), &book()));
    }

    #[test]
    fn text_matches_numeric_literal() {
        assert!(matches(&Filter::new().text("Rating", "3"), &book()));
        assert!(!matches(&Filter::new().text("Rating", "4"), &book()));
    }

    #[test]
    fn id_compares_parsed_identifiers() {
        assert!(matches(&Filter::new().id("Author", author_id()), &book()));
        assert!(!matches(&Filter::new().id("Author", EntryId::new_random()), &book()));

        let upper = json!({ "Author": "BE4346F2-0721-45D0-B52F-218714AAE7A8" });
        assert!(matches(&Filter::new().id("Author", author_id()), &upper));
    }

    #[test]
    fn id_does_not_match_garbage() {
        let candidate = json!({ "Author": "someone" });
        assert!(!matches(&Filter::new().id("Author", author_id()), &candidate));
    }

    #[test]
    fn zero_values_are_wildcards_not_constraints() {
        // A zero filter field cannot select entries whose field is zero/empty;
        // it simply does not constrain.
        let zeroed = json!({ "Title": "", "Rating": 0 });
        let filter = Filter::new().text("Title", "").integer("Rating", 0);
        assert!(matches(&filter, &book()));
        assert!(matches(&filter, &zeroed));
    }

    #[test]
    fn unconstrained_fields_always_pass() {
        let filter = Filter::new().unconstrained("Published").unconstrained("Missing");
        assert!(matches(&filter, &book()));
    }

    #[test]
    fn missing_field_fails_constrained_rules() {
        assert!(!matches(&Filter::new().text("Missing", "x"), &book()));
        assert!(!matches(&Filter::new().integer("Missing", 1), &book()));
        assert!(matches(&Filter::new().text("Missing", ""), &book()));
    }

    #[test]
    fn nested_filters_recurse() {
        let filter = Filter::new().nested("Publisher", Filter::new().text("Name", "Bonniers"));
        assert!(matches(&filter, &book()));

        let filter = Filter::new().nested(
            "Publisher",
            Filter::new().text("Name", "Bonniers").integer("Founded", 1900),
        );
        assert!(!matches(&filter, &book()));
    }

    #[test]
    fn nested_wildcard_passes_missing_sub_object() {
        let filter = Filter::new().nested("Series", Filter::new().text("Name", ""));
        assert!(matches(&filter, &book()));

        let filter = Filter::new().nested("Series", Filter::new().text("Name", "x"));
        assert!(!matches(&filter, &book()));
    }

    #[test]
    fn all_fields_must_pass() {
        let filter = Filter::new()
            .text("Title", "En herrgårdssägen")
            .id("Author", author_id())
            .integer("Rating", 2);
        assert!(!matches(&filter, &book()));
    }

    #[test]
    fn reject_all_never_matches() {
        assert!(!matches(&Filter::reject_all(), &book()));
        assert!(!matches(&Filter::reject_all(), &json!({})));
    }

    #[test]
    fn non_object_candidate_has_no_fields() {
        assert!(matches(&Filter::new(), &json!("scalar")));
        assert!(!matches(&Filter::new().text("Title", "x"), &json!("x")));
    }

    #[test]
    fn map_filter_against_struct_candidate() {
        #[derive(serde::Serialize)]
        struct Author {
            #[serde(rename = "Name")]
            name: String,
            #[serde(rename = "Born")]
            born: i64,
        }
        let author = Author { name: "Selma Lagerlöf".into(), born: 1858 };
        let filter = Filter::from_json(&json!({ "Name": "Selma Lagerlöf" }));
        assert!(filter.matches_entry(&author));
        let filter = Filter::from_json(&json!({ "Born": 1940 }));
        assert!(!filter.matches_entry(&author));
    }
}
