use docstore_types::EntryId;

use crate::filter::Filter;

/// Text encodings of the zero value of a known type: the nil identifier and
/// the zero RFC 3339 timestamp.
const ZERO_FORMS: [&str; 2] = ["00000000-0000-0000-0000-000000000000", "0001-01-01T00:00:00Z"];

/// Returns `true` if `text` is empty or the encoded zero value of a known type.
pub fn is_zero_form(text: &str) -> bool {
    text.is_empty() || ZERO_FORMS.contains(&text)
}

/// Constraint placed on a single filter field.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    /// Zero value of a known type: matches anything.
    Wildcard,
    /// Exact, case-sensitive text match.
    Text(String),
    /// Exact integer match.
    Integer(i64),
    /// Exact identifier match.
    Id(EntryId),
    /// Sub-record matched recursively against the candidate's sub-object.
    Nested(Filter),
    /// A field of a type the matcher has no rule for. Always passes.
    Unconstrained,
}

impl FilterValue {
    /// Text constraint; the empty string, the nil identifier and the zero
    /// timestamp are wildcards.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if is_zero_form(&value) {
            Self::Wildcard
        } else {
            Self::Text(value)
        }
    }

    /// Integer constraint; zero is a wildcard.
    pub fn integer(value: impl Into<i64>) -> Self {
        match value.into() {
            0 => Self::Wildcard,
            n => Self::Integer(n),
        }
    }

    /// Identifier constraint; the nil id is a wildcard.
    pub fn id(value: EntryId) -> Self {
        if value.is_nil() {
            Self::Wildcard
        } else {
            Self::Id(value)
        }
    }

    /// Returns `true` if this value places no constraint on a candidate.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Self::Wildcard | Self::Unconstrained => true,
            Self::Nested(filter) => filter.is_wildcard(),
            _ => false,
        }
    }
}
