use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Unique identifier of a stored entry.
///
/// An `EntryId` wraps a 128-bit UUID. The nil value (all zeros) means the
/// entry has not been assigned an identity yet; collections replace it with
/// a fresh random identifier on first persist. On the wire and on disk the
/// identifier is the canonical hyphenated lowercase string.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// The nil identifier. Represents "not yet assigned".
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// A fresh random (v4) identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns `true` if this is the nil identifier.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for EntryId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidId(format!("{s}: {e}")))
    }
}

impl From<Uuid> for EntryId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_is_default() {
        assert!(EntryId::nil().is_nil());
        assert_eq!(EntryId::default(), EntryId::nil());
    }

    #[test]
    fn random_ids_are_not_nil_and_distinct() {
        let a = EntryId::new_random();
        let b = EntryId::new_random();
        assert!(!a.is_nil());
        assert_ne!(a, b);
    }

    #[test]
    fn display_parse_roundtrip() {
        let id = EntryId::new_random();
        let parsed: EntryId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn display_is_hyphenated_lowercase() {
        let id: EntryId = "BE4346F2-0721-45D0-B52F-218714AAE7A8".parse().unwrap();
        assert_eq!(id.to_string(), "be4346f2-0721-45d0-b52f-218714aae7a8");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<EntryId>().unwrap_err();
        assert!(matches!(err, TypeError::InvalidId(_)));
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id: EntryId = "be4346f2-0721-45d0-b52f-218714aae7a8".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"be4346f2-0721-45d0-b52f-218714aae7a8\"");
        let back: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn debug_format() {
        let debug = format!("{:?}", EntryId::nil());
        assert_eq!(debug, "EntryId(00000000-0000-0000-0000-000000000000)");
    }
}
