use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a counter-entity whose cash flows are reported.
///
/// Entity names are case-insensitive for grouping: `"foo"` and `"Foo"` are
/// the same entity. The original spelling is kept for display while
/// [`EntityName::key`] gives the canonical uppercase form used for lookup
/// and ordering.
///
/// # Examples
///
/// ```
/// use settlement_report::core::entity::EntityName;
///
/// let a = EntityName::new("foo");
/// let b = EntityName::new("Foo");
/// assert_eq!(a.key(), b.key());
/// assert_eq!(a.as_str(), "foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as originally spelled.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical grouping key: the name in uppercase.
    pub fn key(&self) -> EntityKey {
        EntityKey(self.0.to_uppercase())
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for EntityName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Uppercase-normalized entity name, used as a map key and final tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}
