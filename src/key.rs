//! Case-insensitive keys for attribute and resource sets.
//!
//! Provides the `StatKey` type. A key is the lower-cased form of a name and
//! uses `Arc<str>` so clones are cheap when the same key is handed out
//! repeatedly (tick reports, iteration).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Normalized (lower-cased) name of an entry in a set.
///
/// Two names that differ only in letter case produce equal keys.
///
/// # Examples
///
/// ```rust
/// use piecestat::StatKey;
///
/// let a = StatKey::new("Max_Health");
/// let b: StatKey = "MAX_HEALTH".into();
///
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "max_health");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatKey(Arc<str>);

impl Serialize for StatKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(StatKey::new(&s))
    }
}

impl StatKey {
    /// Create a key from any name, normalizing its case.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name.to_lowercase()))
    }

    /// Get the normalized string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StatKey {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl AsRef<str> for StatKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
