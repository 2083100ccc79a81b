//! Error types for the attribute engine.
//!
//! Every fallible operation in the crate returns a `StatError`. Nothing is
//! retried or swallowed; the caller decides whether a miss is fatal.

use thiserror::Error;

/// Which kind of named thing a lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Attribute,
    Resource,
    Modifier,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntryKind::Attribute => "attribute",
            EntryKind::Resource => "resource",
            EntryKind::Modifier => "modifier",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while reading or mutating attributes.
///
/// Adding a modifier or attribute under a name that already exists is an
/// overwrite, so there is no conflict variant.
///
/// # Examples
///
/// ```rust
/// use piecestat::{AttributeSet, StatError};
///
/// let set = AttributeSet::new();
/// let err = set.get("Health").unwrap_err();
/// assert!(err.is_not_found());
/// assert_eq!(err.to_string(), "attribute not found: Health");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatError {
    /// A named attribute, resource, or modifier does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntryKind, name: String },

    /// An argument violated the operation's contract, such as a negative
    /// amount passed to `Resource::take`.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A serialized record could not be turned back into a value.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl StatError {
    pub(crate) fn not_found(kind: EntryKind, name: impl Into<String>) -> Self {
        StatError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Returns true for lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatError::NotFound { .. })
    }

    /// Returns true for contract violations, including malformed records.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            StatError::InvalidArgument(_) | StatError::InvalidRecord(_)
        )
    }
}

impl From<serde_json::Error> for StatError {
    fn from(err: serde_json::Error) -> Self {
        StatError::InvalidRecord(err.to_string())
    }
}
