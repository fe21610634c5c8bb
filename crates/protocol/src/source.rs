//! Source identification types
//!
//! `SourceId` names the logical origin of a submission - the identity
//! established by a credential check at the sink, distinct from any
//! network address.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical identity of a submitting component
///
/// # Example
///
/// ```
/// use baton_protocol::SourceId;
///
/// let source = SourceId::new("collector-b");
/// assert_eq!(source.as_str(), "collector-b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Create a new source ID
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the source ID as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
