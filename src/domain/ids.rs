//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream dataset partition identifier
///
/// ANEEL publishes one datastore resource per calendar year; this wraps
/// its opaque identifier.
///
/// # Examples
///
/// ```
/// use powermap::domain::ids::ResourceId;
/// use std::str::FromStr;
///
/// let id = ResourceId::from_str("42d778de-4a10-4b54-a00a-87c8ff35db6f").unwrap();
/// assert_eq!(id.as_str(), "42d778de-4a10-4b54-a00a-87c8ff35db6f");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new ResourceId, rejecting blank values and embedded quotes
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Resource ID cannot be empty".to_string());
        }
        // Resource ids are quoted as SQL identifiers
        if id.contains('"') {
            return Err(format!("Resource ID cannot contain quotes: {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the resource ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
