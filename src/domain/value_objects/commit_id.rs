//! Validated commit identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation errors for [`CommitId`].
#[derive(Debug, Error)]
pub enum CommitIdError {
    /// The identifier is empty or contains non-hexadecimal characters.
    #[error("invalid commit identifier: '{value}'")]
    Invalid {
        /// The rejected input.
        value: String,
    },
}

/// A git commit identifier (full or abbreviated hexadecimal hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitId(String);

impl CommitId {
    /// Validate and wrap a commit identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, CommitIdError> {
        let value = value.into();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CommitIdError::Invalid { value });
        }
        Ok(Self(value))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_and_abbreviated_hashes() {
        assert!(CommitId::new("a94a8fe5ccb19ba61c4c0873d391e987982fbbd3").is_ok());
        assert!(CommitId::new("a94a8fe").is_ok());
    }

    #[test]
    fn rejects_empty_and_non_hex() {
        assert!(CommitId::new("").is_err());
        assert!(CommitId::new("not-a-hash").is_err());
        assert!(CommitId::new("origin/HEAD -> origin/master").is_err());
    }
}
