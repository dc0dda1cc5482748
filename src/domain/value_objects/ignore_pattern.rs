//! Branch ignore patterns from the configuration.

use regex::Regex;
use thiserror::Error;

/// Errors compiling an ignore-branch pattern.
#[derive(Debug, Error)]
pub enum IgnorePatternError {
    /// The configured pattern is not a valid regular expression.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The rejected pattern source.
        pattern: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// Compiled ignore-branch pattern for one project.
///
/// An empty source string means "no filter": no branch is ever ignored.
/// A non-empty pattern is matched from the start of the remote branch name
/// (e.g. `origin/(HEAD|master|dev)`).
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    regex: Option<Regex>,
}

impl IgnorePattern {
    /// Compile a pattern from its configuration source.
    pub fn compile(source: &str) -> Result<Self, IgnorePatternError> {
        if source.is_empty() {
            return Ok(Self { regex: None });
        }
        // Anchored at the start of the branch name.
        let regex =
            Regex::new(&format!("^(?:{source})")).map_err(|e| IgnorePatternError::InvalidPattern {
                pattern: source.to_string(),
                source: e,
            })?;
        Ok(Self { regex: Some(regex) })
    }

    /// An always-empty pattern.
    pub fn none() -> Self {
        Self { regex: None }
    }

    /// Whether the pattern filters anything at all.
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Whether the given remote branch name should be ignored.
    pub fn matches(&self, branch: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(branch))
    }
}
