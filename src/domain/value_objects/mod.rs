//! Small validated value types used across the domain.

pub mod commit_id;
pub mod ignore_pattern;

pub use commit_id::{CommitId, CommitIdError};
pub use ignore_pattern::{IgnorePattern, IgnorePatternError};
