use crate::common::error::MergeError;

/// Result alias used throughout the crate.
pub type MergeResult<T> = Result<T, MergeError>;
