//! The abstract VCS gateway trait and its error type.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::value_objects::CommitId;

/// Errors from VCS gateway operations.
///
/// Every variant is recoverable through operator escalation; none is retried
/// automatically.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The underlying command exited with a non-zero status.
    #[error("command failed: {command} (exit code {exit_code}): {stderr}")]
    CommandFailed {
        /// The full command line that was run.
        command: String,
        /// Process exit code (-1 when terminated by signal).
        exit_code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// The VCS executable could not be started.
    #[error("VCS executable not found: {executable}")]
    ExecutableNotFound {
        /// Executable name or path.
        executable: String,
    },

    /// A directory handed to the gateway could not be removed.
    #[error("failed to remove directory {path}: {source}")]
    RemoveFailed {
        /// Directory that resisted removal.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A path argument was not representable for the subprocess.
    #[error("invalid path: {path}")]
    InvalidPath {
        /// Offending path, lossily rendered.
        path: String,
    },

    /// Spawning or waiting on the subprocess failed.
    #[error("IO error: {source}")]
    Io {
        /// Underlying IO error.
        #[from]
        source: std::io::Error,
    },

    /// The command succeeded but produced output the gateway cannot use.
    #[error("unexpected VCS output: {message}")]
    UnexpectedOutput {
        /// Description of what was wrong.
        message: String,
    },
}

/// Abstract contract with the underlying version-control engine.
///
/// Each operation is a typed call with an explicit repository path; there is
/// no ambient working-directory state and no shell string interpolation at
/// this boundary. All operations block until the engine finishes.
#[async_trait]
pub trait VcsGateway: Send + Sync {
    /// Clone `repository` at `branch` into `dest`.
    async fn clone_repository(
        &self,
        repository: &str,
        dest: &Path,
        branch: &str,
    ) -> Result<(), VcsError>;

    /// Persist a repository-level configuration option.
    async fn set_option(&self, repo: &Path, key: &str, value: &str) -> Result<(), VcsError>;

    /// Create and check out a new branch, optionally rooted at `base`.
    async fn create_branch(
        &self,
        repo: &Path,
        name: &str,
        base: Option<&str>,
    ) -> Result<(), VcsError>;

    /// Check out an existing ref.
    async fn checkout(&self, repo: &Path, refname: &str) -> Result<(), VcsError>;

    /// List remote branches that are not ancestors of `reference`, in the
    /// engine's listing order. Symbolic entries (`origin/HEAD -> …`) are
    /// excluded.
    async fn list_unmerged_remote_branches(
        &self,
        repo: &Path,
        reference: &str,
    ) -> Result<Vec<String>, VcsError>;

    /// Rewrite every commit reachable from every ref so the repository's
    /// whole content lives under `target_path`. Authorship, timestamps and
    /// parent linkage are preserved.
    async fn relocate_history(&self, repo: &Path, target_path: &str) -> Result<(), VcsError>;

    /// The most recent commit shared by the first-parent histories of
    /// `branch` and `reference` — the point where the branch diverged.
    /// `None` when the two histories have no commit in common.
    async fn first_divergent_commit(
        &self,
        repo: &Path,
        branch: &str,
        reference: &str,
    ) -> Result<Option<CommitId>, VcsError>;

    /// Register a remote and fetch it.
    async fn add_remote(&self, repo: &Path, name: &str, location: &str) -> Result<(), VcsError>;

    /// Unregister a remote.
    async fn remove_remote(&self, repo: &Path, name: &str) -> Result<(), VcsError>;

    /// Merge `refname` into the currently checked-out branch. A merge commit
    /// is always created; `allow_unrelated` permits merging histories with no
    /// common ancestor.
    async fn merge(&self, repo: &Path, refname: &str, allow_unrelated: bool)
        -> Result<(), VcsError>;

    /// Remove a directory tree. Part of the gateway so removal failures flow
    /// through the same escalation path as other VCS failures.
    async fn remove_directory(&self, path: &Path) -> Result<(), VcsError>;
}
