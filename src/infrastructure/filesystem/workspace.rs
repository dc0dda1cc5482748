//! On-disk staging area for repository clones.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::infrastructure::vcs::gateway::{VcsError, VcsGateway};

/// Workspace preparation errors.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A stale directory could not be removed before cloning. Fatal: the
    /// staging area is in an unknown state and re-cloning into it would
    /// produce garbage.
    #[error("could not remove {path}: {source}")]
    CleanupFailed {
        /// Directory that resisted removal.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The clone itself failed. Recoverable through operator escalation.
    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Owns the staging area: one clone per project under a fixed root directory.
///
/// All clones are siblings under `root` (the invocation directory), so a
/// project workspace can reference the main workspace as `../<name>` and
/// vice versa.
pub struct WorkspaceManager {
    root: PathBuf,
    gateway: Arc<dyn VcsGateway>,
}

impl WorkspaceManager {
    /// Create a manager rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, gateway: Arc<dyn VcsGateway>) -> Self {
        Self {
            root: root.into(),
            gateway,
        }
    }

    /// Absolute path of a named workspace.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Guarantee a clean directory, then clone `repository` at `branch` into
    /// it. An existing directory from an earlier run is removed first.
    pub async fn prepare(
        &self,
        repository: &str,
        name: &str,
        branch: &str,
    ) -> Result<PathBuf, WorkspaceError> {
        let dir = self.path_of(name);

        if dir.exists() {
            tracing::debug!(directory = %dir.display(), "removing stale workspace");
            tokio::fs::remove_dir_all(&dir)
                .await
                .map_err(|source| WorkspaceError::CleanupFailed {
                    path: dir.clone(),
                    source,
                })?;
        }

        self.gateway
            .clone_repository(repository, &dir, branch)
            .await?;
        Ok(dir)
    }

    /// Remove a workspace whose content has been fully merged into the
    /// target. Failures are returned as gateway errors so the caller can
    /// escalate them.
    pub async fn cleanup(&self, name: &str) -> Result<(), VcsError> {
        let dir = self.path_of(name);
        tracing::debug!(directory = %dir.display(), "removing merged workspace");
        self.gateway.remove_directory(&dir).await
    }
}
