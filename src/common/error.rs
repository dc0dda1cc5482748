//! Top-level error type for the consolidation run.

use std::path::PathBuf;
use thiserror::Error;

use crate::infrastructure::filesystem::config_store::ConfigStoreError;
use crate::infrastructure::vcs::gateway::VcsError;

/// Errors that terminate (or abort) a consolidation run.
///
/// VCS failures normally do not surface here directly: the orchestrator routes
/// them through the [`FailureHandler`](crate::application::escalation::FailureHandler)
/// first, and only an operator abort turns into [`MergeError::Aborted`].
#[derive(Debug, Error)]
pub enum MergeError {
    /// The configuration file is missing, malformed or incomplete.
    /// Fatal, reported before any repository is touched.
    #[error(transparent)]
    Config(#[from] ConfigStoreError),

    /// A stale workspace directory could not be removed before cloning.
    /// Fatal with no escalation: the on-disk state is unreliable.
    #[error("could not remove {path}: {source}")]
    WorkspaceCleanup {
        /// Directory that resisted removal.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Branch discovery found no commit shared between a branch and its
    /// reference branch, so the branch cannot be anchored in the target.
    #[error(
        "no divergence point found for branch '{branch}' of project '{project}' \
         (reference branch '{reference}')"
    )]
    BranchDivergenceNotFound {
        /// Project the branch belongs to.
        project: String,
        /// Local branch name.
        branch: String,
        /// Reference branch used for the first-parent comparison.
        reference: String,
    },

    /// The operator chose to abort after a failed VCS operation.
    #[error("aborted by operator")]
    Aborted,

    /// A VCS operation failed outside the escalation path.
    #[error(transparent)]
    Vcs(#[from] VcsError),
}

impl MergeError {
    /// Create a workspace-cleanup error.
    pub fn workspace_cleanup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WorkspaceCleanup {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divergence_error_names_branch_project_and_reference() {
        let error = MergeError::BranchDivergenceNotFound {
            project: "libA".to_string(),
            branch: "feature-x".to_string(),
            reference: "dev".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("feature-x"));
        assert!(text.contains("libA"));
        assert!(text.contains("dev"));
    }

    #[test]
    fn cleanup_error_names_the_directory() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = MergeError::workspace_cleanup("/tmp/stale", io);
        assert!(error.to_string().contains("/tmp/stale"));
    }
}
