//! History relocation: move a project's entire history under its target
//! subdirectory before anything is merged.

use std::path::Path;

use crate::application::escalation::{recover, FailureHandler};
use crate::common::result::MergeResult;
use crate::infrastructure::vcs::gateway::VcsGateway;

/// Rewrites every commit of a project so its tree lives under the project's
/// configured path. Runs across all refs, so branches discovered afterwards
/// are already relocated.
pub struct HistoryRelocator<'a> {
    gateway: &'a dyn VcsGateway,
    handler: &'a dyn FailureHandler,
}

impl<'a> HistoryRelocator<'a> {
    /// Create a relocator over the given gateway and failure handler.
    pub fn new(gateway: &'a dyn VcsGateway, handler: &'a dyn FailureHandler) -> Self {
        Self { gateway, handler }
    }

    /// Relocate the repository at `project_dir` under `target_path`.
    ///
    /// A failure here leaves the repository partially rewritten and
    /// non-resumable; the operator's realistic choices in the recovery
    /// session are a manual re-run of the rewrite or an abort.
    pub async fn relocate(&self, project_dir: &Path, target_path: &str) -> MergeResult<()> {
        tracing::info!(
            directory = %project_dir.display(),
            target = target_path,
            "rewriting history under target path"
        );
        recover(
            self.handler,
            project_dir,
            self.gateway.relocate_history(project_dir, target_path).await,
        )
        .await
    }
}
