//! Branch discovery: find remote branches of a project that are not merged
//! into its main branch and anchor each one at its divergence point.

use std::path::Path;

use crate::application::escalation::{recover, FailureHandler};
use crate::common::error::MergeError;
use crate::common::result::MergeResult;
use crate::domain::entities::merge_config::ProjectSpec;
use crate::domain::entities::project_state::{DiscoveredBranch, ProjectRuntimeState};
use crate::infrastructure::vcs::gateway::VcsGateway;

/// Conventional prefix of remote-tracking branches; only branches under it
/// are preserved.
const REMOTE_PREFIX: &str = "origin/";

/// Enumerates a project's unmerged remote branches and records, per branch,
/// the commit it will be recreated at inside the target repository.
pub struct BranchDiscoverer<'a> {
    gateway: &'a dyn VcsGateway,
    handler: &'a dyn FailureHandler,
}

impl<'a> BranchDiscoverer<'a> {
    /// Create a discoverer over the given gateway and failure handler.
    pub fn new(gateway: &'a dyn VcsGateway, handler: &'a dyn FailureHandler) -> Self {
        Self { gateway, handler }
    }

    /// Discover unmerged branches of the project cloned at `project_dir`.
    ///
    /// Candidates matching the ignore pattern or not under `origin/` are
    /// skipped. Each kept branch is checked out locally under its short name
    /// and mapped to its divergence point relative to the project's
    /// reference branch. The repository is returned to its main branch
    /// before this returns. The target repository is never touched.
    pub async fn discover(
        &self,
        project_dir: &Path,
        project_name: &str,
        spec: &ProjectSpec,
    ) -> MergeResult<ProjectRuntimeState> {
        let candidates = recover(
            self.handler,
            project_dir,
            self.gateway
                .list_unmerged_remote_branches(project_dir, &spec.main_branch)
                .await,
        )
        .await?;

        let mut state = ProjectRuntimeState::new();
        for remote_branch in candidates {
            if spec.ignore_branches.matches(&remote_branch) {
                tracing::debug!(branch = %remote_branch, "ignored by pattern");
                continue;
            }
            let Some(local_branch) = remote_branch.strip_prefix(REMOTE_PREFIX) else {
                tracing::debug!(branch = %remote_branch, "not a remote-tracking branch, skipped");
                continue;
            };

            recover(
                self.handler,
                project_dir,
                self.gateway
                    .create_branch(project_dir, local_branch, Some(&remote_branch))
                    .await,
            )
            .await?;

            let divergence = recover(
                self.handler,
                project_dir,
                self.gateway
                    .first_divergent_commit(project_dir, local_branch, &spec.divergence_reference)
                    .await,
            )
            .await?;

            let divergence = divergence.ok_or_else(|| MergeError::BranchDivergenceNotFound {
                project: project_name.to_string(),
                branch: local_branch.to_string(),
                reference: spec.divergence_reference.clone(),
            })?;

            tracing::info!(
                branch = local_branch,
                anchor = %divergence,
                "preserving unmerged branch"
            );
            state.copy_branches.push(DiscoveredBranch {
                name: local_branch.to_string(),
                divergence,
            });
        }

        recover(
            self.handler,
            project_dir,
            self.gateway.checkout(project_dir, &spec.main_branch).await,
        )
        .await?;

        Ok(state)
    }
}
