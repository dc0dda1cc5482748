//! The consolidation pipeline: clone the main repository, then fold each
//! source project into it in configuration-declared order.

use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::escalation::{recover, FailureHandler};
use crate::application::use_cases::discover_branches::BranchDiscoverer;
use crate::application::use_cases::relocate_history::HistoryRelocator;
use crate::common::error::MergeError;
use crate::common::result::MergeResult;
use crate::domain::entities::merge_config::{MergeConfiguration, ProjectSpec};
use crate::domain::entities::project_state::ProjectRuntimeState;
use crate::infrastructure::filesystem::workspace::{WorkspaceError, WorkspaceManager};
use crate::infrastructure::vcs::gateway::VcsGateway;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct ConsolidateSummary {
    /// Number of source projects folded into the target.
    pub merged_projects: usize,
    /// Branches created in the target repository, in creation order.
    pub created_branches: Vec<String>,
    /// Branch names that collided across projects and were reused.
    pub reused_branches: Vec<String>,
}

/// Drives the whole consolidation: strictly sequential, no backtracking
/// except operator-driven recovery.
///
/// Ordering is load-bearing: relocation precedes discovery (so discovered
/// branch history is already relocated), discovery precedes the merges (so
/// branch anchors exist), and a project's main branch is merged before its
/// side branches (the side branches' anchors assume the pre-merge shared
/// ancestry is present in the target).
pub struct ConsolidateRepositoriesUseCase {
    configuration: MergeConfiguration,
    gateway: Arc<dyn VcsGateway>,
    handler: Arc<dyn FailureHandler>,
    root: PathBuf,
}

impl ConsolidateRepositoriesUseCase {
    /// Create the use case. `root` is the directory all workspaces are
    /// created under (normally the invocation directory).
    pub fn new(
        configuration: MergeConfiguration,
        gateway: Arc<dyn VcsGateway>,
        handler: Arc<dyn FailureHandler>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            configuration,
            gateway,
            handler,
            root: root.into(),
        }
    }

    /// Run the pipeline to completion.
    pub async fn execute(&self) -> MergeResult<ConsolidateSummary> {
        let workspaces = WorkspaceManager::new(&self.root, Arc::clone(&self.gateway));
        let main = &self.configuration.main_project;

        println!("Creating a copy of the main repository...");
        let main_dir = self
            .prepare_workspace(&workspaces, &main.repository, &main.name, &main.main_branch)
            .await?;

        for (key, value) in &self.configuration.git_config {
            recover(
                self.handler.as_ref(),
                &main_dir,
                self.gateway.set_option(&main_dir, key, value).await,
            )
            .await?;
        }

        recover(
            self.handler.as_ref(),
            &main_dir,
            self.gateway
                .create_branch(&main_dir, &main.create_branch, None)
                .await,
        )
        .await?;

        let mut summary = ConsolidateSummary::default();
        let mut created_local_branches: Vec<String> = Vec::new();

        for (project_name, spec) in &self.configuration.projects {
            println!("Merging project '{project_name}'...");

            let project_dir = self
                .prepare_workspace(&workspaces, &spec.repository, project_name, &spec.main_branch)
                .await?;

            HistoryRelocator::new(self.gateway.as_ref(), self.handler.as_ref())
                .relocate(&project_dir, &spec.path)
                .await?;

            let state = BranchDiscoverer::new(self.gateway.as_ref(), self.handler.as_ref())
                .discover(&project_dir, project_name, spec)
                .await?;

            self.merge_project(
                &main_dir,
                project_name,
                spec,
                &state,
                &mut created_local_branches,
                &mut summary,
            )
            .await?;

            recover(
                self.handler.as_ref(),
                &self.root,
                workspaces.cleanup(project_name).await,
            )
            .await?;

            summary.merged_projects += 1;
        }

        summary.created_branches = created_local_branches;
        Ok(summary)
    }

    /// Prepare a workspace, splitting the two failure modes: an unremovable
    /// stale directory is fatal, a failed clone goes through escalation.
    async fn prepare_workspace(
        &self,
        workspaces: &WorkspaceManager,
        repository: &str,
        name: &str,
        branch: &str,
    ) -> MergeResult<PathBuf> {
        match workspaces.prepare(repository, name, branch).await {
            Ok(dir) => Ok(dir),
            Err(WorkspaceError::CleanupFailed { path, source }) => {
                Err(MergeError::WorkspaceCleanup { path, source })
            }
            Err(WorkspaceError::Vcs(error)) => {
                recover(self.handler.as_ref(), &self.root, Err::<(), _>(error)).await?;
                // Operator chose to resume; assume the clone now exists.
                Ok(workspaces.path_of(name))
            }
        }
    }

    /// Fold one relocated project into the main workspace: merge its main
    /// branch into the integration branch, then recreate and merge each
    /// preserved branch.
    async fn merge_project(
        &self,
        main_dir: &Path,
        project_name: &str,
        spec: &ProjectSpec,
        state: &ProjectRuntimeState,
        created_local_branches: &mut Vec<String>,
        summary: &mut ConsolidateSummary,
    ) -> MergeResult<()> {
        let handler = self.handler.as_ref();
        let create_branch = &self.configuration.main_project.create_branch;

        // The project workspace is a sibling of the main workspace.
        recover(
            handler,
            main_dir,
            self.gateway
                .add_remote(main_dir, project_name, &format!("../{project_name}"))
                .await,
        )
        .await?;

        recover(
            handler,
            main_dir,
            self.gateway
                .merge(main_dir, &format!("{project_name}/{}", spec.main_branch), true)
                .await,
        )
        .await?;

        for branch in &state.copy_branches {
            if !created_local_branches.contains(&branch.name) {
                recover(
                    handler,
                    main_dir,
                    self.gateway
                        .create_branch(main_dir, &branch.name, Some(branch.divergence.as_str()))
                        .await,
                )
                .await?;
                created_local_branches.push(branch.name.clone());
            } else {
                println!(
                    "{}",
                    format!("Warning: merging into existing local branch ({})!", branch.name)
                        .yellow()
                );
                tracing::warn!(branch = %branch.name, "branch name collision, reusing branch");
                summary.reused_branches.push(branch.name.clone());
                recover(
                    handler,
                    main_dir,
                    self.gateway.checkout(main_dir, &branch.name).await,
                )
                .await?;
            }

            recover(
                handler,
                main_dir,
                self.gateway
                    .merge(main_dir, &format!("{project_name}/{}", branch.name), true)
                    .await,
            )
            .await?;
        }

        // Back to the integration branch before the remote goes away.
        recover(
            handler,
            main_dir,
            self.gateway.checkout(main_dir, create_branch).await,
        )
        .await?;

        recover(
            handler,
            main_dir,
            self.gateway.remove_remote(main_dir, project_name).await,
        )
        .await?;

        Ok(())
    }
}
