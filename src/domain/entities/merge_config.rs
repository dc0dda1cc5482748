//! The validated run configuration.

use crate::domain::value_objects::IgnorePattern;

/// Reference branch used for divergence computation when the configuration
/// does not override it. Inherited from the integration-branch convention of
/// the repositories this tool was written for.
pub const DEFAULT_DIVERGENCE_REFERENCE: &str = "dev";

/// The repository that becomes the final consolidated repository.
#[derive(Debug, Clone)]
pub struct MainProject {
    /// Workspace directory name for the main clone.
    pub name: String,
    /// Repository location passed verbatim to `git clone`.
    pub repository: String,
    /// Branch the clone is checked out at.
    pub main_branch: String,
    /// Integration branch created in the clone; receives all merges.
    pub create_branch: String,
}

/// One source repository to fold into the main project.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    /// Repository location passed verbatim to `git clone`.
    pub repository: String,
    /// Subdirectory of the target repository the project's history is moved
    /// under (relative, slash-separated, e.g. `libs/a`).
    pub path: String,
    /// The project's main branch.
    pub main_branch: String,
    /// Remote branches matching this pattern are not preserved.
    pub ignore_branches: IgnorePattern,
    /// Reference branch for the first-parent divergence computation.
    pub divergence_reference: String,
}

/// Fully validated, immutable run configuration.
///
/// Both `git_config` and `projects` keep the order in which they were declared
/// in the configuration file; later projects merge on top of earlier ones and
/// conflicts are resolved in that order.
#[derive(Debug, Clone)]
pub struct MergeConfiguration {
    /// Repository-level git options applied to the main clone, in order.
    pub git_config: Vec<(String, String)>,
    /// The target repository.
    pub main_project: MainProject,
    /// Source projects in configuration-declared order.
    pub projects: Vec<(String, ProjectSpec)>,
}
