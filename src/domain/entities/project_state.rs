//! Per-project state produced at runtime by branch discovery.

use crate::domain::value_objects::CommitId;

/// A preserved branch discovered in a source project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredBranch {
    /// Local branch name (remote name with the `origin/` prefix stripped).
    pub name: String,
    /// The branch's anchor commit: the most recent commit shared by the
    /// branch's first-parent history and the reference branch's first-parent
    /// history. The branch is recreated at this commit in the target.
    pub divergence: CommitId,
}

/// Runtime state produced by branch discovery for a single project.
///
/// Threaded explicitly from the discoverer into the merge step; the run
/// configuration itself is never mutated.
#[derive(Debug, Clone, Default)]
pub struct ProjectRuntimeState {
    /// Discovered branches in discovery order.
    pub copy_branches: Vec<DiscoveredBranch>,
}

impl ProjectRuntimeState {
    /// Empty state (no branches to preserve).
    pub fn new() -> Self {
        Self::default()
    }
}
