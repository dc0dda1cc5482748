//! Use cases driving the consolidation pipeline.

pub mod consolidate_repositories;
pub mod discover_branches;
pub mod relocate_history;

pub use consolidate_repositories::{ConsolidateRepositoriesUseCase, ConsolidateSummary};
pub use discover_branches::BranchDiscoverer;
pub use relocate_history::HistoryRelocator;
