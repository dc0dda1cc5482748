//! Domain entities.

pub mod merge_config;
pub mod project_state;

pub use merge_config::{MainProject, MergeConfiguration, ProjectSpec};
pub use project_state::{DiscoveredBranch, ProjectRuntimeState};
