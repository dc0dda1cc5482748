//! Filesystem concerns: configuration loading and the on-disk workspace.

pub mod config_store;
pub mod workspace;

pub use config_store::{ConfigStore, ConfigStoreError};
pub use workspace::{WorkspaceError, WorkspaceManager};
