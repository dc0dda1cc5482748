//! Version-control gateway: the single doorway to the underlying VCS.

pub mod gateway;
pub mod git_cli;

pub use gateway::{VcsError, VcsGateway};
pub use git_cli::GitCliGateway;
