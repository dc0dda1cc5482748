//! Infrastructure: VCS gateway, filesystem and process concerns.

pub mod filesystem;
pub mod process;
pub mod vcs;
