//! # repomerge - Git Repository Consolidation
//!
//! `repomerge` merges several independent git repositories into a single
//! target repository while preserving each source repository's commit
//! history, including its unmerged branches. It is meant for one-time
//! consolidation, e.g. combining component repositories into a monorepo.
//!
//! ## How it works
//!
//! Driven by a JSON configuration, the tool:
//!
//! 1. Clones the main project, applies the configured git options and
//!    creates a fresh integration branch.
//! 2. For each project to merge, in declared order: clones it, rewrites its
//!    whole history so every commit's tree lives under the configured
//!    subdirectory, discovers remote branches not merged into its main
//!    branch, then merges the project's main branch and each discovered
//!    branch into the target (allowing unrelated histories) before removing
//!    the project's workspace.
//!
//! Any git failure suspends the pipeline and drops the operator into an
//! emergency shell inside the failing repository; the run resumes or aborts
//! on their decision.
//!
//! ## Configuration
//!
//! ```json
//! {
//!     "gitConfig": {"user.name": "Consolidator"},
//!     "mainProject": {
//!         "name": "main",
//!         "repository": "git@example.com:main.git",
//!         "mainBranch": "master",
//!         "createBranch": "integration"
//!     },
//!     "projectsToMerge": {
//!         "libA": {
//!             "repository": "git@example.com:lib-a.git",
//!             "path": "libs/a",
//!             "mainBranch": "master",
//!             "ignoreBranches": "origin/(HEAD|master|dev)"
//!         }
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: run configuration and per-project runtime state
//! - [`application`]: the consolidation pipeline and failure escalation
//! - [`infrastructure`]: git subprocess gateway, filesystem, recovery shell
//! - [`presentation`]: CLI interface
//! - [`common`]: shared error handling

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::MergeError;
pub use crate::common::result::MergeResult as Result;
