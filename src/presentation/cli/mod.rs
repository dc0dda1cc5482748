//! Command-line entry point.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use crate::application::escalation::{AbortingHandler, FailureHandler};
use crate::application::use_cases::consolidate_repositories::{
    ConsolidateRepositoriesUseCase, ConsolidateSummary,
};
use crate::common::error::MergeError;
use crate::infrastructure::filesystem::config_store::ConfigStore;
use crate::infrastructure::process::emergency_shell::EmergencyShellHandler;
use crate::infrastructure::vcs::git_cli::GitCliGateway;

/// Version string including build metadata from `build.rs`.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", ",
    env!("BUILD_DATE"),
    ")"
);

/// repomerge - merge several git repositories into one, preserving history
#[derive(Parser)]
#[command(name = "repomerge")]
#[command(about = "Merges one or more git projects into a base project preserving history")]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Configuration file
    pub configuration_file: PathBuf,

    /// Show each git command as it is executed
    #[arg(short, long)]
    pub verbose: bool,
}

/// Default tracing directives used when `RUST_LOG` is not set; `-v` raises
/// the crate's level to debug.
pub fn default_log_directives(verbose: bool) -> &'static str {
    if verbose {
        "repomerge=debug"
    } else {
        "repomerge=warn"
    }
}

/// The CLI application.
pub struct CliApp;

impl CliApp {
    /// Create the application.
    pub fn new() -> Self {
        Self
    }

    /// Run with already-parsed arguments; never returns on failure (exits 1).
    pub async fn run(&self, cli: Cli) -> Result<()> {
        match self.execute(cli).await {
            Ok(summary) => {
                self.print_summary(&summary);
                Ok(())
            }
            Err(error) => {
                eprintln!("{}", format!("Error: {error}").red());
                exit(1);
            }
        }
    }

    async fn execute(&self, cli: Cli) -> Result<ConsolidateSummary, MergeError> {
        let configuration = ConfigStore::load(&cli.configuration_file).await?;

        let gateway = Arc::new(GitCliGateway::new().echo_commands(cli.verbose));
        let handler = self.failure_handler();
        let root = std::env::current_dir().map_err(|e| MergeError::workspace_cleanup(".", e))?;

        ConsolidateRepositoriesUseCase::new(configuration, gateway, handler, root)
            .execute()
            .await
    }

    /// Interactive recovery needs a terminal; without one an emergency shell
    /// would hang forever, so failures abort instead.
    fn failure_handler(&self) -> Arc<dyn FailureHandler> {
        if console::user_attended() {
            Arc::new(EmergencyShellHandler::new())
        } else {
            Arc::new(AbortingHandler)
        }
    }

    fn print_summary(&self, summary: &ConsolidateSummary) {
        println!(
            "{}",
            format!(
                "Done: {} project(s) merged, {} branch(es) preserved.",
                summary.merged_projects,
                summary.created_branches.len()
            )
            .green()
        );
        if !summary.reused_branches.is_empty() {
            println!(
                "{}",
                format!(
                    "Reused branch name(s) across projects: {}",
                    summary.reused_branches.join(", ")
                )
                .yellow()
            );
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn configuration_file_is_required() {
        let result = Cli::try_parse_from(["repomerge"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_flag_is_parsed() {
        let cli = Cli::try_parse_from(["repomerge", "config.json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.configuration_file, PathBuf::from("config.json"));
    }

    #[test]
    fn verbose_raises_the_default_log_level_to_debug() {
        assert_eq!(default_log_directives(true), "repomerge=debug");
        assert_eq!(default_log_directives(false), "repomerge=warn");
    }
}
