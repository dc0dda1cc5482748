//! Interactive operator recovery: an emergency shell in the failing
//! repository, followed by a continue/abort prompt.

use async_trait::async_trait;
use colored::Colorize;
use console::Term;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::application::escalation::{FailureHandler, RecoveryDecision};
use crate::infrastructure::vcs::gateway::VcsError;

/// Failure handler that spawns a login shell with inherited stdio inside the
/// failing repository so the operator can inspect and fix its state, then
/// asks whether to continue.
pub struct EmergencyShellHandler {
    shell: String,
}

impl Default for EmergencyShellHandler {
    fn default() -> Self {
        Self {
            shell: std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string()),
        }
    }
}

impl EmergencyShellHandler {
    /// Handler using `$SHELL` (falling back to `/bin/sh`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler using a specific shell executable.
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    async fn run_shell(&self, working_dir: &Path) -> std::io::Result<()> {
        Command::new(&self.shell)
            .arg("-l")
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        Ok(())
    }

    fn prompt_decision(&self) -> RecoveryDecision {
        let term = Term::stdout();
        loop {
            if term.write_str("Continue (y/n)? ").is_err() {
                return RecoveryDecision::Abort;
            }
            let answer = match term.read_line() {
                Ok(line) => line.trim().to_lowercase(),
                Err(_) => return RecoveryDecision::Abort,
            };
            match answer.as_str() {
                "y" => return RecoveryDecision::Resume,
                "n" => return RecoveryDecision::Abort,
                _ => continue,
            }
        }
    }
}

#[async_trait]
impl FailureHandler for EmergencyShellHandler {
    async fn on_failure(&self, error: &VcsError, working_dir: &Path) -> RecoveryDecision {
        eprintln!("{}", error.to_string().red());
        println!("Something went wrong. Bringing the emergency shell to correct errors manually...");
        println!("===========================================\n");

        if let Err(e) = self.run_shell(working_dir).await {
            eprintln!(
                "{}",
                format!("could not start recovery shell '{}': {e}", self.shell).red()
            );
            return RecoveryDecision::Abort;
        }

        println!("\n===========================================\n");
        println!("Emergency shell finished.");
        self.prompt_decision()
    }
}
