//! Git subprocess implementation of the VCS gateway.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::gateway::{VcsError, VcsGateway};
use crate::domain::value_objects::CommitId;

/// Git implementation of the VCS gateway, backed by the `git` executable.
///
/// Every operation runs a subprocess with an explicit working directory and
/// captured output; nothing is interpolated through a shell except the
/// `filter-branch` tree filter, which git itself evaluates with `sh`.
pub struct GitCliGateway {
    git_executable: String,
    echo_commands: bool,
}

impl Default for GitCliGateway {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
            echo_commands: false,
        }
    }
}

impl GitCliGateway {
    /// Create a gateway using `git` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway with a custom git executable path.
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
            echo_commands: false,
        }
    }

    /// Echo every git command line to stdout before running it.
    pub fn echo_commands(mut self, echo: bool) -> Self {
        self.echo_commands = echo;
        self
    }

    /// Execute a git command in the given directory.
    async fn execute_git_command(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<std::process::Output, VcsError> {
        let command_line = format!("{} {}", self.git_executable, args.join(" "));
        if self.echo_commands {
            println!("Executing: {command_line}");
        }
        tracing::debug!(command = %command_line, "running git");

        let mut cmd = Command::new(&self.git_executable);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Merge commit messages are taken as-is; never open an editor.
            .env("GIT_MERGE_AUTOEDIT", "no")
            .env("FILTER_BRANCH_SQUELCH_WARNING", "1");

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VcsError::ExecutableNotFound {
                    executable: self.git_executable.clone(),
                }
            } else {
                VcsError::from(e)
            }
        })?;
        Ok(output)
    }

    /// Execute a git command and fail on non-zero exit status.
    async fn execute_git_command_checked(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, VcsError> {
        let output = self.execute_git_command(args, working_dir).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let command = format!("{} {}", self.git_executable, args.join(" "));
            return Err(VcsError::CommandFailed {
                command,
                exit_code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim_end().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Shell-quote a single word for the `filter-branch` tree filter.
fn sh_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Build the tree filter that moves every top-level entry except the VCS
/// metadata directory and the first segment of `target_path` into
/// `target_path`. Excluding the first segment keeps the target from being
/// moved into itself when the rewrite is rerun.
fn tree_filter_script(target_path: &str) -> String {
    let first_segment = target_path.split('/').next().unwrap_or(target_path);
    format!(
        "mkdir -p {path} && find . -mindepth 1 -maxdepth 1 \
         ! -name .git ! -name {first} -exec mv {{}} {path}/ \\;",
        path = sh_quote(target_path),
        first = sh_quote(first_segment),
    )
}

/// Parse `git branch -r` output into clean remote branch names, dropping
/// symbolic entries such as `origin/HEAD -> origin/master`.
fn parse_remote_branches(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains(" -> "))
        .map(str::to_string)
        .collect()
}

/// The most recent commit present in both rev-lists. Both inputs are ordered
/// newest first, so the first hit in `branch` is the fork point.
fn fork_point<'a>(branch: &'a [String], reference: &[String]) -> Option<&'a str> {
    let known: HashSet<&str> = reference.iter().map(String::as_str).collect();
    branch
        .iter()
        .map(String::as_str)
        .find(|commit| known.contains(commit))
}

#[async_trait]
impl VcsGateway for GitCliGateway {
    async fn clone_repository(
        &self,
        repository: &str,
        dest: &Path,
        branch: &str,
    ) -> Result<(), VcsError> {
        let dest = dest.to_str().ok_or_else(|| VcsError::InvalidPath {
            path: dest.display().to_string(),
        })?;
        self.execute_git_command_checked(&["clone", repository, dest, "-b", branch], None)
            .await?;
        Ok(())
    }

    async fn set_option(&self, repo: &Path, key: &str, value: &str) -> Result<(), VcsError> {
        self.execute_git_command_checked(&["config", key, value], Some(repo))
            .await?;
        Ok(())
    }

    async fn create_branch(
        &self,
        repo: &Path,
        name: &str,
        base: Option<&str>,
    ) -> Result<(), VcsError> {
        let mut args = vec!["checkout", "-b", name];
        if let Some(base) = base {
            args.push(base);
        }
        self.execute_git_command_checked(&args, Some(repo)).await?;
        Ok(())
    }

    async fn checkout(&self, repo: &Path, refname: &str) -> Result<(), VcsError> {
        self.execute_git_command_checked(&["checkout", refname], Some(repo))
            .await?;
        Ok(())
    }

    async fn list_unmerged_remote_branches(
        &self,
        repo: &Path,
        reference: &str,
    ) -> Result<Vec<String>, VcsError> {
        let output = self
            .execute_git_command_checked(&["branch", "-r", "--no-merged", reference], Some(repo))
            .await?;
        Ok(parse_remote_branches(&output))
    }

    async fn relocate_history(&self, repo: &Path, target_path: &str) -> Result<(), VcsError> {
        let filter = tree_filter_script(target_path);
        // `-- --all` rewrites every ref, remote-tracking branches included,
        // so branches discovered afterwards are already relocated.
        self.execute_git_command_checked(
            &["filter-branch", "-f", "--tree-filter", &filter, "--", "--all"],
            Some(repo),
        )
        .await?;
        Ok(())
    }

    async fn first_divergent_commit(
        &self,
        repo: &Path,
        branch: &str,
        reference: &str,
    ) -> Result<Option<CommitId>, VcsError> {
        let branch_history = self
            .execute_git_command_checked(&["rev-list", "--first-parent", branch], Some(repo))
            .await?;
        let reference_history = self
            .execute_git_command_checked(&["rev-list", "--first-parent", reference], Some(repo))
            .await?;

        let branch_history: Vec<String> = branch_history.lines().map(str::to_string).collect();
        let reference_history: Vec<String> =
            reference_history.lines().map(str::to_string).collect();

        match fork_point(&branch_history, &reference_history) {
            Some(commit) => {
                let commit = CommitId::new(commit).map_err(|e| VcsError::UnexpectedOutput {
                    message: e.to_string(),
                })?;
                Ok(Some(commit))
            }
            None => Ok(None),
        }
    }

    async fn add_remote(&self, repo: &Path, name: &str, location: &str) -> Result<(), VcsError> {
        self.execute_git_command_checked(&["remote", "add", "-f", name, location], Some(repo))
            .await?;
        Ok(())
    }

    async fn remove_remote(&self, repo: &Path, name: &str) -> Result<(), VcsError> {
        self.execute_git_command_checked(&["remote", "remove", name], Some(repo))
            .await?;
        Ok(())
    }

    async fn merge(
        &self,
        repo: &Path,
        refname: &str,
        allow_unrelated: bool,
    ) -> Result<(), VcsError> {
        let mut args = vec!["merge", "--no-ff", refname];
        if allow_unrelated {
            args.push("--allow-unrelated-histories");
        }
        self.execute_git_command_checked(&args, Some(repo)).await?;
        Ok(())
    }

    async fn remove_directory(&self, path: &Path) -> Result<(), VcsError> {
        tokio::fs::remove_dir_all(path)
            .await
            .map_err(|source| VcsError::RemoveFailed {
                path: path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn revs(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fork_point_is_the_newest_shared_commit() {
        // Newest first, as rev-list prints them.
        let branch = revs(&["f2", "f1", "c3", "c2", "c1"]);
        let reference = revs(&["d1", "c3", "c2", "c1"]);
        assert_eq!(fork_point(&branch, &reference), Some("c3"));
    }

    #[test]
    fn fork_point_of_disjoint_histories_is_none() {
        let branch = revs(&["f2", "f1"]);
        let reference = revs(&["c2", "c1"]);
        assert_eq!(fork_point(&branch, &reference), None);
    }

    #[test]
    fn fork_point_of_fully_merged_branch_is_its_tip() {
        let branch = revs(&["c2", "c1"]);
        let reference = revs(&["c3", "c2", "c1"]);
        assert_eq!(fork_point(&branch, &reference), Some("c2"));
    }

    #[test]
    fn fork_point_with_empty_inputs_is_none() {
        assert_eq!(fork_point(&[], &revs(&["c1"])), None);
        assert_eq!(fork_point(&revs(&["c1"]), &[]), None);
    }

    #[test]
    fn remote_branch_parsing_drops_symbolic_entries() {
        let output = "  origin/HEAD -> origin/master\n  origin/feature-x\n  origin/fix/crash\n";
        assert_eq!(
            parse_remote_branches(output),
            vec!["origin/feature-x".to_string(), "origin/fix/crash".to_string()]
        );
    }

    #[test]
    fn remote_branch_parsing_handles_empty_output() {
        assert_eq!(parse_remote_branches(""), Vec::<String>::new());
    }

    #[test]
    fn tree_filter_moves_everything_except_metadata_and_target_root() {
        let script = tree_filter_script("libs/a");
        assert_eq!(
            script,
            "mkdir -p 'libs/a' && find . -mindepth 1 -maxdepth 1 \
             ! -name .git ! -name 'libs' -exec mv {} 'libs/a'/ \\;"
        );
    }

    #[test]
    fn tree_filter_single_segment_path_excludes_itself() {
        let script = tree_filter_script("vendor");
        assert!(script.contains("! -name 'vendor'"));
        assert!(script.contains("mkdir -p 'vendor'"));
    }

    #[test]
    fn sh_quote_escapes_embedded_quotes() {
        assert_eq!(sh_quote("a'b"), r"'a'\''b'");
    }
}
