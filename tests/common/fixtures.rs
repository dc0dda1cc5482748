//! Builders for real git repository fixtures used by the end-to-end tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run a git command in `dir`, panicking with full output on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_MERGE_AUTOEDIT", "no")
        .output()
        .expect("git must be installed for integration tests");
    assert!(
        output.status.success(),
        "git {:?} failed in {}:\nstdout: {}\nstderr: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialize an empty repository with `master` as its initial branch and a
/// committer identity configured.
pub fn init_repo(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    git(dir, &["init"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    git(dir, &["config", "user.name", "Fixture"]);
    git(dir, &["config", "user.email", "fixture@example.com"]);
}

/// Write a file and commit it.
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", message]);
}

/// A main-project fixture: one commit with `main.txt` on `master`.
pub fn build_main_repo(root: &Path) -> PathBuf {
    let dir = root.join("origin-main");
    init_repo(&dir);
    commit_file(&dir, "main.txt", "main content\n", "initial commit");
    dir
}

/// A source-project fixture with:
/// - `master`: one commit with `a.txt`
/// - `dev`: pointing at the same commit as `master`
/// - `feature-x`: branched from `dev` with one extra commit (`feature.txt`),
///   i.e. one remote branch not merged into `master`
pub fn build_lib_repo(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    init_repo(&dir);
    commit_file(&dir, "a.txt", "library content\n", "initial commit");
    git(&dir, &["branch", "dev"]);
    git(&dir, &["checkout", "-b", "feature-x", "dev"]);
    commit_file(&dir, "feature.txt", "feature work\n", "feature commit");
    git(&dir, &["checkout", "master"]);
    dir
}

/// Write a configuration file and return its path.
pub fn write_config(root: &Path, content: &str) -> PathBuf {
    let path = root.join("config.json");
    fs::write(&path, content).unwrap();
    path
}

/// Configuration for a run with no projects to merge.
pub fn main_only_config(main_repo: &Path) -> String {
    format!(
        r#"{{
            "gitConfig": {{"user.name": "Consolidator", "user.email": "c@example.com"}},
            "mainProject": {{
                "name": "main",
                "repository": "{}",
                "mainBranch": "master",
                "createBranch": "integration"
            }},
            "projectsToMerge": {{}}
        }}"#,
        main_repo.display()
    )
}

/// Configuration merging a single library under `libs/a`.
pub fn one_project_config(main_repo: &Path, lib_repo: &Path) -> String {
    format!(
        r#"{{
            "gitConfig": {{"user.name": "Consolidator", "user.email": "c@example.com"}},
            "mainProject": {{
                "name": "main",
                "repository": "{}",
                "mainBranch": "master",
                "createBranch": "integration"
            }},
            "projectsToMerge": {{
                "libA": {{
                    "repository": "{}",
                    "path": "libs/a",
                    "mainBranch": "master",
                    "ignoreBranches": "",
                    "divergenceReference": "master"
                }}
            }}
        }}"#,
        main_repo.display(),
        lib_repo.display()
    )
}
