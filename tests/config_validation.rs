//! CLI-level tests for configuration loading and validation errors.

mod common;

use assert_cmd::Command;
use common::fixtures::write_config;
use predicates::prelude::*;
use tempfile::TempDir;

fn repomerge(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("repomerge").unwrap();
    cmd.current_dir(root.path());
    cmd
}

#[test]
fn missing_configuration_file_fails_with_message() {
    let root = TempDir::new().unwrap();

    repomerge(&root)
        .arg("no-such-config.json")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("no-such-config.json"));
}

#[test]
fn malformed_json_fails_with_message() {
    let root = TempDir::new().unwrap();
    let config = write_config(root.path(), "{ this is not json");

    repomerge(&root)
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does not contain valid JSON"));
}

#[test]
fn missing_projects_to_merge_section_is_named() {
    let root = TempDir::new().unwrap();
    let config = write_config(
        root.path(),
        r#"{
            "gitConfig": {},
            "mainProject": {
                "name": "main",
                "repository": "git@example.com:main.git",
                "mainBranch": "master",
                "createBranch": "integration"
            }
        }"#,
    );

    repomerge(&root)
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "\"projectsToMerge\" section is missing",
        ));

    // Validation happens before any repository is touched.
    assert!(!root.path().join("main").exists());
}

#[test]
fn missing_main_project_option_is_named() {
    let root = TempDir::new().unwrap();
    let config = write_config(
        root.path(),
        r#"{
            "gitConfig": {},
            "mainProject": {
                "name": "main",
                "repository": "git@example.com:main.git",
                "mainBranch": "master"
            },
            "projectsToMerge": {}
        }"#,
    );

    repomerge(&root)
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"createBranch\" option is missing"))
        .stderr(predicate::str::contains("\"mainProject\" section"));
}

#[test]
fn missing_project_option_names_the_project() {
    let root = TempDir::new().unwrap();
    let config = write_config(
        root.path(),
        r#"{
            "gitConfig": {},
            "mainProject": {
                "name": "main",
                "repository": "git@example.com:main.git",
                "mainBranch": "master",
                "createBranch": "integration"
            },
            "projectsToMerge": {
                "libA": {
                    "repository": "git@example.com:lib-a.git",
                    "mainBranch": "master",
                    "ignoreBranches": ""
                }
            }
        }"#,
    );

    repomerge(&root)
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"path\" option is missing"))
        .stderr(predicate::str::contains("\"libA\" project"));
}

#[test]
fn invalid_ignore_pattern_is_rejected() {
    let root = TempDir::new().unwrap();
    let config = write_config(
        root.path(),
        r#"{
            "gitConfig": {},
            "mainProject": {
                "name": "main",
                "repository": "git@example.com:main.git",
                "mainBranch": "master",
                "createBranch": "integration"
            },
            "projectsToMerge": {
                "libA": {
                    "repository": "git@example.com:lib-a.git",
                    "path": "libs/a",
                    "mainBranch": "master",
                    "ignoreBranches": "origin/("
                }
            }
        }"#,
    );

    repomerge(&root)
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid ignore pattern"))
        .stderr(predicate::str::contains("\"libA\""));
}
