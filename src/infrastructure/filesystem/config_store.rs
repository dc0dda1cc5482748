//! Loads and validates the JSON run configuration.
//!
//! Validation is deliberately chatty: every missing section or option gets
//! its own message naming exactly what is absent, and nothing is silently
//! defaulted. The configuration object handed out is fully validated.

use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

use crate::domain::entities::merge_config::{
    MainProject, MergeConfiguration, ProjectSpec, DEFAULT_DIVERGENCE_REFERENCE,
};
use crate::domain::value_objects::{IgnorePattern, IgnorePatternError};

/// Configuration loading and validation errors. All fatal.
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    /// The configuration file does not exist.
    #[error("configuration file \"{path}\" not found")]
    FileNotFound {
        /// Path as given on the command line.
        path: String,
    },

    /// The configuration file exists but could not be read.
    #[error("configuration file \"{path}\" could not be read: {source}")]
    ReadFailed {
        /// Path as given on the command line.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid JSON (or not a JSON object).
    #[error("configuration file \"{path}\" does not contain valid JSON: {message}")]
    InvalidJson {
        /// Path as given on the command line.
        path: String,
        /// Parser diagnostic.
        message: String,
    },

    /// A required top-level section is absent.
    #[error("\"{section}\" section is missing in the configuration file")]
    MissingSection {
        /// Section name (`gitConfig`, `mainProject` or `projectsToMerge`).
        section: String,
    },

    /// A required option of the `mainProject` section is absent.
    #[error("\"{option}\" option is missing in the \"mainProject\" section in the configuration file")]
    MissingMainProjectOption {
        /// Option name.
        option: String,
    },

    /// A required option of a project entry is absent.
    #[error("\"{option}\" option is missing in the \"{project}\" project in the configuration file")]
    MissingProjectOption {
        /// Option name.
        option: String,
        /// Project the option belongs to.
        project: String,
    },

    /// A present field has the wrong JSON type or an unusable value.
    #[error("\"{field}\" in the configuration file {message}")]
    InvalidValue {
        /// Dotted field location.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A project's ignore-branch pattern does not compile.
    #[error("project \"{project}\": {source}")]
    InvalidIgnorePattern {
        /// Project the pattern belongs to.
        project: String,
        /// Compilation error.
        #[source]
        source: IgnorePatternError,
    },
}

/// Reads `MergeConfiguration` from disk.
pub struct ConfigStore;

impl ConfigStore {
    /// Load and validate the configuration file at `path`.
    pub async fn load(path: &Path) -> Result<MergeConfiguration, ConfigStoreError> {
        let label = path.display().to_string();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigStoreError::FileNotFound { path: label.clone() }
            } else {
                ConfigStoreError::ReadFailed {
                    path: label.clone(),
                    source: e,
                }
            }
        })?;
        Self::parse(&label, &text)
    }

    /// Parse and validate configuration text. `label` is used in diagnostics.
    pub fn parse(label: &str, text: &str) -> Result<MergeConfiguration, ConfigStoreError> {
        let root: Value =
            serde_json::from_str(text).map_err(|e| ConfigStoreError::InvalidJson {
                path: label.to_string(),
                message: e.to_string(),
            })?;
        let root = root.as_object().ok_or_else(|| ConfigStoreError::InvalidJson {
            path: label.to_string(),
            message: "top level is not an object".to_string(),
        })?;
        Self::from_object(root)
    }

    fn from_object(root: &Map<String, Value>) -> Result<MergeConfiguration, ConfigStoreError> {
        // Section presence is checked before any option so the first
        // diagnostic names the coarsest missing piece.
        for section in ["gitConfig", "mainProject", "projectsToMerge"] {
            if !root.contains_key(section) {
                return Err(ConfigStoreError::MissingSection {
                    section: section.to_string(),
                });
            }
        }

        let git_config = Self::git_config(require_object(root, "gitConfig")?)?;
        let main_project = Self::main_project(require_object(root, "mainProject")?)?;

        let projects_section = require_object(root, "projectsToMerge")?;
        let mut projects = Vec::with_capacity(projects_section.len());
        for (name, value) in projects_section {
            let object = value.as_object().ok_or_else(|| ConfigStoreError::InvalidValue {
                field: format!("projectsToMerge.{name}"),
                message: "must be an object".to_string(),
            })?;
            projects.push((name.clone(), Self::project_spec(name, object)?));
        }

        Ok(MergeConfiguration {
            git_config,
            main_project,
            projects,
        })
    }

    fn git_config(
        section: &Map<String, Value>,
    ) -> Result<Vec<(String, String)>, ConfigStoreError> {
        let mut options = Vec::with_capacity(section.len());
        for (key, value) in section {
            let value = value.as_str().ok_or_else(|| ConfigStoreError::InvalidValue {
                field: format!("gitConfig.{key}"),
                message: "must be a string".to_string(),
            })?;
            options.push((key.clone(), value.to_string()));
        }
        Ok(options)
    }

    fn main_project(section: &Map<String, Value>) -> Result<MainProject, ConfigStoreError> {
        let field = |option: &str| -> Result<String, ConfigStoreError> {
            match section.get(option) {
                None => Err(ConfigStoreError::MissingMainProjectOption {
                    option: option.to_string(),
                }),
                Some(value) => value.as_str().map(str::to_string).ok_or_else(|| {
                    ConfigStoreError::InvalidValue {
                        field: format!("mainProject.{option}"),
                        message: "must be a string".to_string(),
                    }
                }),
            }
        };

        Ok(MainProject {
            name: field("name")?,
            repository: field("repository")?,
            main_branch: field("mainBranch")?,
            create_branch: field("createBranch")?,
        })
    }

    fn project_spec(
        name: &str,
        section: &Map<String, Value>,
    ) -> Result<ProjectSpec, ConfigStoreError> {
        let field = |option: &str| -> Result<String, ConfigStoreError> {
            match section.get(option) {
                None => Err(ConfigStoreError::MissingProjectOption {
                    option: option.to_string(),
                    project: name.to_string(),
                }),
                Some(value) => value.as_str().map(str::to_string).ok_or_else(|| {
                    ConfigStoreError::InvalidValue {
                        field: format!("projectsToMerge.{name}.{option}"),
                        message: "must be a string".to_string(),
                    }
                }),
            }
        };

        let repository = field("repository")?;
        let path = field("path")?;
        let main_branch = field("mainBranch")?;
        let ignore_source = field("ignoreBranches")?;

        if path.is_empty() || path.starts_with('/') {
            return Err(ConfigStoreError::InvalidValue {
                field: format!("projectsToMerge.{name}.path"),
                message: "must be a non-empty relative path".to_string(),
            });
        }

        let ignore_branches = IgnorePattern::compile(&ignore_source).map_err(|source| {
            ConfigStoreError::InvalidIgnorePattern {
                project: name.to_string(),
                source,
            }
        })?;

        let divergence_reference = match section.get("divergenceReference") {
            None => DEFAULT_DIVERGENCE_REFERENCE.to_string(),
            Some(value) => value.as_str().map(str::to_string).ok_or_else(|| {
                ConfigStoreError::InvalidValue {
                    field: format!("projectsToMerge.{name}.divergenceReference"),
                    message: "must be a string".to_string(),
                }
            })?,
        };

        Ok(ProjectSpec {
            repository,
            path,
            main_branch,
            ignore_branches,
            divergence_reference,
        })
    }
}

fn require_object<'a>(
    root: &'a Map<String, Value>,
    section: &str,
) -> Result<&'a Map<String, Value>, ConfigStoreError> {
    root.get(section)
        .and_then(Value::as_object)
        .ok_or_else(|| ConfigStoreError::InvalidValue {
            field: section.to_string(),
            message: "must be an object".to_string(),
        })
}
