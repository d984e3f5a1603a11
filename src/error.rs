//! Error types for workflow materialization.
//!
//! Errors are classified by recoverability:
//! - User errors: missing or invalid input/configuration, fixable in the UI
//! - Filesystem errors: surfaced to the operator as-is, never retried

use std::path::PathBuf;
use thiserror::Error;

/// Error types for workflow materialization.
#[derive(Debug, Error)]
pub enum WorkflowError {
    // User errors
    #[error("Project path is not configured")]
    ProjectPathNotSet,

    #[error("Project name is empty")]
    EmptyProjectName,

    #[error("Unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("No folder names defined for language '{0}'")]
    UnknownLanguage(String),

    #[error("Folder key '{key}' has no '{language}' display name")]
    MissingFolderName { language: String, key: String },

    // Filesystem errors
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl WorkflowError {
    /// Returns true if this error is caller input or configuration the user
    /// can correct, as opposed to a filesystem failure.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, WorkflowError::CreateDir { .. })
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WorkflowError::ProjectPathNotSet => {
                "Set the project path in Settings before creating a workflow."
            }
            WorkflowError::EmptyProjectName => "Enter a project name.",
            WorkflowError::UnknownProjectType(_) => {
                "Pick one of the configured project types, or add this one in Settings."
            }
            WorkflowError::UnknownLanguage(_) => {
                "Pick a folder language that has a name table in Settings."
            }
            WorkflowError::MissingFolderName { .. } => {
                "Add a display name for this folder key to the active language in Settings."
            }
            WorkflowError::CreateDir { .. } => {
                "Check permissions and free space on the project drive."
            }
        }
    }
}
