//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to database operations.
///
/// Validation variants (`UnknownProjectType`, `ParentNotFound`,
/// `DuplicateName`) are recoverable by the caller. Everything else is a
/// storage failure and is surfaced to the operator as-is.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    #[error("Unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("Parent folder not found: {0}")]
    ParentNotFound(i64),

    #[error("A folder named '{0}' already exists here")]
    DuplicateName(String),
}

impl DbError {
    /// Returns true if this error is caller input that can be corrected
    /// and retried, as opposed to a storage failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DbError::UnknownProjectType(_) | DbError::ParentNotFound(_) | DbError::DuplicateName(_)
        )
    }
}

/// A row from the `folder_templates` table, in store order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRow {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub sort_order: i64,
}

/// A row from the `projects` catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: i64,
    pub disk_id: String,
    pub project_date: String,
    pub project_name: String,
    pub backup_status: bool,
    pub notes: String,
    pub project_path: String,
    pub filename: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Catalog fields supplied by the caller when adding or updating a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub disk_id: String,
    pub project_date: String,
    pub project_name: String,
    pub backup_status: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub project_path: String,
    #[serde(default)]
    pub filename: String,
}

/// Optional filters for catalog queries. All set fields must match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    pub disk_id: Option<String>,
    pub backup_status: Option<bool>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search_text: Option<String>,
}
