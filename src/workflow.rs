//! Materializes a project's folder structure on disk.
//!
//! A `WorkflowBuilder` is constructed once from settings and walks the
//! configured structure for the requested project type, creating
//! `{date}_{project}` under the project root, one directory per canonical
//! folder key, and per-camera subfolders under the camera folder. Every
//! step is `create_dir_all`: re-running over an existing project neither
//! fails nor touches existing contents. There is no rollback; a failed
//! run leaves the directories it already created, and the next run picks
//! them up unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::settings::{WorkflowSettings, KEY_CAMERA};

/// One camera row from the workflow form. Entries with an empty model are
/// skipped; a non-empty tag is appended to the folder name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraEntry {
    pub model: String,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Everything the workflow form collects. `date_stamp` is supplied by the
/// caller (shoot date or delivery date); the materializer never consults
/// the clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub project_name: String,
    pub project_type: String,
    pub date_stamp: String,
    #[serde(default)]
    pub cameras: Vec<CameraEntry>,
}

/// What a materialization run produced: the project directory and the
/// structure folders inside it, in creation order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    pub project_dir: PathBuf,
    pub folders: Vec<PathBuf>,
}

pub struct WorkflowBuilder {
    settings: WorkflowSettings,
}

impl WorkflowBuilder {
    pub fn new(settings: WorkflowSettings) -> Self {
        Self { settings }
    }

    /// Create the full folder structure for one project.
    pub fn create_project(&self, request: &ProjectRequest) -> Result<CreatedProject, WorkflowError> {
        let root = self
            .settings
            .project_path
            .as_ref()
            .ok_or(WorkflowError::ProjectPathNotSet)?;

        let project_name = request.project_name.trim();
        if project_name.is_empty() {
            return Err(WorkflowError::EmptyProjectName);
        }

        let structure = self
            .settings
            .folder_structures
            .get(&request.project_type)
            .ok_or_else(|| WorkflowError::UnknownProjectType(request.project_type.clone()))?;

        let language = &self.settings.folder_language;
        let names = self
            .settings
            .folder_names
            .get(language)
            .ok_or_else(|| WorkflowError::UnknownLanguage(language.clone()))?;

        let project_dir = root.join(format!("{}_{}", request.date_stamp, project_name));
        ensure_dir(&project_dir)?;

        let mut folders = Vec::with_capacity(structure.len());
        for key in structure {
            let display = names.get(key).ok_or_else(|| WorkflowError::MissingFolderName {
                language: language.clone(),
                key: key.clone(),
            })?;
            let folder_path = project_dir.join(display);
            ensure_dir(&folder_path)?;

            if key == KEY_CAMERA {
                self.create_camera_folders(&folder_path, request)?;
            }

            folders.push(folder_path);
        }

        log::info!(
            "Created workflow folders for '{}' ({} folders) at {}",
            project_name,
            folders.len(),
            project_dir.display()
        );

        Ok(CreatedProject {
            project_dir,
            folders,
        })
    }

    /// Per-camera subfolders: `{date}_{model}` or `{date}_{model}_{tag}`.
    fn create_camera_folders(
        &self,
        camera_root: &Path,
        request: &ProjectRequest,
    ) -> Result<(), WorkflowError> {
        for camera in &request.cameras {
            let model = camera.model.trim();
            if model.is_empty() {
                continue;
            }

            let mut folder = format!("{}_{}", request.date_stamp, model);
            if let Some(tag) = &camera.tag {
                let tag = tag.trim();
                if !tag.is_empty() {
                    folder.push('_');
                    folder.push_str(tag);
                }
            }
            ensure_dir(&camera_root.join(folder))?;
        }
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> Result<(), WorkflowError> {
    fs::create_dir_all(path).map_err(|source| WorkflowError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn english_settings(root: PathBuf) -> WorkflowSettings {
        let mut settings = WorkflowSettings::default();
        settings.project_path = Some(root);
        settings.folder_language = "english".to_string();
        settings
    }

    fn request(name: &str, project_type: &str, cameras: Vec<CameraEntry>) -> ProjectRequest {
        ProjectRequest {
            project_name: name.to_string(),
            project_type: project_type.to_string(),
            date_stamp: "20240101".to_string(),
            cameras,
        }
    }

    #[test]
    fn test_creates_structure_with_camera_subfolder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let builder = WorkflowBuilder::new(english_settings(dir.path().to_path_buf()));

        let created = builder
            .create_project(&request(
                "Launch",
                "simple",
                vec![CameraEntry {
                    model: "SonyA7S3".to_string(),
                    tag: Some("A".to_string()),
                }],
            ))
            .expect("create");

        let project_dir = dir.path().join("20240101_Launch");
        assert_eq!(created.project_dir, project_dir);
        assert!(project_dir.join("01_Camera").is_dir());
        assert!(project_dir.join("02_Files").is_dir());
        assert!(project_dir.join("04_Project").is_dir());
        assert!(project_dir
            .join("01_Camera")
            .join("20240101_SonyA7S3_A")
            .is_dir());
        assert_eq!(created.folders.len(), 3);
    }

    #[test]
    fn test_camera_without_tag_and_blank_model() {
        let dir = tempfile::tempdir().expect("tempdir");
        let builder = WorkflowBuilder::new(english_settings(dir.path().to_path_buf()));

        builder
            .create_project(&request(
                "Shoot",
                "simple",
                vec![
                    CameraEntry {
                        model: "FX3".to_string(),
                        tag: None,
                    },
                    CameraEntry {
                        model: "  ".to_string(),
                        tag: Some("B".to_string()),
                    },
                    CameraEntry {
                        model: "FX6".to_string(),
                        tag: Some("  ".to_string()),
                    },
                ],
            ))
            .expect("create");

        let camera_dir = dir.path().join("20240101_Shoot").join("01_Camera");
        assert!(camera_dir.join("20240101_FX3").is_dir());
        assert!(camera_dir.join("20240101_FX6").is_dir());

        let entries = std::fs::read_dir(&camera_dir).expect("read camera dir").count();
        assert_eq!(entries, 2, "blank model row is skipped");
    }

    #[test]
    fn test_rerun_is_idempotent_and_preserves_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let builder = WorkflowBuilder::new(english_settings(dir.path().to_path_buf()));
        let req = request("Launch", "standard", vec![]);

        builder.create_project(&req).expect("first run");

        // A file dropped into the tree must survive the second run
        let marker = dir
            .path()
            .join("20240101_Launch")
            .join("03_Audio")
            .join("scratch.wav");
        std::fs::write(&marker, b"tone").expect("write marker");

        builder.create_project(&req).expect("second run");
        assert!(marker.exists(), "existing contents must not be truncated");
    }

    #[test]
    fn test_project_path_not_set() {
        let builder = WorkflowBuilder::new(WorkflowSettings::default());
        let err = builder
            .create_project(&request("Launch", "simple", vec![]))
            .expect_err("no project path");
        assert!(matches!(err, WorkflowError::ProjectPathNotSet));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_empty_project_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let builder = WorkflowBuilder::new(english_settings(dir.path().to_path_buf()));
        let err = builder
            .create_project(&request("   ", "simple", vec![]))
            .expect_err("blank name");
        assert!(matches!(err, WorkflowError::EmptyProjectName));
    }

    #[test]
    fn test_unknown_project_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let builder = WorkflowBuilder::new(english_settings(dir.path().to_path_buf()));
        let err = builder
            .create_project(&request("Launch", "cinematic", vec![]))
            .expect_err("unknown type");
        assert!(matches!(err, WorkflowError::UnknownProjectType(ref t) if t == "cinematic"));
    }

    #[test]
    fn test_missing_folder_name_for_language() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut settings = english_settings(dir.path().to_path_buf());
        settings
            .folder_names
            .get_mut("english")
            .expect("english table")
            .remove(crate::settings::KEY_FILE);

        let builder = WorkflowBuilder::new(settings);
        let err = builder
            .create_project(&request("Launch", "simple", vec![]))
            .expect_err("missing localization");
        assert!(
            matches!(err, WorkflowError::MissingFolderName { ref key, .. } if key == crate::settings::KEY_FILE)
        );
    }

    #[test]
    fn test_unknown_language() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut settings = english_settings(dir.path().to_path_buf());
        settings.folder_language = "klingon".to_string();

        let builder = WorkflowBuilder::new(settings);
        let err = builder
            .create_project(&request("Launch", "simple", vec![]))
            .expect_err("unknown language");
        assert!(matches!(err, WorkflowError::UnknownLanguage(ref l) if l == "klingon"));
    }
}
