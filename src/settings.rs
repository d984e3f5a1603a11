//! Workflow settings: project root, folder structures, and folder name
//! localization.
//!
//! Persisted as JSON at `~/.flowstudio/workflow_settings.json` with the
//! same snake_case keys the settings screen has always written. A missing
//! file yields the built-in defaults; unknown project types or languages
//! added by hand in the file are carried through untouched.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Canonical folder keys are language-independent; the per-language tables
/// below map them to the display names used on disk.
pub const KEY_CAMERA: &str = "01_Camera";
pub const KEY_FILE: &str = "02_File";
pub const KEY_AUDIO: &str = "03_Audio";
pub const KEY_PROJECT: &str = "04_Project";
pub const KEY_RENDER: &str = "05_Render";
pub const KEY_ARCHIVE: &str = "06_Archive";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    /// Root directory new project folders are created under.
    pub project_path: Option<PathBuf>,
    /// Directory holding per-NLE project file templates.
    pub editing_templates_path: Option<PathBuf>,
    /// Directory holding the app database; `None` means the default under
    /// the home directory.
    pub database_path: Option<PathBuf>,
    /// Active language key into `folder_names`.
    pub folder_language: String,
    /// Ordered canonical folder keys per project type.
    pub folder_structures: HashMap<String, Vec<String>>,
    /// Display name per language per canonical key.
    pub folder_names: HashMap<String, HashMap<String, String>>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        let mut folder_structures = HashMap::new();
        folder_structures.insert(
            "simple".to_string(),
            vec![
                KEY_CAMERA.to_string(),
                KEY_FILE.to_string(),
                KEY_PROJECT.to_string(),
            ],
        );
        folder_structures.insert(
            "standard".to_string(),
            vec![
                KEY_CAMERA.to_string(),
                KEY_FILE.to_string(),
                KEY_AUDIO.to_string(),
                KEY_PROJECT.to_string(),
                KEY_RENDER.to_string(),
            ],
        );
        let large = vec![
            KEY_CAMERA.to_string(),
            KEY_FILE.to_string(),
            KEY_AUDIO.to_string(),
            KEY_PROJECT.to_string(),
            KEY_RENDER.to_string(),
            KEY_ARCHIVE.to_string(),
        ];
        folder_structures.insert("large".to_string(), large.clone());
        folder_structures.insert("complex".to_string(), large);

        let english: HashMap<String, String> = [
            (KEY_CAMERA, "01_Camera"),
            (KEY_FILE, "02_Files"),
            (KEY_AUDIO, "03_Audio"),
            (KEY_PROJECT, "04_Project"),
            (KEY_RENDER, "05_Render"),
            (KEY_ARCHIVE, "06_Archive"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let chinese: HashMap<String, String> = [
            (KEY_CAMERA, "01_相机素材"),
            (KEY_FILE, "02_文件"),
            (KEY_AUDIO, "03_音频"),
            (KEY_PROJECT, "04_工程文件"),
            (KEY_RENDER, "05_渲染输出"),
            (KEY_ARCHIVE, "06_归档"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut folder_names = HashMap::new();
        folder_names.insert("english".to_string(), english);
        folder_names.insert("chinese".to_string(), chinese);

        WorkflowSettings {
            project_path: None,
            editing_templates_path: None,
            database_path: None,
            folder_language: "chinese".to_string(),
            folder_structures,
            folder_names,
        }
    }
}

impl WorkflowSettings {
    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, String> {
        Self::load_from(&settings_path()?)
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file: {}", e))?;
        serde_json::from_str(&text).map_err(|e| format!("Failed to parse settings file: {}", e))
    }

    /// Save to the default location, creating `~/.flowstudio` if needed.
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&settings_path()?)
    }

    /// Save to an explicit path, creating parent directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(path, text).map_err(|e| format!("Failed to write settings file: {}", e))
    }

    /// Database file honoring the configured directory override.
    pub fn database_file(&self) -> Option<PathBuf> {
        self.database_path
            .as_ref()
            .map(|dir| dir.join("flowstudio.db"))
    }
}

/// Resolve the default settings path: `~/.flowstudio/workflow_settings.json`.
fn settings_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Home directory not found")?;
    Ok(home.join(".flowstudio").join("workflow_settings.json"))
}

// =============================================================================
// Tests
// =============================================================================
