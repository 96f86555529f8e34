//! Editor settings

use serde::{Deserialize, Serialize};

fn default_history_limit() -> usize {
    50
}

/// Application-level editor configuration (not part of a scene)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Number of undo snapshots kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Material color for placed objects without an explicit color
    pub default_object_color: String,
    /// New lights are placed at this offset from the selected object (or origin)
    pub default_light_offset: [f64; 3],
    /// X offset applied to duplicated objects
    pub duplicate_offset: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            default_object_color: "#44aa88".to_string(),
            default_light_offset: [2.0, 2.0, 2.0],
            duplicate_offset: 1.0,
        }
    }
}

impl EditorSettings {
    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "classroom", "classroom-editor")
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = Self::project_dirs() {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str::<EditorSettings>(&json) {
                    Ok(settings) => return settings.sanitized(),
                    Err(e) => {
                        tracing::warn!("Ignoring invalid settings at {}: {e}", config_path.display())
                    }
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = Self::project_dirs() {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::error!("Failed to write settings: {e}");
                    }
                }
            }
        }
    }

    /// History needs room for the baseline plus one edit
    pub fn sanitized(mut self) -> Self {
        self.history_limit = self.history_limit.max(2);
        self
    }
}
