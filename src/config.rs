use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{OrganizerError, Result};

pub const EVENTS_KEY: &str = "notes-app-events";
pub const TODOS_KEY: &str = "notes-app-todos";
pub const NOTES_KEY: &str = "notes-app-notes";

const CONFIG_FILE: &str = "config.json";

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON document per collection
    pub data_dir: PathBuf,

    /// Storage key of the events collection
    pub events_key: String,

    /// Storage key of the todos collection
    pub todos_key: String,

    /// Storage key of the notes collection
    pub notes_key: String,

    /// Editor used by `note add --edit` / `note edit --edit`
    pub editor_command: Option<String>,

    /// Whether collections are written as indented JSON
    pub pretty_json: bool,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "organizer")
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".organizer"));

        Self {
            data_dir,
            events_key: EVENTS_KEY.to_string(),
            todos_key: TODOS_KEY.to_string(),
            notes_key: NOTES_KEY.to_string(),
            editor_command: None,
            pretty_json: false,
        }
    }
}

impl Config {
    /// Platform location of the configuration file.
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(".organizer").join(CONFIG_FILE))
    }

    /// Loads the configuration at `path`, or the defaults if there is no
    /// file yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| OrganizerError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|_| OrganizerError::DirectoryError {
                path: parent.to_path_buf(),
            })?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Configuration written to {}", path.display());
        Ok(())
    }

    /// Applies a `key=value` assignment.
    pub fn set(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .ok_or_else(|| OrganizerError::ConfigError {
                message: format!("expected key=value, got '{}'", assignment),
            })?;

        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "events_key" => self.events_key = non_empty(key, value)?,
            "todos_key" => self.todos_key = non_empty(key, value)?,
            "notes_key" => self.notes_key = non_empty(key, value)?,
            "editor_command" => {
                self.editor_command = (!value.is_empty()).then(|| value.to_string())
            }
            "pretty_json" => {
                self.pretty_json = value.parse().map_err(|_| OrganizerError::ConfigError {
                    message: format!("pretty_json must be true or false, got '{}'", value),
                })?
            }
            other => {
                return Err(OrganizerError::ConfigError {
                    message: format!("unknown setting '{}'", other),
                })
            }
        }
        Ok(())
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -W -t".to_string()
        } else {
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        Err(OrganizerError::ConfigError {
            message: format!("{} cannot be empty", key),
        })
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.notes_key, NOTES_KEY);
        assert_eq!(config.events_key, EVENTS_KEY);
        assert!(!config.pretty_json);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("config.json");

        let mut config = Config::default();
        config.set("pretty_json=true").unwrap();
        config.set("data_dir = /tmp/organizer-data").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.pretty_json);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"todos_key": "my-todos"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.todos_key, "my-todos");
        assert_eq!(config.notes_key, NOTES_KEY);
    }

    #[test]
    fn rejects_bad_assignments() {
        let mut config = Config::default();
        assert!(config.set("pretty_json").is_err());
        assert!(config.set("colour=red").is_err());
        assert!(config.set("notes_key=").is_err());
        assert!(config.set("pretty_json=maybe").is_err());

        config.set("editor_command=code --wait").unwrap();
        assert_eq!(config.get_editor_command(), "code --wait");
    }
}
