use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};

const SETTINGS_FILE: &str = "launcher_settings.json";

/// User choices remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    pub username: String,
    pub ram: String,
    pub last_version: Option<String>,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            username: "Player".into(),
            ram: "2G".into(),
            last_version: None,
        }
    }
}

/// Small persisted key-value store backed by a JSON file.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: LauncherSettings,
}

impl SettingsStore {
    /// Open the store in `dir`. A missing or unreadable file yields defaults.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        let settings = load_settings_from_disk(&path).unwrap_or_default();
        Self { path, settings }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "username" => Some(self.settings.username.clone()),
            "ram" => Some(self.settings.ram.clone()),
            "last_version" => self.settings.last_version.clone(),
            _ => None,
        }
    }

    /// Set one key and persist. Unknown keys are ignored with a warning.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> LauncherResult<()> {
        let value = value.into();
        match key {
            "username" => self.settings.username = value,
            "ram" => self.settings.ram = value,
            "last_version" => self.settings.last_version = Some(value),
            other => {
                warn!("Ignoring unknown settings key {:?}", other);
                return Ok(());
            }
        }
        self.save()
    }

    pub fn update(&mut self, f: impl FnOnce(&mut LauncherSettings)) -> LauncherResult<()> {
        f(&mut self.settings);
        self.save()
    }

    /// Write the settings with temp file + rename so a crash never leaves half a file.
    pub fn save(&self) -> LauncherResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&self.settings)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json).map_err(|e| LauncherError::io(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            LauncherError::io(&self.path, e)
        })?;

        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

fn load_settings_from_disk(path: &Path) -> Option<LauncherSettings> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Corrupt settings file {:?}: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::open(temp.path());
        assert_eq!(store.settings(), &LauncherSettings::default());
        assert_eq!(store.get("username").as_deref(), Some("Player"));
        assert_eq!(store.get("last_version"), None);
    }

    #[test]
    fn set_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let mut store = SettingsStore::open(temp.path());
        store.set("username", "Alex").unwrap();
        store.set("last_version", "1.20.4").unwrap();

        let reopened = SettingsStore::open(temp.path());
        assert_eq!(reopened.get("username").as_deref(), Some("Alex"));
        assert_eq!(reopened.get("last_version").as_deref(), Some("1.20.4"));
        assert_eq!(reopened.get("ram").as_deref(), Some("2G"));
        assert!(!temp.path().join("launcher_settings.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(SETTINGS_FILE), "{not json").unwrap();
        let store = SettingsStore::open(temp.path());
        assert_eq!(store.settings().username, "Player");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(SETTINGS_FILE), r#"{"username":"Steve"}"#).unwrap();
        let store = SettingsStore::open(temp.path());
        assert_eq!(store.settings().username, "Steve");
        assert_eq!(store.settings().ram, "2G");
    }

    #[test]
    fn unknown_key_is_ignored() {
        let temp = TempDir::new().unwrap();
        let mut store = SettingsStore::open(temp.path());
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme"), None);
    }
}
