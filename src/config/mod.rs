use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use folio_core::core::path::{config_file, ensure_dir};
use folio_core::FolioResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Show full book paths in the tree instead of generated short names.
    #[serde(default)]
    pub show_full_paths: bool,

    /// Delay in milliseconds between samples while waiting for an external
    /// write to settle.
    #[serde(default = "default_reload_debounce_ms")]
    pub reload_debounce_ms: u64,

    /// How many times to re-sample a still-changing file before giving up
    /// on the reload.
    #[serde(default = "default_reload_resample_cap")]
    pub reload_resample_cap: u32,
}

fn default_reload_debounce_ms() -> u64 {
    100
}

fn default_reload_resample_cap() -> u32 {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_full_paths: false,
            reload_debounce_ms: default_reload_debounce_ms(),
            reload_resample_cap: default_reload_resample_cap(),
        }
    }
}

impl Settings {
    /// Load settings from the platform config file, falling back to
    /// defaults when none exists yet.
    pub fn load() -> FolioResult<Self> {
        Self::load_from(&config_file()?)
    }

    pub fn load_from(path: &Path) -> FolioResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn save(&self) -> FolioResult<()> {
        self.save_to(&config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> FolioResult<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let contents = serde_yaml::to_string(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.show_full_paths);
        assert_eq!(settings.reload_debounce_ms, 100);
        assert_eq!(settings.reload_resample_cap, 50);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(settings.reload_debounce_ms, 100);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub/config.yaml");
        let settings = Settings {
            show_full_paths: true,
            reload_debounce_ms: 250,
            reload_resample_cap: 10,
        };
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert!(loaded.show_full_paths);
        assert_eq!(loaded.reload_debounce_ms, 250);
        assert_eq!(loaded.reload_resample_cap, 10);
    }

    #[test]
    fn test_partial_yaml_uses_field_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "show_full_paths: true\n").unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert!(loaded.show_full_paths);
        assert_eq!(loaded.reload_resample_cap, 50);
    }
}
