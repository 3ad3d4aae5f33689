//! Persisted settings: `{api_key, output_folder}` as `settings.json`.
//!
//! Persistence here is **best-effort by contract**, not by accident:
//! [`Settings::load`] returns defaults when the file is missing or corrupt,
//! and [`Settings::store`] swallows every error. A user who cannot write
//! next to the executable still gets a fully working converter — they just
//! re-enter the API key next run. Callers must not rely on a store having
//! succeeded.
//!
//! The file lives next to the executable ([`Settings::default_path`]) so the
//! whole installation stays a single relocatable directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the settings file placed next to the executable.
pub const SETTINGS_FILE: &str = "settings.json";

/// User settings that survive across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Mistral API key. Empty until the user provides one.
    #[serde(default)]
    pub api_key: String,

    /// Directory Markdown files are written to.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,
}

fn default_output_folder() -> String {
    "./output".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            output_folder: default_output_folder(),
        }
    }
}

impl Settings {
    /// The default settings location: `settings.json` next to the executable.
    ///
    /// Falls back to the current directory when the executable path cannot
    /// be determined (best-effort, like everything else here).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|d| d.join(SETTINGS_FILE)))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Load settings from `path`. Missing or corrupt files yield defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => {
                    debug!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!("Corrupt settings file {} ({e}); using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Write settings to `path`, ignoring all errors.
    pub fn store(&self, path: &Path) {
        let Ok(json) = serde_json::to_string_pretty(self) else {
            return;
        };
        if let Err(e) = std::fs::write(path, json) {
            warn!("Could not write settings to {} ({e}); continuing", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let settings = Settings {
            api_key: "X".into(),
            output_folder: "Y".into(),
        };
        settings.store(&path);

        let loaded = Settings::load(&path);
        assert_eq!(loaded.api_key, "X");
        assert_eq!(loaded.output_folder, "Y");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let loaded = Settings::load(Path::new("/nonexistent/settings.json"));
        assert_eq!(loaded, Settings::default());
        assert_eq!(loaded.output_folder, "./output");
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{not json at all").unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn store_to_unwritable_path_is_a_noop() {
        let settings = Settings::default();
        // Must not panic or return an error.
        settings.store(Path::new("/nonexistent/dir/settings.json"));
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{"api_key": "only-key"}"#).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.api_key, "only-key");
        assert_eq!(loaded.output_folder, "./output");
    }
}
