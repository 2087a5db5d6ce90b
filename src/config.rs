//! Persisted client-side preferences.
//!
//! Two small pieces of state live outside the remote service: the selected
//! display language and the one-time community-posting verification flag.
//! Both are stored as a JSON key-value file with no expiry at
//! `<config dir>/matricare/preferences.json`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::Language;

/// Application name used for the config directory path
const APP_NAME: &str = "matricare";

/// Preferences file name
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Preferences {
    #[serde(default)]
    pub language: Language,
    /// Set once the user has passed the community-posting verification.
    #[serde(rename = "communityVerified", default)]
    pub community_verified: bool,
}

impl Preferences {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::preferences_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::preferences_path()?)
    }

    /// Load from an explicit path; missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn preferences_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(PREFERENCES_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load_from(&dir.path().join("preferences.json")).unwrap();
        assert_eq!(prefs.language, Language::English);
        assert!(!prefs.community_verified);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let prefs = Preferences {
            language: Language::Nepali,
            community_verified: true,
        };
        prefs.save_to(&path).unwrap();

        let loaded = Preferences::load_from(&path).unwrap();
        assert_eq!(loaded, prefs);
    }
}
