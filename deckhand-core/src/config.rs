use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{Coordinates, UnitPreference};

/// Environment variable that overrides the API key from the config file.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "fahrenheit"
/// share_location = true
///
/// [home]
/// latitude = 48.4284
/// longitude = -123.3656
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Override for the provider base URL, e.g. a local proxy.
    pub base_url: Option<String>,

    /// Unit shown when a session starts.
    pub units: UnitPreference,

    /// When false, "use my location" is treated as a denied permission.
    pub share_location: bool,

    /// Coordinates reported as the device location.
    pub home: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            units: UnitPreference::default(),
            share_location: true,
            home: None,
        }
    }
}

impl Config {
    /// Load config from disk and apply the environment override.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg = Self::load_from(&path)?;
        Ok(cfg.with_env(|key| std::env::var(key).ok()))
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "deckhand", "deckhand")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the API key with a non-blank value from the environment, if any.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// Returns the API key or an error telling the user how to set one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `deckhand configure` or set {API_KEY_ENV}."
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shares_location_in_celsius() {
        let cfg = Config::default();
        assert!(cfg.share_location);
        assert_eq!(cfg.units, UnitPreference::Celsius);
        assert!(cfg.home.is_none());
    }

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains(API_KEY_ENV));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config { api_key: Some("  ".into()), ..Config::default() };
        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn env_overrides_file_key() {
        let cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() }
            .with_env(|k| (k == API_KEY_ENV).then(|| "ENV_KEY".to_string()));

        assert_eq!(cfg.require_api_key().expect("key must exist"), "ENV_KEY");
    }

    #[test]
    fn blank_env_keeps_file_key() {
        let cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() }
            .with_env(|_| Some(String::new()));

        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            units = "fahrenheit"

            [home]
            latitude = 48.4284
            longitude = -123.3656
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.units, UnitPreference::Fahrenheit);
        assert!(cfg.share_location);
        assert_eq!(cfg.home, Some(Coordinates { latitude: 48.4284, longitude: -123.3656 }));
    }

    #[test]
    fn missing_file_loads_default() {
        let path = std::env::temp_dir().join("deckhand-does-not-exist/config.toml");
        let cfg = Config::load_from(&path).expect("missing file is not an error");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            share_location: false,
            ..Config::default()
        };
        cfg.save_to(&path).expect("save must succeed");

        let loaded = Config::load_from(&path).expect("load must succeed");
        assert_eq!(loaded, cfg);
    }
}
