use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_FPS: u32 = 30;

const CREDENTIAL_FILE_NAME: &str = "api_key.txt";
const LOG_FILE_NAME: &str = "miniweather.log";

/// Settings for the current-conditions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub fps: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// credential_file = "/home/me/.weather-key"
///
/// [provider]
/// endpoint = "https://api.openweathermap.org/data/2.5/weather"
/// timeout_secs = 5
///
/// [ui]
/// fps = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Overrides the platform data dir location of the API key file.
    pub credential_file: Option<PathBuf>,

    /// Overrides the platform data dir location of the log file.
    pub log_file: Option<PathBuf>,

    pub provider: ProviderConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the platform config dir, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

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
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Where the API key lives: the configured override, else the platform data dir.
    pub fn credential_file_path(&self) -> Result<PathBuf> {
        match &self.credential_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(CREDENTIAL_FILE_NAME)),
        }
    }

    pub fn log_file_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(LOG_FILE_NAME)),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "miniweather", "miniweather")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.provider.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.ui.fps, 30);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[provider]\ntimeout_secs = 2\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.provider.timeout_secs, 2);
        assert_eq!(cfg.provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.ui.fps, DEFAULT_FPS);
        assert!(cfg.credential_file.is_none());
    }

    #[test]
    fn save_then_load_keeps_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            ui: UiConfig { fps: 60 },
            credential_file: Some(dir.path().join("key.txt")),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(
            loaded.credential_file_path().unwrap(),
            dir.path().join("key.txt")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui\nfps = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
