use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;

pub const ENV_URL: &str = "WEATHER_URL";
pub const ENV_APPID: &str = "WEATHER_APPID";
pub const ENV_LAT: &str = "WEATHER_LAT";
pub const ENV_LON: &str = "WEATHER_LON";

/// Validated connection settings for the weather provider.
///
/// Only obtainable through [`Config::provider_config`], so every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub latitude: String,
    pub longitude: String,
}

/// Raw configuration, as stored on disk and overlaid by the environment.
///
/// Example TOML:
/// url = "https://api.openweathermap.org/data/2.5/weather"
/// appid = "..."
/// lat = "55.75"
/// lon = "37.61"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub url: Option<String>,
    pub appid: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

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

    /// Save config to disk, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "walkcheck", "walkcheck")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values from `lookup` (normally the process environment).
    /// Empty values are treated as unset and do not override the file.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = pick(ENV_URL) {
            self.url = Some(v);
        }
        if let Some(v) = pick(ENV_APPID) {
            self.appid = Some(v);
        }
        if let Some(v) = pick(ENV_LAT) {
            self.lat = Some(v);
        }
        if let Some(v) = pick(ENV_LON) {
            self.lon = Some(v);
        }

        self
    }

    /// Validate into a [`ProviderConfig`], reporting the first missing field.
    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        Ok(ProviderConfig {
            base_url: required(&self.url, "URL", ENV_URL)?,
            api_key: required(&self.appid, "APPID", ENV_APPID)?,
            latitude: required(&self.lat, "Latitude", ENV_LAT)?,
            longitude: required(&self.lon, "Longitude", ENV_LON)?,
        })
    }
}

fn required(
    value: &Option<String>,
    field: &'static str,
    var: &'static str,
) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::MissingField { field, var }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_env() -> impl Fn(&str) -> Option<String> {
        env(&[
            (ENV_URL, "http://weather.local/data"),
            (ENV_APPID, "KEY"),
            (ENV_LAT, "55.75"),
            (ENV_LON, "37.61"),
        ])
    }

    #[test]
    fn provider_config_from_complete_env() {
        let cfg = Config::default()
            .with_env_overrides(full_env())
            .provider_config()
            .expect("all fields present");

        assert_eq!(cfg.base_url, "http://weather.local/data");
        assert_eq!(cfg.api_key, "KEY");
        assert_eq!(cfg.latitude, "55.75");
        assert_eq!(cfg.longitude, "37.61");
    }

    #[test]
    fn empty_config_reports_url_first() {
        let err = Config::default().provider_config().unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingField {
                field: "URL",
                var: ENV_URL
            }
        );
        assert!(err.to_string().contains("URL must be specified"));
    }

    #[test]
    fn missing_longitude_is_named() {
        let err = Config::default()
            .with_env_overrides(env(&[
                (ENV_URL, "http://weather.local"),
                (ENV_APPID, "KEY"),
                (ENV_LAT, "55.75"),
                (ENV_LON, ""),
            ]))
            .provider_config()
            .unwrap_err();

        assert!(err.to_string().contains("Longitude must be specified"));
        assert!(err.to_string().contains(ENV_LON));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let cfg = Config {
            url: Some("http://weather.local".into()),
            appid: Some("   ".into()),
            lat: Some("1".into()),
            lon: Some("2".into()),
        };

        let err = cfg.provider_config().unwrap_err();
        assert!(err.to_string().contains("APPID"));
    }

    #[test]
    fn env_overrides_file_values_but_empty_env_does_not() {
        let file = Config {
            url: Some("http://from-file".into()),
            appid: Some("FILE_KEY".into()),
            lat: Some("1".into()),
            lon: Some("2".into()),
        };

        let merged = file.with_env_overrides(env(&[(ENV_APPID, "ENV_KEY"), (ENV_LAT, "")]));

        assert_eq!(merged.url.as_deref(), Some("http://from-file"));
        assert_eq!(merged.appid.as_deref(), Some("ENV_KEY"));
        assert_eq!(merged.lat.as_deref(), Some("1"));
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("nope.toml")).expect("load");

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn saved_file_is_readable_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            url: Some("http://weather.local".into()),
            appid: Some("KEY".into()),
            lat: None,
            lon: Some("37.61".into()),
        };
        cfg.save_to(&path).expect("save");

        let raw = fs::read_to_string(&path).expect("read back");
        assert!(raw.contains("appid = \"KEY\""));
        assert!(!raw.contains("lat ="));
        assert_eq!(Config::load_from(&path).expect("load"), cfg);
    }
}
