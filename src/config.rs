use std::{fs::read_to_string, path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result};
use chrono::prelude::*;
use colored::Colorize;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::engine::TICK_INTERVAL;

/// Global configuration values
///
/// The configuration is stored in a TOML file in the current user's
/// config directory, which is `~/.config/graincountdown/config.toml` by default
/// on Linux.
///
/// A config can be loaded from a file with [`Config::load`].
/// You can also use [`Config::init`] or [`Config::init_default`] to create
/// a default config file if one does not exist at the given path.
///
/// To save a config to the filesystem, use [`Config::save`].
///
/// ## File Format
///
/// The configuration file is written as a TOML file.
/// See the documentation for each field to learn how they are serialized.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Instant the countdown runs to
    ///
    /// Default is `2024-10-31T23:59:59` local time.
    /// Serialized as an RFC 3339 string. A zoneless `YYYY-MM-DDTHH:MM:SS`
    /// string is also accepted and read as local time.
    #[serde(default = "default_target", with = "crate::time::datetime::local")]
    pub target: DateTime<Local>,
    /// Time between countdown updates
    ///
    /// Default is 1 second.
    /// Serialized as an integer count of seconds.
    #[serde(default = "default_tick_interval", with = "crate::time::duration::seconds")]
    pub tick_interval: Duration,
    /// Heading shown next to the countdown
    #[serde(default = "default_title")]
    pub title: String,
    /// Line shown under the countdown
    #[serde(default = "default_tagline")]
    pub tagline: String,
}

impl Config {
    /// Returns the current config, creating a default config file if one does not exist
    pub fn init(config_path: &Path) -> Result<Self> {
        if let Some(conf) = Config::load(config_path)? {
            Ok(conf)
        } else {
            let conf = Config::default();

            eprintln!(
                "Creating config file at {}",
                config_path.display().to_string().cyan()
            );

            conf.save(config_path)?;

            Ok(conf)
        }
    }

    /// Returns the current config from the default location, and creates the file if one does not exist
    pub fn init_default() -> Result<Self> {
        let path = default_config_path()?;
        Self::init(&path)
    }

    /// Reads a TOML config file
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            let config_str = read_to_string(path)
                .with_context(|| format!("Unable to read config file {}", path.display()))?;

            toml::from_str(&config_str)
                .map(Some)
                .with_context(|| format!("Failed to parse config {} from TOML", path.display()))
        } else {
            Ok(None)
        }
    }

    /// Write this config file to the filesystem
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string(&self)
            .with_context(|| "Unable to format config as TOML")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create config directory {}", parent.display()))?;
        }

        std::fs::write(path, toml)
            .with_context(|| format!("Unable to write config TOML to path {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: default_target(),
            tick_interval: default_tick_interval(),
            title: default_title(),
            tagline: default_tagline(),
        }
    }
}

/// Get the default location of the config file
pub fn default_config_path() -> Result<PathBuf> {
    let conf_path = ProjectDirs::from("com", "GrainTheory", "GrainCountdown")
        .with_context(|| "Unable to determine XDG directories")?
        .config_dir()
        .join("config.toml");

    Ok(conf_path)
}

fn default_target() -> DateTime<Local> {
    let launch = NaiveDate::from_ymd_opt(2024, 10, 31)
        .and_then(|day| day.and_hms_opt(23, 59, 59))
        .unwrap_or_default();

    Local
        .from_local_datetime(&launch)
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&launch).with_timezone(&Local))
}

fn default_tick_interval() -> Duration {
    TICK_INTERVAL
}

fn default_title() -> String {
    "Grain Theory".to_string()
}

fn default_tagline() -> String {
    "Be the first to know when we launch".to_string()
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use chrono::prelude::*;

    use super::Config;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(
            config.target.naive_local().to_string(),
            "2024-10-31 23:59:59"
        );
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.title, "Grain Theory");
    }

    #[test]
    fn reads_target_and_interval() {
        let config: Config = toml::from_str(
            r#"
            target = "2025-01-01T00:00:00Z"
            tick_interval = 5
            title = "Launch"
            "#,
        )
        .unwrap();

        let expected: DateTime<Local> = "2025-01-01T00:00:00Z".parse().unwrap();

        assert_eq!(config.target, expected);
        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert_eq!(config.title, "Launch");
    }

    #[test]
    fn rejects_zero_interval() {
        let result: Result<Config, _> = toml::from_str("tick_interval = 0");

        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_target() {
        let result: Result<Config, _> = toml::from_str(r#"target = "someday""#);

        assert!(result.is_err());
    }

    #[test]
    fn init_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::init(&path).unwrap();

        assert!(path.exists());

        let reloaded = Config::load(&path).unwrap().unwrap();
        assert_eq!(reloaded.target, config.target);
        assert_eq!(reloaded.tick_interval, config.tick_interval);
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();

        assert!(Config::load(&dir.path().join("absent.toml")).unwrap().is_none());
    }
}
