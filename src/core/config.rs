//! Persisted UI preferences.
//!
//! The preference file is plain TOML in the platform config directory. Every
//! preference change is written immediately; writes go through a temp file in
//! the same directory so a crash never leaves a half-written config behind.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::utils::direction::TextDirection;

/// The fixed accent palette. Matches the five colors the settings surface
/// offers; anything else in the config file is a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    Indigo,
    Emerald,
    Rose,
    Amber,
    Blue,
}

pub const THEME_COLORS: [ThemeColor; 5] = [
    ThemeColor::Indigo,
    ThemeColor::Emerald,
    ThemeColor::Rose,
    ThemeColor::Amber,
    ThemeColor::Blue,
];

impl ThemeColor {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeColor::Indigo => "indigo",
            ThemeColor::Emerald => "emerald",
            ThemeColor::Rose => "rose",
            ThemeColor::Amber => "amber",
            ThemeColor::Blue => "blue",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "indigo" => Some(ThemeColor::Indigo),
            "emerald" => Some(ThemeColor::Emerald),
            "rose" => Some(ThemeColor::Rose),
            "amber" => Some(ThemeColor::Amber),
            "blue" => Some(ThemeColor::Blue),
            _ => None,
        }
    }
}

impl Default for ThemeColor {
    fn default() -> Self {
        ThemeColor::Indigo
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Dark mode preference. When unset, the OS appearance hint decides.
    pub dark_mode: Option<bool>,
    pub theme_color: Option<ThemeColor>,
    pub text_direction: Option<TextDirection>,
}

/// Errors that can occur when loading the preference file from disk.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            })?;
            let config: Config =
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: config_path.to_path_buf(),
                    source,
                })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    /// Platform config file location, or `None` when no home directory can
    /// be determined (preferences then live for the session only).
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "edris", "edris")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
