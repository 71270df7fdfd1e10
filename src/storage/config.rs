//! Project and user configuration
//!
//! `.party/config.toml` decides how new characters are rolled and what
//! `party list` shows by default. The user's `config.toml` in the platform
//! config directory (`~/.config/party-roster/` on Linux) picks the output
//! format. Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Category, LevelRange, RosterFilter, SortKey};

/// Environment variable naming an explicit project root
pub const PROJECT_DIR_ENV: &str = "PARTY_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// `[levels]` as written; checked when converted to a [`LevelRange`]
#[derive(Debug, Deserialize)]
#[serde(default)]
struct LevelsTable {
    min: u32,
    max: u32,
}

impl Default for LevelsTable {
    fn default() -> Self {
        let range = LevelRange::default();
        Self {
            min: range.min(),
            max: range.max(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectFile {
    default_category: Category,
    default_filter: RosterFilter,
    default_sort: SortKey,
    levels: LevelsTable,
}

/// Validated project settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Class used by `party add` when none is given
    pub default_category: Category,

    /// Filter used by `party list` when none is given
    pub default_filter: RosterFilter,

    /// Sort key used by `party list` when none is given
    pub default_sort: SortKey,

    /// Range new character levels are rolled from
    pub levels: LevelRange,
}

impl TryFrom<ProjectFile> for ProjectConfig {
    type Error = ConfigError;

    fn try_from(file: ProjectFile) -> Result<Self, ConfigError> {
        let LevelsTable { min, max } = file.levels;
        let levels = LevelRange::new(min, max).map_err(|_| {
            ConfigError::Invalid(format!(
                "levels.min ({}) must not exceed levels.max ({})",
                min, max
            ))
        })?;

        Ok(Self {
            default_category: file.default_category,
            default_filter: file.default_filter,
            default_sort: file.default_sort,
            levels,
        })
    }
}

impl ProjectConfig {
    /// Parses and validates `config.toml` text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ProjectFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.try_into()
    }

    /// Reads `config.toml` from a `.party` directory, defaulting when absent
    pub fn load(party_dir: &Path) -> Result<Self> {
        let path = party_dir.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read project config: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to load project config: {}", path.display()))
    }
}

/// Per-user settings shared by every roster
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Output format used when `--format` is not given
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl UserConfig {
    /// Location of the user config file, if the platform has a config dir
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "party", "party-roster")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads the user config, defaulting when there is none
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read user config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to load user config: {}", path.display()))
    }
}

/// Finds the roster project: `PARTY_DIR` if set, else the nearest ancestor
/// of the current directory holding `.party/`
pub fn find_project_root() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(PROJECT_DIR_ENV) {
        let root = PathBuf::from(dir);
        return root.join(".party").is_dir().then_some(root);
    }

    let current = std::env::current_dir().ok()?;
    find_project_root_from(&current)
}

/// Nearest of `start` and its ancestors that holds a `.party/` directory
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".party").is_dir())
        .map(Path::to_path_buf)
}
