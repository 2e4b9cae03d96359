//! Run settings loaded from a TOML file.
//!
//! # Configuration File Format
//!
//! ```toml
//! [main_setting]
//! move_from = "/home/me/Downloads"
//! move_to = "/home/me/Sorted"
//! name_fragment = "invoice, report, photo"
//! extensions = ".jpg, .pdf"
//!
//! [customize]
//! associative = 1
//! logging = 1
//! log_file = "FileManager.log"
//! ```
//!
//! `name_fragment` and `extensions` may also be written as TOML arrays.
//! Flags accept `true`/`false` or integers, where any non-zero value is true.

use crate::logging::Journal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched in the working directory and the user config directory.
pub const SETTINGS_FILE_NAME: &str = "setting.toml";

const DEFAULT_LOG_FILE: &str = "FileManager.log";

/// Errors that can occur while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No settings file was given and none was found in the default locations.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// IO error while reading the settings file.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
    /// `name_fragment` produced no usable fragment.
    #[error("Invalid configuration: name_fragment lists no fragments")]
    NoFragments,
    /// A fragment that would not name a single folder under the destination.
    #[error("Invalid configuration: fragment '{0}' must be a plain folder name")]
    InvalidFragment(String),
    /// A source or destination root does not exist.
    #[error("Missing {role} directory: {}", .path.display())]
    MissingDirectory { role: DirectoryRole, path: PathBuf },
}

/// Which configured root a path plays in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    Input,
    Output,
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryRole::Input => f.write_str("input"),
            DirectoryRole::Output => f.write_str("output"),
        }
    }
}

/// Complete settings for a run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub main_setting: MainSetting,
    #[serde(default)]
    pub customize: Customize,
}

/// Where files come from, where they go, and what to look for.
#[derive(Debug, Clone, Deserialize)]
pub struct MainSetting {
    pub move_from: PathBuf,
    pub move_to: PathBuf,
    /// Name fragments in match priority order.
    #[serde(deserialize_with = "deserialize_list")]
    pub name_fragment: Vec<String>,
    /// Parsed for compatibility. Categorization always uses the built-in table.
    #[serde(default, deserialize_with = "deserialize_list")]
    pub extensions: Vec<String>,
}

/// Optional behaviour switches.
#[derive(Debug, Clone, Deserialize)]
pub struct Customize {
    /// Sort into category folders inside each bucket. When false, files go
    /// straight into the bucket.
    #[serde(default = "default_associative", deserialize_with = "deserialize_flag")]
    pub associative: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub logging: bool,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_associative() -> bool {
    true
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

impl Default for Customize {
    fn default() -> Self {
        Self {
            associative: default_associative(),
            logging: false,
            log_file: default_log_file(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(value) => value,
        RawFlag::Int(value) => value != 0,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Joined(String),
    Items(Vec<String>),
}

fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawList::deserialize(deserializer) {
        Ok(RawList::Joined(joined)) => Ok(split_list(&joined)),
        Ok(RawList::Items(items)) => Ok(normalize_list(items)),
        Err(_) => Err(de::Error::custom(
            "expected a comma-separated string or an array of strings",
        )),
    }
}

/// Splits a comma-separated list. Spaces are removed everywhere, so
/// `"my report"` becomes `"myreport"`.
///
/// # Examples
///
/// ```
/// use fragsort::config::split_list;
///
/// assert_eq!(split_list(" invoice, report ,photo"), vec!["invoice", "report", "photo"]);
/// assert_eq!(split_list("a,,b,a"), vec!["a", "b"]);
/// ```
pub fn split_list(joined: &str) -> Vec<String> {
    normalize_list(joined.split(',').map(str::to_string))
}

/// Removes spaces, drops empty entries and keeps the first of any duplicates.
fn normalize_list(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for item in items {
        let cleaned: String = item.chars().filter(|c| *c != ' ').collect();
        if !cleaned.is_empty() && !result.contains(&cleaned) {
            result.push(cleaned);
        }
    }
    result
}

impl Settings {
    /// Load settings, searching the default locations when no path is given.
    ///
    /// Attempts to load settings in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `setting.toml` in the current directory
    /// 3. Look for `~/.config/fragsort/setting.toml` in home directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if no file can be found, and any
    /// error from [`Settings::load_from_file`].
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(SETTINGS_FILE_NAME);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("fragsort")
                .join(SETTINGS_FILE_NAME);
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Err(ConfigError::ConfigNotFound(local_config))
    }

    /// Load settings from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::IoError` if file cannot be read.
    /// Returns `ConfigError::ConfigInvalid` or `ConfigError::NoFragments` if
    /// the content is unusable.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        content.parse()
    }

    /// Name fragments in match priority order.
    pub fn fragments(&self) -> &[String] {
        &self.main_setting.name_fragment
    }

    pub fn source(&self) -> &Path {
        &self.main_setting.move_from
    }

    pub fn destination(&self) -> &Path {
        &self.main_setting.move_to
    }

    /// Checks that both roots exist before anything is touched.
    ///
    /// A missing root is logged through `journal` and returned as an error.
    pub fn validate_directories(&self, journal: &Journal) -> Result<(), ConfigError> {
        check_directory(self.source(), DirectoryRole::Input, journal)?;
        check_directory(self.destination(), DirectoryRole::Output, journal)
    }
}

impl std::str::FromStr for Settings {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;

        if settings.main_setting.name_fragment.is_empty() {
            return Err(ConfigError::NoFragments);
        }
        if let Some(bad) = settings
            .fragments()
            .iter()
            .find(|fragment| !is_plain_folder_name(fragment))
        {
            return Err(ConfigError::InvalidFragment(bad.clone()));
        }

        Ok(settings)
    }
}

/// A fragment names exactly one bucket folder directly under the destination.
fn is_plain_folder_name(fragment: &str) -> bool {
    fragment != "." && fragment != ".." && !fragment.contains(['/', '\\'])
}

fn check_directory(path: &Path, role: DirectoryRole, journal: &Journal) -> Result<(), ConfigError> {
    if path.is_dir() {
        return Ok(());
    }

    journal.error(format_args!("Missing {} directory: {}", role, path.display()));
    Err(ConfigError::MissingDirectory {
        role,
        path: path.to_path_buf(),
    })
}
