//! TOML settings for the `bt-setup` tool itself.
//!
//! Read from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\BacktraceSetup\config.toml`
//! - Linux:    `~/.config/bt-setup/config.toml`
//! - macOS:    `~/Library/Application Support/BacktraceSetup/config.toml`
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [paths]
//! global_ini = "D:/Users/me/Documents/Unreal Engine/Engine/Config/UserEngine.ini"
//! ```
//!
//! Every field has a serde default, so a missing file, a missing section or
//! a missing key all fall back to built-in values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for tool settings operations.
#[derive(Debug, Error)]
pub enum ToolSettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing tool settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse tool settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Schema ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolSettings {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub paths: PathSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathSettings {
    /// Overrides the default location of the user-wide `UserEngine.ini`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_ini: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the full path to the tool settings file.
///
/// # Errors
///
/// Returns [`ToolSettingsError::NoPlatformConfigDir`] if the base directory
/// cannot be determined.
pub fn tool_settings_path() -> Result<PathBuf, ToolSettingsError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ToolSettingsError::NoPlatformConfigDir)
}

/// Loads the tool settings from the platform config file.
pub fn load_tool_settings() -> Result<ToolSettings, ToolSettingsError> {
    load_tool_settings_from(&tool_settings_path()?)
}

/// Loads tool settings from `path`, returning defaults if it does not exist.
///
/// # Errors
///
/// Returns [`ToolSettingsError::Io`] for file-system errors other than "not
/// found", and [`ToolSettingsError::Parse`] if the TOML is malformed.
pub fn load_tool_settings_from(path: &Path) -> Result<ToolSettings, ToolSettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ToolSettings::default()),
        Err(source) => Err(ToolSettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("BacktraceSetup"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("bt-setup"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("BacktraceSetup")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_default_log_level_is_info() {
        assert_eq!(ToolSettings::default().logging.level, "info");
        assert!(ToolSettings::default().paths.global_ini.is_none());
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let settings: ToolSettings = toml::from_str("[paths]\nglobal_ini = \"/tmp/UserEngine.ini\"\n")
            .expect("parse");

        assert_eq!(settings.logging.level, "info");
        assert_eq!(
            settings.paths.global_ini,
            Some(PathBuf::from("/tmp/UserEngine.ini"))
        );
    }

    #[test]
    fn test_load_from_missing_file_returns_defaults() {
        let path = std::env::temp_dir().join(format!("bt_setup_missing_{}.toml", Uuid::new_v4()));

        let settings = load_tool_settings_from(&path).expect("load");

        assert_eq!(settings, ToolSettings::default());
    }

    #[test]
    fn test_load_from_file_reads_log_level() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("bt_setup_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        // Act
        let settings = load_tool_settings_from(&path).expect("load");

        // Assert
        assert_eq!(settings.logging.level, "debug");

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("bt_setup_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[logging\nlevel = ").unwrap();

        let result = load_tool_settings_from(&path);

        assert!(matches!(result, Err(ToolSettingsError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
