//! Location of every file the integration touches.
//!
//! All project files hang off the directory holding the `.uproject`:
//!
//! ```text
//! <project>/
//!  ├─ Shooter.uproject                       descriptor + post-build steps
//!  ├─ Config/DefaultEngine.ini               project router URL
//!  ├─ Config/DefaultPlugins.ini              runtime plugin settings
//!  └─ Plugins/BacktraceIntegration/
//!      ├─ backtrace_state.json               first-run flag
//!      └─ Source/BacktraceBlueprintLibrary/Private/BacktraceUserSettings.h
//! ```
//!
//! The user-wide `UserEngine.ini` lives under the user's documents folder.

use std::fs;
use std::path::{Path, PathBuf};

use bt_setup_core::PLUGIN_NAME;
use thiserror::Error;

const PROJECT_EXTENSION: &str = "uproject";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("project path {0} does not exist")]
    NotFound(PathBuf),

    #[error("no .uproject file in {0}")]
    NoProjectFile(PathBuf),

    #[error("{count} .uproject files in {dir}; pass the one to configure")]
    AmbiguousProjectFile { dir: PathBuf, count: usize },

    #[error("could not determine the user profile directory (USERPROFILE / HOME unset)")]
    NoUserProfile,

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every path used by one sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub project_file: PathBuf,
    pub project_dir: PathBuf,
    pub local_ini: PathBuf,
    pub plugin_settings_ini: PathBuf,
    pub state_file: PathBuf,
    pub user_header: PathBuf,
    pub global_ini: PathBuf,
}

impl ProjectPaths {
    /// Derives the project paths from a `.uproject` file.
    pub fn from_project_file(project_file: PathBuf, global_ini: PathBuf) -> Self {
        let project_dir = project_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let plugin_dir = project_dir.join("Plugins").join(PLUGIN_NAME);

        Self {
            local_ini: project_dir.join("Config").join("DefaultEngine.ini"),
            plugin_settings_ini: project_dir.join("Config").join("DefaultPlugins.ini"),
            state_file: plugin_dir.join("backtrace_state.json"),
            user_header: plugin_dir
                .join("Source")
                .join("BacktraceBlueprintLibrary")
                .join("Private")
                .join("BacktraceUserSettings.h"),
            project_file,
            project_dir,
            global_ini,
        }
    }

    /// Resolves `project` (a `.uproject` file or its directory).
    ///
    /// `global_ini` overrides [`default_global_ini`].
    pub fn resolve(project: &Path, global_ini: Option<PathBuf>) -> Result<Self, PathError> {
        if !project.exists() {
            return Err(PathError::NotFound(project.to_path_buf()));
        }
        let project_file = if project.is_dir() {
            find_project_file(project)?
        } else {
            project.to_path_buf()
        };
        let global_ini = match global_ini {
            Some(path) => path,
            None => default_global_ini()?,
        };
        Ok(Self::from_project_file(project_file, global_ini))
    }
}

/// Finds the single `.uproject` file directly inside `dir`.
pub fn find_project_file(dir: &Path) -> Result<PathBuf, PathError> {
    let entries = fs::read_dir(dir).map_err(|source| PathError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == PROJECT_EXTENSION))
        .collect();

    match found.len() {
        0 => Err(PathError::NoProjectFile(dir.to_path_buf())),
        1 => Ok(found.remove(0)),
        count => Err(PathError::AmbiguousProjectFile {
            dir: dir.to_path_buf(),
            count,
        }),
    }
}

/// `<profile>/Documents/Unreal Engine/Engine/Config/UserEngine.ini`.
pub fn default_global_ini() -> Result<PathBuf, PathError> {
    let profile = std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .ok_or(PathError::NoUserProfile)?;
    Ok(global_ini_under(Path::new(&profile)))
}

fn global_ini_under(profile: &Path) -> PathBuf {
    profile
        .join("Documents")
        .join("Unreal Engine")
        .join("Engine")
        .join("Config")
        .join("UserEngine.ini")
}
