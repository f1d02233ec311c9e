//! Loading and saving [`IniDocument`]s on disk.

use std::path::{Path, PathBuf};

use bt_setup_core::{IniDocument, IniError};
use thiserror::Error;
use tracing::debug;

use super::json_file::write_creating_dirs;

/// Error type for INI file operations.
#[derive(Debug, Error)]
pub enum IniFileError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An edit was rejected by the document.
    #[error(transparent)]
    Edit(#[from] IniError),
}

/// Loads the INI file at `path`. A missing file yields an empty document.
///
/// # Errors
///
/// Returns [`IniFileError::Io`] for any failure other than "not found".
pub fn load_ini(path: &Path) -> Result<IniDocument, IniFileError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(IniDocument::parse(&text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "INI file missing; starting from an empty document");
            Ok(IniDocument::new())
        }
        Err(source) => Err(IniFileError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `doc` to `path`, creating parent directories as needed.
pub fn save_ini(path: &Path, doc: &IniDocument) -> Result<(), IniFileError> {
    write_creating_dirs(path, &doc.to_string()).map_err(|source| IniFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}
