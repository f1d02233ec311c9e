//! Generated `BacktraceUserSettings.h`.
//!
//! The blueprint library compiles the token and realm in as string
//! literals. The header is regenerated on every apply.

use std::path::{Path, PathBuf};

use bt_setup_core::IntegrationConfig;
use thiserror::Error;
use tracing::info;

use super::json_file::write_creating_dirs;

/// Error type for header generation.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// A file system I/O error occurred.
    #[error("I/O error writing header {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders the header for `config`.
pub fn render_header(config: &IntegrationConfig) -> String {
    format!(
        "#pragma once\n\n#define BACKTRACE_TOKEN \"{}\"\n#define BACKTRACE_REALM \"{}\"\n",
        escape_c_string(&config.token),
        escape_c_string(&config.realm),
    )
}

/// Writes the header for `config` to `path`.
pub fn write_user_settings_header(
    path: &Path,
    config: &IntegrationConfig,
) -> Result<(), HeaderError> {
    write_creating_dirs(path, &render_header(config)).map_err(|source| HeaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "user settings header written");
    Ok(())
}

fn escape_c_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
