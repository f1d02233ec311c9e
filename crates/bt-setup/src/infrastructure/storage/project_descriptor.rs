//! Project descriptor persistence: the integration's `Plugins` entry.
//!
//! An engine project descriptor (`<Name>.uproject`) is a JSON document. The
//! integration keeps its settings in the `Plugins` array, on the entry whose
//! `Name` is [`PLUGIN_NAME`]:
//!
//! ```json
//! "Plugins": [
//!     {
//!         "Name": "BacktraceIntegration",
//!         "Enabled": true,
//!         "Token": "...",
//!         "SymbolsToken": "...",
//!         "Realm": "mystudio",
//!         "ProjectName": "shooter",
//!         "SendReleasePdb": false,
//!         "SendDebugPdb": false,
//!         "OverrideGlobalReporter": false
//!     }
//! ]
//! ```
//!
//! Every other key of the document is carried through a load/save cycle
//! unchanged, in its original order.

use std::path::{Path, PathBuf};

use bt_setup_core::{IntegrationConfig, PLUGIN_NAME};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::json_file::{to_engine_json, write_creating_dirs};

pub const PLUGINS_KEY: &str = "Plugins";
pub const NAME_KEY: &str = "Name";

const TOKEN_KEY: &str = "Token";
const SYMBOLS_TOKEN_KEY: &str = "SymbolsToken";
const REALM_KEY: &str = "Realm";
const PROJECT_NAME_KEY: &str = "ProjectName";
const SEND_RELEASE_KEY: &str = "SendReleasePdb";
const SEND_DEBUG_KEY: &str = "SendDebugPdb";
const OVERRIDE_GLOBAL_KEY: &str = "OverrideGlobalReporter";

/// Error type for project descriptor operations.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor does not exist. It is never created from scratch.
    #[error("project descriptor {0} does not exist")]
    Missing(PathBuf),

    /// A file system I/O error occurred.
    #[error("I/O error accessing project descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse project descriptor {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is valid but a collection has an unexpected type.
    #[error("project descriptor {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// The updated document could not be rendered.
    #[error("failed to serialize project descriptor: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of [`ProjectDescriptorSync::load`].
#[derive(Debug)]
pub struct LoadOutcome {
    /// The base config with every field found in the descriptor applied.
    pub config: IntegrationConfig,
    /// Whether a `Plugins` entry named [`PLUGIN_NAME`] was found.
    pub entry_found: bool,
    /// Set when the descriptor loaded but writing the normalised form failed.
    pub normalize_error: Option<DescriptorError>,
}

// ── Document operations ───────────────────────────────────────────────────────

/// Overwrites each field of `config` that is present, with the right type,
/// on the plugin entry of `doc`.
///
/// Returns `None` when `doc` has no `Plugins` array, otherwise whether the
/// entry was found.
pub fn read_plugin_entry(doc: &Value, config: &mut IntegrationConfig) -> Option<bool> {
    let plugins = doc.get(PLUGINS_KEY)?.as_array()?;
    let Some(entry) = plugins.iter().find(|p| is_plugin_entry(p)) else {
        return Some(false);
    };

    let string_field = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);
    let bool_field = |key: &str| entry.get(key).and_then(Value::as_bool);

    if let Some(v) = string_field(TOKEN_KEY) {
        config.token = v;
    }
    if let Some(v) = string_field(SYMBOLS_TOKEN_KEY) {
        config.symbols_token = v;
    }
    if let Some(v) = string_field(REALM_KEY) {
        config.realm = v;
    }
    if let Some(v) = string_field(PROJECT_NAME_KEY) {
        config.project_name = v;
    }
    if let Some(v) = bool_field(SEND_DEBUG_KEY) {
        config.send_debug_builds = v;
    }
    if let Some(v) = bool_field(SEND_RELEASE_KEY) {
        config.send_release_builds = v;
    }
    if let Some(v) = bool_field(OVERRIDE_GLOBAL_KEY) {
        config.override_global_reporter = v;
    }
    Some(true)
}

/// Ensures `doc` has a plugin entry, then writes every field of `config` to it.
///
/// # Errors
///
/// Returns a description of the problem when `doc` is not an object, when
/// `Plugins` is not an array, or when the existing entry is not an object.
pub fn write_plugin_entry(doc: &mut Value, config: &IntegrationConfig) -> Result<(), String> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| "top level is not an object".to_string())?;

    let plugins = root
        .entry(PLUGINS_KEY)
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| format!("`{PLUGINS_KEY}` is not an array"))?;

    let index = match plugins.iter().position(is_plugin_entry) {
        Some(i) => i,
        None => {
            let mut entry = Map::new();
            entry.insert(NAME_KEY.to_string(), Value::from(PLUGIN_NAME));
            plugins.push(Value::Object(entry));
            plugins.len() - 1
        }
    };

    let entry = plugins[index]
        .as_object_mut()
        .ok_or_else(|| format!("`{PLUGIN_NAME}` entry is not an object"))?;
    entry.insert(TOKEN_KEY.to_string(), Value::from(config.token.as_str()));
    entry.insert(
        SYMBOLS_TOKEN_KEY.to_string(),
        Value::from(config.symbols_token.as_str()),
    );
    entry.insert(REALM_KEY.to_string(), Value::from(config.realm.as_str()));
    entry.insert(
        PROJECT_NAME_KEY.to_string(),
        Value::from(config.project_name.as_str()),
    );
    entry.insert(
        SEND_RELEASE_KEY.to_string(),
        Value::from(config.send_release_builds),
    );
    entry.insert(SEND_DEBUG_KEY.to_string(), Value::from(config.send_debug_builds));
    entry.insert(
        OVERRIDE_GLOBAL_KEY.to_string(),
        Value::from(config.override_global_reporter),
    );
    Ok(())
}

fn is_plugin_entry(entry: &Value) -> bool {
    entry.get(NAME_KEY).and_then(Value::as_str) == Some(PLUGIN_NAME)
}

// ── File adapter ──────────────────────────────────────────────────────────────

/// Reads a descriptor file into a JSON value.
///
/// Shared with the post-build step adapter, which edits the same file.
pub(crate) fn read_descriptor(path: &Path) -> Result<Value, DescriptorError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DescriptorError::Missing(path.to_path_buf())
        } else {
            DescriptorError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| DescriptorError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders `doc` and writes it back to `path`.
pub(crate) fn write_descriptor(path: &Path, doc: &Value) -> Result<(), DescriptorError> {
    let text = to_engine_json(doc)?;
    write_creating_dirs(path, &text).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Keeps the plugin entry of one `.uproject` file in sync with a config.
#[derive(Debug, Clone)]
pub struct ProjectDescriptorSync {
    path: PathBuf,
}

impl ProjectDescriptorSync {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Applies the stored plugin entry on top of `base`.
    ///
    /// Never fails: a missing or unparsable descriptor, or one without a
    /// `Plugins` array, yields `base` unchanged. When the descriptor does
    /// have a `Plugins` array it is immediately re-saved so the plugin entry
    /// exists from then on; a failure of that write is returned in
    /// [`LoadOutcome::normalize_error`].
    pub fn load(&self, base: IntegrationConfig) -> LoadOutcome {
        let (config, entry_found) = self.read_entry(base);
        let Some(entry_found) = entry_found else {
            return LoadOutcome {
                config,
                entry_found: false,
                normalize_error: None,
            };
        };

        let normalize_error = self.save(&config).err();
        if let Some(e) = &normalize_error {
            warn!(path = %self.path.display(), error = %e, "could not normalize descriptor");
        }

        LoadOutcome {
            config,
            entry_found,
            normalize_error,
        }
    }

    /// Like [`load`](Self::load) but never writes the descriptor.
    pub fn read(&self, base: IntegrationConfig) -> LoadOutcome {
        let (config, entry_found) = self.read_entry(base);
        LoadOutcome {
            config,
            entry_found: entry_found.unwrap_or(false),
            normalize_error: None,
        }
    }

    /// Returns the merged config and, when the descriptor has a `Plugins`
    /// array, whether the plugin entry was in it.
    fn read_entry(&self, base: IntegrationConfig) -> (IntegrationConfig, Option<bool>) {
        let mut config = base;
        let doc = match read_descriptor(&self.path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "using default settings");
                return (config, None);
            }
        };

        let entry_found = read_plugin_entry(&doc, &mut config);
        match entry_found {
            Some(found) => {
                debug!(path = %self.path.display(), entry_found = found, "loaded plugin entry")
            }
            None => debug!(path = %self.path.display(), "descriptor has no Plugins array"),
        }
        (config, entry_found)
    }

    /// Writes every field of `config` to the plugin entry, creating the
    /// entry (and the `Plugins` array) when missing.
    ///
    /// # Errors
    ///
    /// - [`DescriptorError::Missing`] if the descriptor does not exist.
    /// - [`DescriptorError::Parse`] / [`DescriptorError::Malformed`] if it
    ///   cannot be edited; the file is left untouched.
    /// - [`DescriptorError::Io`] if it cannot be read or written.
    pub fn save(&self, config: &IntegrationConfig) -> Result<(), DescriptorError> {
        let mut doc = read_descriptor(&self.path)?;
        write_plugin_entry(&mut doc, config).map_err(|reason| DescriptorError::Malformed {
            path: self.path.clone(),
            reason,
        })?;
        write_descriptor(&self.path, &doc)?;
        info!(path = %self.path.display(), "saved plugin entry");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
