//! Token and realm for the runtime settings object.
//!
//! The plugin's runtime module reads its upload target from the project's
//! `Config/DefaultPlugins.ini`:
//!
//! ```ini
//! [/Script/BacktraceSettingsLibrary.BacktraceSettings]
//! Token=<crash submission token>
//! Universe=<realm>
//! ```

use std::path::Path;

use bt_setup_core::{IniDocument, IniError, IntegrationConfig};
use tracing::info;

use super::ini_file::{load_ini, save_ini, IniFileError};

pub const SETTINGS_SECTION: &str = "/Script/BacktraceSettingsLibrary.BacktraceSettings";
pub const TOKEN_KEY: &str = "Token";
pub const UNIVERSE_KEY: &str = "Universe";

/// Writes token and realm into `doc`. Returns whether anything changed.
pub fn apply_plugin_settings(
    doc: &mut IniDocument,
    config: &IntegrationConfig,
) -> Result<bool, IniError> {
    let token_changed = doc.set(SETTINGS_SECTION, TOKEN_KEY, &config.token)?;
    let realm_changed = doc.set(SETTINGS_SECTION, UNIVERSE_KEY, &config.realm)?;
    Ok(token_changed || realm_changed)
}

/// Updates the plugin settings INI at `path`, creating it if needed.
pub fn write_plugin_settings(path: &Path, config: &IntegrationConfig) -> Result<(), IniFileError> {
    let mut doc = load_ini(path)?;
    let changed = apply_plugin_settings(&mut doc, config)?;
    save_ini(path, &doc)?;
    info!(path = %path.display(), changed, "plugin settings written");
    Ok(())
}
