//! Points the engine's CrashReportClient at Backtrace.
//!
//! The engine reads the crash upload endpoint from
//! `[CrashReportClient] DataRouterUrl`. [`apply`] sets it to the URL built
//! from the config, optionally keeping the previous value in
//! `DataRouterUrlOld`; [`restore`] puts that value back.
//!
//! ```text
//! apply(preserve_old = true)          restore
//! ─────────────────────────           ───────────────────────
//! DataRouterUrl    = <backtrace>  ->  DataRouterUrl = <previous>
//! DataRouterUrlOld = <previous>       (DataRouterUrlOld removed)
//! ```

use std::path::Path;

use bt_setup_core::domain::router::{
    CLIENT_VERSION_KEY, CLIENT_VERSION_VALUE, CRASH_REPORT_SECTION, DATA_ROUTER_URL_KEY,
    DATA_ROUTER_URL_OLD_KEY,
};
use bt_setup_core::{build_router_url, IniDocument, IniError, IntegrationConfig};
use serde::Serialize;
use tracing::{debug, info};

use super::ini_file::{load_ini, save_ini, IniFileError};

/// What [`restore`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// `DataRouterUrl` was set back to the contained value.
    Restored(String),
    /// There was no previous value, so `DataRouterUrl` was removed.
    Removed,
    /// Neither key was present; nothing was written.
    NothingToDo,
}

/// The router keys currently stored in one INI file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouterState {
    pub url: Option<String>,
    pub old_url: Option<String>,
}

/// Sets the router URL in `doc`. Returns the URL written.
///
/// With `preserve_old`, an existing different URL is first copied to
/// `DataRouterUrlOld`.
pub fn apply_router_url(
    doc: &mut IniDocument,
    config: &IntegrationConfig,
    preserve_old: bool,
) -> Result<String, IniError> {
    let url = build_router_url(&config.realm, &config.token);

    if preserve_old {
        let previous = doc
            .get(CRASH_REPORT_SECTION, DATA_ROUTER_URL_KEY)
            .filter(|current| *current != url)
            .map(str::to_string);
        if let Some(previous) = previous {
            debug!(previous = %previous, "keeping previous router URL");
            doc.set(CRASH_REPORT_SECTION, DATA_ROUTER_URL_OLD_KEY, &previous)?;
        }
    }

    doc.set(CRASH_REPORT_SECTION, DATA_ROUTER_URL_KEY, &url)?;
    doc.set(CRASH_REPORT_SECTION, CLIENT_VERSION_KEY, CLIENT_VERSION_VALUE)?;
    Ok(url)
}

/// Undoes [`apply_router_url`] in `doc`.
pub fn restore_router_url(doc: &mut IniDocument) -> Result<RestoreOutcome, IniError> {
    let old = doc
        .get(CRASH_REPORT_SECTION, DATA_ROUTER_URL_OLD_KEY)
        .map(str::to_string);

    match old {
        Some(old) => {
            doc.set(CRASH_REPORT_SECTION, DATA_ROUTER_URL_KEY, &old)?;
            doc.remove(CRASH_REPORT_SECTION, DATA_ROUTER_URL_OLD_KEY);
            Ok(RestoreOutcome::Restored(old))
        }
        None if doc.remove(CRASH_REPORT_SECTION, DATA_ROUTER_URL_KEY) => {
            Ok(RestoreOutcome::Removed)
        }
        None => Ok(RestoreOutcome::NothingToDo),
    }
}

/// Reads the router keys of `doc`.
pub fn router_state(doc: &IniDocument) -> RouterState {
    RouterState {
        url: doc
            .get(CRASH_REPORT_SECTION, DATA_ROUTER_URL_KEY)
            .map(str::to_string),
        old_url: doc
            .get(CRASH_REPORT_SECTION, DATA_ROUTER_URL_OLD_KEY)
            .map(str::to_string),
    }
}

/// Applies the router URL to the INI file at `path`, creating it if needed.
///
/// # Errors
///
/// Returns [`IniFileError`] if the file cannot be read or written.
pub fn apply(
    path: &Path,
    config: &IntegrationConfig,
    preserve_old: bool,
) -> Result<String, IniFileError> {
    let mut doc = load_ini(path)?;
    let url = apply_router_url(&mut doc, config, preserve_old)?;
    save_ini(path, &doc)?;
    info!(path = %path.display(), preserve_old, "router URL set");
    Ok(url)
}

/// Restores the INI file at `path`. Writes only when something changed.
///
/// # Errors
///
/// Returns [`IniFileError`] if the file cannot be read or written.
pub fn restore(path: &Path) -> Result<RestoreOutcome, IniFileError> {
    if !path.exists() {
        debug!(path = %path.display(), "no INI file to restore");
        return Ok(RestoreOutcome::NothingToDo);
    }

    let mut doc = load_ini(path)?;
    let outcome = restore_router_url(&mut doc)?;
    if outcome != RestoreOutcome::NothingToDo {
        save_ini(path, &doc)?;
        info!(path = %path.display(), ?outcome, "router URL restored");
    }
    Ok(outcome)
}

/// Reads the router keys of the INI file at `path`.
pub fn read_router_state(path: &Path) -> Result<RouterState, IniFileError> {
    load_ini(path).map(|doc| router_state(&doc))
}
