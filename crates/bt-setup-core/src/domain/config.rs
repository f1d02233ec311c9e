//! The integration settings record.
//!
//! There is exactly one active [`IntegrationConfig`] per project. It starts
//! with placeholder values, is overwritten field by field from the project
//! descriptor when a matching plugin entry exists, edited through the setup
//! flow, and written back to every store when the user applies it.

use serde::Serialize;

/// Identifier of the plugin entry in the descriptor's `Plugins` array and
/// the directory name of the plugin under `<project>/Plugins/`.
pub const PLUGIN_NAME: &str = "BacktraceIntegration";

/// Realm shown before the user has entered their own instance.
pub const PLACEHOLDER_REALM: &str = "yourname";
/// Submission token shown before setup.
pub const PLACEHOLDER_TOKEN: &str = "your crash submission token";
/// Symbol upload token shown before setup.
pub const PLACEHOLDER_SYMBOLS_TOKEN: &str = "your symbols token";

/// Settings for the Backtrace crash-reporting integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationConfig {
    /// Crash submission token (authenticates dump uploads).
    pub token: String,
    /// Symbol upload token, distinct from the submission token.
    pub symbols_token: String,
    /// Backtrace instance sub-domain, e.g. `mygame` for `mygame.sp.backtrace.io`.
    pub realm: String,
    /// Backtrace project that receives the dumps.
    pub project_name: String,
    /// Upload symbols after non-shipping (debug) builds.
    pub send_debug_builds: bool,
    /// Upload symbols after shipping (release) builds.
    pub send_release_builds: bool,
    /// Also redirect the user-wide CrashReportClient configuration.
    pub override_global_reporter: bool,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            token: PLACEHOLDER_TOKEN.to_string(),
            symbols_token: PLACEHOLDER_SYMBOLS_TOKEN.to_string(),
            realm: PLACEHOLDER_REALM.to_string(),
            project_name: String::new(),
            send_debug_builds: false,
            send_release_builds: false,
            override_global_reporter: false,
        }
    }
}

impl IntegrationConfig {
    /// Returns `true` while the realm or token still hold the placeholder text.
    pub fn has_placeholders(&self) -> bool {
        self.realm == PLACEHOLDER_REALM || self.token == PLACEHOLDER_TOKEN
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
