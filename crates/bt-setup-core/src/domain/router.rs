//! Crash upload endpoint ("router URL") and where the engine reads it from.
//!
//! The engine's CrashReportClient posts dumps to the URL stored under
//! `[CrashReportClient] DataRouterUrl` in its INI configuration. Backtrace
//! accepts them at a URL derived from the instance realm and the crash
//! submission token.

/// INI section read by the engine's CrashReportClient.
pub const CRASH_REPORT_SECTION: &str = "CrashReportClient";
/// Key holding the active upload endpoint.
pub const DATA_ROUTER_URL_KEY: &str = "DataRouterUrl";
/// Key holding the endpoint that was active before this plugin overrode it.
///
/// Present only between an override and the matching restore.
pub const DATA_ROUTER_URL_OLD_KEY: &str = "DataRouterUrlOld";
/// Version marker key written alongside the URL.
pub const CLIENT_VERSION_KEY: &str = "CrashReportClientVersion";
/// Value written for [`CLIENT_VERSION_KEY`] (the engine renders `1.0` as `%f`).
pub const CLIENT_VERSION_VALUE: &str = "1.000000";

const ROUTER_URL_BASE: &str = "https://unreal.backtrace.io/post";

/// Builds the upload endpoint for `realm` and `token`.
///
/// Plain substitution: neither part is percent-encoded.
///
/// # Examples
///
/// ```rust
/// use bt_setup_core::build_router_url;
///
/// assert_eq!(
///     build_router_url("mygame", "abc123"),
///     "https://unreal.backtrace.io/post/mygame/abc123"
/// );
/// ```
pub fn build_router_url(realm: &str, token: &str) -> String {
    format!("{ROUTER_URL_BASE}/{realm}/{token}")
}
