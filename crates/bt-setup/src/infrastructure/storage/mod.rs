//! Storage infrastructure: the files the integration reads and writes.
//!
//! Each sub-module owns one store and its error type:
//!
//! - `project_descriptor` – the `Plugins` entry of the `.uproject` file.
//! - `post_build_steps` – the `PostBuildSteps.Win64` list of the same file.
//! - `ini_router` – `DataRouterUrl` in the engine INI files.
//! - `plugin_settings` – token and realm in `Config/DefaultPlugins.ini`.
//! - `user_settings_header` – the generated `BacktraceUserSettings.h`.
//! - `first_run` – the `backtrace_state.json` flag file.
//! - `tool_settings` – this tool's own TOML settings.
//!
//! Reads are forgiving (a missing file means defaults), writes always
//! report failure to the caller.

pub mod first_run;
pub mod ini_file;
pub mod ini_router;
pub mod json_file;
pub mod plugin_settings;
pub mod post_build_steps;
pub mod project_descriptor;
pub mod tool_settings;
pub mod user_settings_header;
