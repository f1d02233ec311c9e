//! # bt-setup-core
//!
//! Shared library for the Backtrace crash-reporting integration setup.
//! It holds the configuration record, the derived values written into the
//! project (router URL, post-build command), the setup flow state machine
//! and an INI codec.
//!
//! This crate performs no file-system access. Reading and writing the
//! project files is the job of the `bt-setup` crate, which feeds the
//! documents it loads through the types defined here.
//!
//! # Architecture overview
//!
//! An Unreal Engine project reports crashes through the engine's
//! CrashReportClient. Pointing that client at Backtrace means keeping three
//! stores in agreement:
//!
//! - the `.uproject` descriptor (a `Plugins` entry and a post-build step),
//! - one or two engine INI files (`DataRouterUrl`),
//! - a small first-run state file next to the plugin.
//!
//! The modules here are:
//!
//! - **`domain`** – the [`IntegrationConfig`] record and everything computed
//!   from it, plus the [`SetupFlow`] wizard.
//! - **`ini`** – a line-preserving [`IniDocument`] so edits to engine config
//!   files leave unrelated lines exactly as they were.

pub mod domain;
pub mod ini;

pub use domain::config::{IntegrationConfig, PLUGIN_NAME};
pub use domain::post_build::{is_plugin_post_build_step, PostBuildCommand};
pub use domain::router::build_router_url;
pub use domain::setup_flow::{
    FlowError, FlowOutcome, FlowState, SetupAction, SetupFlow, SetupStep, SummaryForm,
};
pub use ini::document::{IniDocument, IniError};
