//! Domain layer: the integration settings and the values derived from them.
//!
//! # Sub-modules
//!
//! - **`config`** – [`config::IntegrationConfig`], the single active settings
//!   record, with the placeholder values used before setup has run.
//! - **`router`** – the crash upload endpoint ("router URL") built from the
//!   realm and submission token, and the INI keys it is stored under.
//! - **`post_build`** – the command line the engine build system runs after
//!   compiling, used to upload debug symbols.
//! - **`setup_flow`** – the welcome wizard / settings dialog as an explicit
//!   state machine, independent of any UI toolkit.

pub mod config;
pub mod post_build;
pub mod router;
pub mod setup_flow;
