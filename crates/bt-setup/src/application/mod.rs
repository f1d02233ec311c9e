//! Application layer use cases for the setup tool.
//!
//! Use cases in this layer orchestrate the domain types from
//! `bt_setup_core` and talk to storage only through traits, so the order
//! and failure policy of a sync can be tested without touching a project
//! on disk.
//!
//! # Sub-modules
//!
//! - **`apply_settings`** – Persists an [`bt_setup_core::IntegrationConfig`]
//!   to every store the integration owns, in a fixed order, and reports
//!   each failure as a non-fatal notification instead of aborting.

pub mod apply_settings;
