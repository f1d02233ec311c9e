//! Infrastructure layer for the setup tool.
//!
//! Contains the file-system adapters for every store the integration
//! owns, the path layout of an engine project, and the application
//! context that wires them to the `application` use cases.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `bt_setup_core`, but MUST NOT be imported by the `application` layer.

pub mod console;
pub mod context;
pub mod paths;
pub mod storage;
pub mod workspace;
