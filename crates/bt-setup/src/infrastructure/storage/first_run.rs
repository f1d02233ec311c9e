//! First-run flag stored in `Plugins/BacktraceIntegration/backtrace_state.json`.
//!
//! ```json
//! { "FirstRunFinished": true }
//! ```
//!
//! Anything short of a readable object with a boolean flag counts as a
//! first run.

use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use super::json_file::{to_engine_json, write_creating_dirs};

pub const FIRST_RUN_FINISHED_KEY: &str = "FirstRunFinished";

/// Error type for the state file.
#[derive(Debug, Error)]
pub enum StateError {
    /// A file system I/O error occurred.
    #[error("I/O error writing state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct FirstRunState {
    path: PathBuf,
}

impl FirstRunState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `true` unless the state file records a finished setup.
    pub fn is_first_run(&self) -> bool {
        let finished = self
            .read_object()
            .and_then(|obj| obj.get(FIRST_RUN_FINISHED_KEY).and_then(Value::as_bool));
        debug!(path = %self.path.display(), ?finished, "read first-run flag");
        !finished.unwrap_or(false)
    }

    /// Records whether setup has finished, keeping any other keys in the file.
    pub fn set_finished(&self, finished: bool) -> Result<(), StateError> {
        let mut obj = self.read_object().unwrap_or_default();
        obj.insert(FIRST_RUN_FINISHED_KEY.to_string(), Value::Bool(finished));

        let text = to_engine_json(&Value::Object(obj))?;
        write_creating_dirs(&self.path, &text).map_err(|source| StateError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), finished, "first-run flag written");
        Ok(())
    }

    fn read_object(&self) -> Option<Map<String, Value>> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&text).ok()? {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("bt-setup-state-{}", uuid::Uuid::new_v4()))
            .join("backtrace_state.json")
    }

    #[test]
    fn test_missing_file_is_first_run() {
        let state = FirstRunState::new(temp_state_path());

        assert!(state.is_first_run());
    }

    #[test]
    fn test_unparsable_file_is_first_run() {
        let path = temp_state_path();
        write_creating_dirs(&path, "{ not json").expect("seed");

        assert!(FirstRunState::new(&path).is_first_run());
    }

    #[test]
    fn test_non_boolean_flag_is_first_run() {
        let path = temp_state_path();
        write_creating_dirs(&path, r#"{ "FirstRunFinished": "yes" }"#).expect("seed");

        assert!(FirstRunState::new(&path).is_first_run());
    }

    #[test]
    fn test_set_finished_keeps_other_keys() {
        // Arrange
        let path = temp_state_path();
        write_creating_dirs(&path, r#"{ "Extra": 1, "FirstRunFinished": false }"#).expect("seed");
        let state = FirstRunState::new(&path);

        // Act
        state.set_finished(true).expect("set");

        // Assert
        assert!(!state.is_first_run());
        let text = std::fs::read_to_string(&path).expect("read");
        let value: Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(value["Extra"], 1);
        assert_eq!(value["FirstRunFinished"], true);
    }

    #[test]
    fn test_set_finished_false_makes_next_run_first_run_again() {
        let state = FirstRunState::new(temp_state_path());

        state.set_finished(true).expect("finish");
        state.set_finished(false).expect("reset");

        assert!(state.is_first_run());
    }
}
