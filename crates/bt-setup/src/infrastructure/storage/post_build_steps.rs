//! Registers the symbol upload command under `PostBuildSteps.Win64`.
//!
//! Any command left by an earlier run (current or legacy uploader name) is
//! removed before the fresh one is appended, so re-running setup never
//! accumulates duplicates. Commands belonging to other tools are kept in
//! their original order.

use std::path::PathBuf;

use bt_setup_core::domain::post_build::POST_BUILD_PLATFORM;
use bt_setup_core::{is_plugin_post_build_step, IntegrationConfig, PostBuildCommand};
use serde_json::{Map, Value};
use tracing::info;

use super::project_descriptor::{read_descriptor, write_descriptor, DescriptorError};

pub const POST_BUILD_STEPS_KEY: &str = "PostBuildSteps";

/// Replaces this plugin's commands for `platform` in `doc` with `command`.
///
/// Returns the number of stale commands removed.
///
/// # Errors
///
/// Returns a description of the problem when `doc`, `PostBuildSteps` or the
/// platform list has an unexpected JSON type.
pub fn inject_post_build_step(
    doc: &mut Value,
    platform: &str,
    command: &PostBuildCommand,
) -> Result<usize, String> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| "top level is not an object".to_string())?;

    let steps = root
        .entry(POST_BUILD_STEPS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| format!("`{POST_BUILD_STEPS_KEY}` is not an object"))?;

    let commands = steps
        .entry(platform)
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| format!("`{POST_BUILD_STEPS_KEY}.{platform}` is not an array"))?;

    let before = commands.len();
    commands.retain(|step| !step.as_str().is_some_and(is_plugin_post_build_step));
    let removed = before - commands.len();

    commands.push(Value::from(command.as_str()));
    Ok(removed)
}

/// Applies [`inject_post_build_step`] to a descriptor file.
#[derive(Debug, Clone)]
pub struct PostBuildStepInjector {
    path: PathBuf,
}

impl PostBuildStepInjector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Rewrites the descriptor's Win64 post-build steps for `config`.
    ///
    /// # Errors
    ///
    /// Same conditions as
    /// [`ProjectDescriptorSync::save`](super::project_descriptor::ProjectDescriptorSync::save).
    pub fn inject(&self, config: &IntegrationConfig) -> Result<usize, DescriptorError> {
        let mut doc = read_descriptor(&self.path)?;
        let command = PostBuildCommand::for_config(config);
        let removed = inject_post_build_step(&mut doc, POST_BUILD_PLATFORM, &command)
            .map_err(|reason| DescriptorError::Malformed {
                path: self.path.clone(),
                reason,
            })?;
        write_descriptor(&self.path, &doc)?;
        info!(path = %self.path.display(), removed, "registered post-build step");
        Ok(removed)
    }
}
