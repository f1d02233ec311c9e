//! [`SyncTarget`] over the files of one project.

use bt_setup_core::IntegrationConfig;

use crate::application::apply_settings::{IniScope, SyncError, SyncTarget};
use crate::infrastructure::paths::ProjectPaths;
use crate::infrastructure::storage::{
    first_run::{FirstRunState, StateError},
    ini_file::IniFileError,
    ini_router,
    plugin_settings::write_plugin_settings,
    post_build_steps::PostBuildStepInjector,
    project_descriptor::{DescriptorError, ProjectDescriptorSync},
    user_settings_header::{write_user_settings_header, HeaderError},
};

/// The stores of one project, addressed through [`ProjectPaths`].
pub struct ProjectWorkspace<'a> {
    paths: &'a ProjectPaths,
}

impl<'a> ProjectWorkspace<'a> {
    pub fn new(paths: &'a ProjectPaths) -> Self {
        Self { paths }
    }

    fn ini_path(&self, scope: IniScope) -> &std::path::Path {
        match scope {
            IniScope::Project => &self.paths.local_ini,
            IniScope::User => &self.paths.global_ini,
        }
    }
}

impl SyncTarget for ProjectWorkspace<'_> {
    fn save_descriptor(&mut self, config: &IntegrationConfig) -> Result<(), SyncError> {
        ProjectDescriptorSync::new(&self.paths.project_file)
            .save(config)
            .map_err(SyncError::from)
    }

    fn write_plugin_settings(&mut self, config: &IntegrationConfig) -> Result<(), SyncError> {
        write_plugin_settings(&self.paths.plugin_settings_ini, config).map_err(SyncError::from)
    }

    fn write_user_header(&mut self, config: &IntegrationConfig) -> Result<(), SyncError> {
        write_user_settings_header(&self.paths.user_header, config).map_err(SyncError::from)
    }

    fn apply_router(
        &mut self,
        scope: IniScope,
        config: &IntegrationConfig,
        preserve_old: bool,
    ) -> Result<(), SyncError> {
        ini_router::apply(self.ini_path(scope), config, preserve_old)
            .map(|_| ())
            .map_err(SyncError::from)
    }

    fn restore_router(&mut self, scope: IniScope) -> Result<(), SyncError> {
        ini_router::restore(self.ini_path(scope))
            .map(|_| ())
            .map_err(SyncError::from)
    }

    fn inject_post_build(&mut self, config: &IntegrationConfig) -> Result<(), SyncError> {
        PostBuildStepInjector::new(&self.paths.project_file)
            .inject(config)
            .map(|_| ())
            .map_err(SyncError::from)
    }

    fn set_first_run_finished(&mut self, finished: bool) -> Result<(), SyncError> {
        FirstRunState::new(&self.paths.state_file)
            .set_finished(finished)
            .map_err(SyncError::from)
    }
}

// ── Error mapping ─────────────────────────────────────────────────────────────

impl From<DescriptorError> for SyncError {
    fn from(e: DescriptorError) -> Self {
        match e {
            DescriptorError::Missing(_) | DescriptorError::Parse { .. } => {
                SyncError::Unreadable(e.to_string())
            }
            DescriptorError::Io { .. } | DescriptorError::Serialize(_) => {
                SyncError::Io(e.to_string())
            }
            DescriptorError::Malformed { .. } => SyncError::Malformed(e.to_string()),
        }
    }
}

impl From<IniFileError> for SyncError {
    fn from(e: IniFileError) -> Self {
        match e {
            IniFileError::Io { .. } => SyncError::Io(e.to_string()),
            IniFileError::Edit(_) => SyncError::Malformed(e.to_string()),
        }
    }
}

impl From<HeaderError> for SyncError {
    fn from(e: HeaderError) -> Self {
        SyncError::Io(e.to_string())
    }
}

impl From<StateError> for SyncError {
    fn from(e: StateError) -> Self {
        SyncError::Io(e.to_string())
    }
}
