//! Explicit application context.
//!
//! One [`AppContext`] exists per configured project. The host (here the CLI)
//! creates it with [`AppContext::init`], drives setup through it and ends it
//! with [`AppContext::shutdown`]. Nothing is kept in global state.
//!
//! # Lifecycle
//!
//! ```text
//! init()  ── load descriptor entry over the placeholder defaults
//!   │        read the first-run flag
//!   │        (inspect() does the same without normalising the descriptor)
//!   ▼
//! begin_setup() ── wizard on first run, settings dialog afterwards
//!   │
//!   ▼
//! finish_setup() / apply() ── run the ordered sync, report failures
//!   │
//!   ▼
//! shutdown()
//! ```

use bt_setup_core::{FlowOutcome, IntegrationConfig, SetupFlow};
use tracing::{info, warn};

use crate::application::apply_settings::{apply_settings, Notification, Notifier, SyncReport};
use crate::infrastructure::paths::ProjectPaths;
use crate::infrastructure::storage::first_run::FirstRunState;
use crate::infrastructure::storage::project_descriptor::{LoadOutcome, ProjectDescriptorSync};
use crate::infrastructure::workspace::ProjectWorkspace;

/// Shared state of one setup session.
pub struct AppContext<N: Notifier> {
    paths: ProjectPaths,
    config: IntegrationConfig,
    first_run: bool,
    entry_found: bool,
    notifier: N,
}

impl<N: Notifier> AppContext<N> {
    /// Loads the stored settings for the project at `paths`.
    ///
    /// A failure to normalise the descriptor is passed to `notifier` as a
    /// warning; the loaded settings are still used.
    pub fn init(paths: ProjectPaths, notifier: N) -> Self {
        let outcome = ProjectDescriptorSync::new(&paths.project_file)
            .load(IntegrationConfig::default());
        if let Some(e) = &outcome.normalize_error {
            notifier.notify(&Notification::warning(
                None,
                format!("could not update the project descriptor: {e}"),
            ));
        }

        Self::from_outcome(paths, outcome, notifier)
    }

    /// Loads the stored settings without writing to any project file.
    pub fn inspect(paths: ProjectPaths, notifier: N) -> Self {
        let outcome = ProjectDescriptorSync::new(&paths.project_file)
            .read(IntegrationConfig::default());
        Self::from_outcome(paths, outcome, notifier)
    }

    fn from_outcome(paths: ProjectPaths, outcome: LoadOutcome, notifier: N) -> Self {
        let first_run = FirstRunState::new(&paths.state_file).is_first_run();
        info!(
            project = %paths.project_file.display(),
            first_run,
            entry_found = outcome.entry_found,
            "setup context initialised"
        );

        Self {
            paths,
            config: outcome.config,
            first_run,
            entry_found: outcome.entry_found,
            notifier,
        }
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    /// Whether the descriptor already had a plugin entry when loaded.
    pub fn entry_found(&self) -> bool {
        self.entry_found
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Starts the wizard on a first run, otherwise the settings dialog.
    pub fn begin_setup(&self) -> SetupFlow {
        SetupFlow::begin(self.first_run, self.config.clone())
    }

    /// Applies the result of a finished flow. Returns `None` when the flow
    /// was cancelled or is still running.
    pub fn finish_setup(&mut self, flow: SetupFlow) -> Option<SyncReport> {
        match flow.outcome() {
            Some(FlowOutcome::Applied) => Some(self.apply(flow.into_config())),
            Some(FlowOutcome::Cancelled) => {
                info!("setup cancelled; nothing written");
                None
            }
            None => {
                warn!(step = ?flow.step(), "setup flow not finished; nothing written");
                None
            }
        }
    }

    /// Makes `config` current and writes it to every store.
    pub fn apply(&mut self, config: IntegrationConfig) -> SyncReport {
        if config.has_placeholders() {
            self.notifier.notify(&Notification::warning(
                None,
                "realm or token still hold placeholder values",
            ));
        }
        self.config = config;

        let mut workspace = ProjectWorkspace::new(&self.paths);
        let report = apply_settings(&mut workspace, &self.config, &self.notifier);
        if report.is_success() {
            self.first_run = false;
        }
        report
    }

    pub fn shutdown(self) {
        info!(project = %self.paths.project_file.display(), "setup context closed");
    }
}
