//! ApplySettingsUseCase: writes the integration settings to every store.
//!
//! Pressing "Apply" (or running `bt-setup apply`) persists the config in this
//! fixed order:
//!
//! ```text
//! 1. SaveDescriptor        .uproject Plugins entry
//! 2. WritePluginSettings   Config/DefaultPlugins.ini
//! 3. WriteUserHeader       BacktraceUserSettings.h
//! 4. ApplyLocalRouter      Config/DefaultEngine.ini  (no preservation)
//! 5. ApplyGlobalRouter     UserEngine.ini            (preserve previous URL)
//!    or RestoreGlobalRouter                          (when not overriding)
//! 6. InjectPostBuild       .uproject PostBuildSteps
//! 7. MarkFirstRunFinished  backtrace_state.json
//! ```
//!
//! A failing step does not stop the ones after it. Every failure is recorded
//! in the returned [`SyncReport`] and sent to the [`Notifier`] as a warning,
//! so the user learns that a file was not written instead of the failure
//! disappearing into a log.

use std::fmt;

use bt_setup_core::IntegrationConfig;
use thiserror::Error;
use tracing::{info, warn};

/// Error type reported by a [`SyncTarget`] step.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyncError {
    /// A file the step edits in place does not exist or cannot be parsed.
    #[error("{0}")]
    Unreadable(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Malformed(String),
}

/// Which engine INI file a router step targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IniScope {
    /// `<project>/Config/DefaultEngine.ini`
    Project,
    /// The user-wide `UserEngine.ini`.
    User,
}

/// One step of the apply sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    SaveDescriptor,
    WritePluginSettings,
    WriteUserHeader,
    ApplyLocalRouter,
    ApplyGlobalRouter,
    RestoreGlobalRouter,
    InjectPostBuild,
    MarkFirstRunFinished,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncStep::SaveDescriptor => "save project descriptor",
            SyncStep::WritePluginSettings => "write plugin settings",
            SyncStep::WriteUserHeader => "write user settings header",
            SyncStep::ApplyLocalRouter => "set project crash report URL",
            SyncStep::ApplyGlobalRouter => "set user crash report URL",
            SyncStep::RestoreGlobalRouter => "restore user crash report URL",
            SyncStep::InjectPostBuild => "register post-build step",
            SyncStep::MarkFirstRunFinished => "record setup completion",
        };
        f.write_str(label)
    }
}

/// The stores an apply writes to.
///
/// Implemented over real files by
/// [`crate::infrastructure::workspace::ProjectWorkspace`].
#[cfg_attr(test, mockall::automock)]
pub trait SyncTarget {
    fn save_descriptor(&mut self, config: &IntegrationConfig) -> Result<(), SyncError>;
    fn write_plugin_settings(&mut self, config: &IntegrationConfig) -> Result<(), SyncError>;
    fn write_user_header(&mut self, config: &IntegrationConfig) -> Result<(), SyncError>;
    fn apply_router(
        &mut self,
        scope: IniScope,
        config: &IntegrationConfig,
        preserve_old: bool,
    ) -> Result<(), SyncError>;
    fn restore_router(&mut self, scope: IniScope) -> Result<(), SyncError>;
    fn inject_post_build(&mut self, config: &IntegrationConfig) -> Result<(), SyncError>;
    fn set_first_run_finished(&mut self, finished: bool) -> Result<(), SyncError>;
}

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// A non-fatal message for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    /// The step that produced the message, if any.
    pub step: Option<SyncStep>,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            step: None,
            message: message.into(),
        }
    }

    pub fn warning(step: Option<SyncStep>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            step,
            message: message.into(),
        }
    }
}

/// Receives notifications for display.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub step: SyncStep,
    pub result: Result<(), SyncError>,
}

/// Outcome of a full apply, one entry per executed step in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    steps: Vec<StepResult>,
}

impl SyncReport {
    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn executed(&self) -> Vec<SyncStep> {
        self.steps.iter().map(|s| s.step).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (SyncStep, &SyncError)> {
        self.steps
            .iter()
            .filter_map(|s| s.result.as_ref().err().map(|e| (s.step, e)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    fn record<N>(&mut self, step: SyncStep, result: Result<(), SyncError>, notifier: &N)
    where
        N: Notifier + ?Sized,
    {
        match &result {
            Ok(()) => info!(%step, "sync step completed"),
            Err(e) => {
                warn!(%step, error = %e, "sync step failed");
                notifier.notify(&Notification::warning(
                    Some(step),
                    format!("could not {step}: {e}"),
                ));
            }
        }
        self.steps.push(StepResult { step, result });
    }
}

/// Persists `config` to every store of `target`.
///
/// See the module documentation for the step order. The user-wide INI is
/// only redirected when `config.override_global_reporter` is set; otherwise
/// any earlier redirect there is undone.
pub fn apply_settings<T, N>(target: &mut T, config: &IntegrationConfig, notifier: &N) -> SyncReport
where
    T: SyncTarget + ?Sized,
    N: Notifier + ?Sized,
{
    let mut report = SyncReport::default();

    let result = target.save_descriptor(config);
    report.record(SyncStep::SaveDescriptor, result, notifier);

    let result = target.write_plugin_settings(config);
    report.record(SyncStep::WritePluginSettings, result, notifier);

    let result = target.write_user_header(config);
    report.record(SyncStep::WriteUserHeader, result, notifier);

    let result = target.apply_router(IniScope::Project, config, false);
    report.record(SyncStep::ApplyLocalRouter, result, notifier);

    if config.override_global_reporter {
        let result = target.apply_router(IniScope::User, config, true);
        report.record(SyncStep::ApplyGlobalRouter, result, notifier);
    } else {
        let result = target.restore_router(IniScope::User);
        report.record(SyncStep::RestoreGlobalRouter, result, notifier);
    }

    let result = target.inject_post_build(config);
    report.record(SyncStep::InjectPostBuild, result, notifier);

    let result = target.set_first_run_finished(true);
    report.record(SyncStep::MarkFirstRunFinished, result, notifier);

    if report.is_success() {
        notifier.notify(&Notification::info("Backtrace settings applied"));
    }
    report
}

// ── Tests ─────────────────────────────────────────────────────────────────────
