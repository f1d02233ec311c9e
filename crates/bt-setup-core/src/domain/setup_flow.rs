//! Setup flow: the first-run welcome wizard and the settings dialog.
//!
//! Both entry points share one state machine. A first run walks every step;
//! later runs jump straight to the summary screen, which doubles as the
//! settings dialog.
//!
//! ```text
//!             HaveAccount           SubmitInstance          SubmitToken
//!  Welcome ──────────────► Instance ─────────────► SubmissionToken ─────────► SymbolsToken
//!     ▲          Back         │  ▲       Back            │   ▲      Back          │
//!     └───────────────────────┘  └───────────────────────┘   └────────────────────┘
//!                                                     SubmitSymbolsToken / Skip │
//!                                                                               ▼
//!  (settings dialog entry) ─────────────────────────────────────────────────► Summary
//!                                                                   Apply │  │ Cancel
//!                                                                         ▼  ▼
//!                                                                 Applied    Cancelled
//! ```
//!
//! The flow owns the [`IntegrationConfig`] being edited. Each submitting
//! action writes its fields into it; the caller takes the config back with
//! [`SetupFlow::into_config`] once the flow reports
//! [`FlowOutcome::Applied`] and persists it. `Cancel` is accepted from every
//! step, like closing the window.

use thiserror::Error;
use tracing::debug;

use crate::domain::config::IntegrationConfig;

const DOCUMENTATION_URL: &str = "https://documentation.backtrace.io/product_integration_ue4/";
const CREATE_ACCOUNT_URL: &str = "https://backtrace.io/createue4marketplace/";

/// One screen of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupStep {
    /// Step 0: introduction, "I have an account" / "Create an account".
    Welcome,
    /// Step 1: instance sub-domain (realm) and project name.
    Instance,
    /// Step 2: crash submission token.
    SubmissionToken,
    /// Step 3: symbol upload token (may be skipped).
    SymbolsToken,
    /// Step 4: every setting at once; also the settings dialog.
    Summary,
}

impl SetupStep {
    /// Zero-based position of the step in the wizard.
    pub fn index(self) -> u8 {
        match self {
            SetupStep::Welcome => 0,
            SetupStep::Instance => 1,
            SetupStep::SubmissionToken => 2,
            SetupStep::SymbolsToken => 3,
            SetupStep::Summary => 4,
        }
    }

    /// Progress label shown on the data-entry steps ("Step 1 of 3.").
    pub fn progress_label(self) -> Option<String> {
        match self {
            SetupStep::Instance | SetupStep::SubmissionToken | SetupStep::SymbolsToken => {
                Some(format!("Step {} of 3.", self.index()))
            }
            SetupStep::Welcome | SetupStep::Summary => None,
        }
    }

    /// Web page that helps the user complete this step, if it has one.
    ///
    /// The token pages live on the user's own instance, so they are built
    /// from the realm and project name entered so far.
    pub fn help_link(self, config: &IntegrationConfig) -> Option<String> {
        let realm = &config.realm;
        let project = &config.project_name;
        match self {
            SetupStep::Welcome => Some(DOCUMENTATION_URL.to_string()),
            SetupStep::Instance => None,
            SetupStep::SubmissionToken => Some(format!(
                "https://{realm}.sp.backtrace.io/config/{realm}/projects/{project}/tokens"
            )),
            SetupStep::SymbolsToken => Some(format!(
                "https://{realm}.sp.backtrace.io/config/{realm}/projects/{project}/symbol-access-tokens"
            )),
            SetupStep::Summary => Some(format!("https://{realm}.sp.backtrace.io/")),
        }
    }

    /// Sign-up page offered next to "I have an account" on the welcome screen.
    pub fn create_account_link(self) -> Option<&'static str> {
        match self {
            SetupStep::Welcome => Some(CREATE_ACCOUNT_URL),
            _ => None,
        }
    }
}

/// Values edited on the summary screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryForm {
    pub realm: String,
    pub token: String,
    pub symbols_token: String,
    pub send_debug_builds: bool,
    pub send_release_builds: bool,
    pub override_global_reporter: bool,
}

impl SummaryForm {
    /// Pre-fills the form from `config`.
    pub fn from_config(config: &IntegrationConfig) -> Self {
        Self {
            realm: config.realm.clone(),
            token: config.token.clone(),
            symbols_token: config.symbols_token.clone(),
            send_debug_builds: config.send_debug_builds,
            send_release_builds: config.send_release_builds,
            override_global_reporter: config.override_global_reporter,
        }
    }
}

/// User input that drives the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupAction {
    HaveAccount,
    Back,
    SubmitInstance { realm: String, project_name: String },
    SubmitToken { token: String },
    SubmitSymbolsToken { symbols_token: String },
    Skip,
    Apply(SummaryForm),
    Cancel,
}

impl SetupAction {
    fn name(&self) -> &'static str {
        match self {
            SetupAction::HaveAccount => "HaveAccount",
            SetupAction::Back => "Back",
            SetupAction::SubmitInstance { .. } => "SubmitInstance",
            SetupAction::SubmitToken { .. } => "SubmitToken",
            SetupAction::SubmitSymbolsToken { .. } => "SubmitSymbolsToken",
            SetupAction::Skip => "Skip",
            SetupAction::Apply(_) => "Apply",
            SetupAction::Cancel => "Cancel",
        }
    }
}

/// How a finished flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The user pressed Apply; the config must now be persisted.
    Applied,
    /// The window was closed without applying.
    Cancelled,
}

/// Current position of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Step(SetupStep),
    Finished(FlowOutcome),
}

/// Errors returned by [`SetupFlow::handle`].
#[derive(Debug, Error, PartialEq)]
pub enum FlowError {
    /// The action is not available on the current step.
    #[error("action {action} is not available on step {step:?}")]
    InvalidTransition { step: SetupStep, action: &'static str },

    /// The flow already ended.
    #[error("setup flow already finished ({0:?})")]
    Finished(FlowOutcome),
}

/// The setup wizard / settings dialog state machine.
#[derive(Debug, Clone)]
pub struct SetupFlow {
    config: IntegrationConfig,
    state: FlowState,
}

impl SetupFlow {
    /// Starts the first-run wizard at the welcome screen.
    pub fn wizard(config: IntegrationConfig) -> Self {
        Self {
            config,
            state: FlowState::Step(SetupStep::Welcome),
        }
    }

    /// Opens the settings dialog (the summary screen) directly.
    pub fn settings_dialog(config: IntegrationConfig) -> Self {
        Self {
            config,
            state: FlowState::Step(SetupStep::Summary),
        }
    }

    /// Picks the entry point from the persisted first-run flag.
    pub fn begin(first_run: bool, config: IntegrationConfig) -> Self {
        if first_run {
            Self::wizard(config)
        } else {
            Self::settings_dialog(config)
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// The current step, or `None` once the flow has finished.
    pub fn step(&self) -> Option<SetupStep> {
        match self.state {
            FlowState::Step(step) => Some(step),
            FlowState::Finished(_) => None,
        }
    }

    pub fn outcome(&self) -> Option<FlowOutcome> {
        match self.state {
            FlowState::Finished(outcome) => Some(outcome),
            FlowState::Step(_) => None,
        }
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    pub fn into_config(self) -> IntegrationConfig {
        self.config
    }

    /// Applies `action` to the current step and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidTransition`] when the step does not offer
    /// the action (the state is left unchanged), or [`FlowError::Finished`]
    /// after Apply or Cancel.
    pub fn handle(&mut self, action: SetupAction) -> Result<FlowState, FlowError> {
        let step = match self.state {
            FlowState::Step(step) => step,
            FlowState::Finished(outcome) => return Err(FlowError::Finished(outcome)),
        };
        let action_name = action.name();

        let next = match (step, action) {
            (_, SetupAction::Cancel) => FlowState::Finished(FlowOutcome::Cancelled),

            (SetupStep::Welcome, SetupAction::HaveAccount) => FlowState::Step(SetupStep::Instance),

            (SetupStep::Instance, SetupAction::Back) => FlowState::Step(SetupStep::Welcome),
            (SetupStep::Instance, SetupAction::SubmitInstance { realm, project_name }) => {
                self.config.realm = realm;
                self.config.project_name = project_name;
                FlowState::Step(SetupStep::SubmissionToken)
            }

            (SetupStep::SubmissionToken, SetupAction::Back) => FlowState::Step(SetupStep::Instance),
            (SetupStep::SubmissionToken, SetupAction::SubmitToken { token }) => {
                self.config.token = token;
                FlowState::Step(SetupStep::SymbolsToken)
            }

            (SetupStep::SymbolsToken, SetupAction::Back) => {
                FlowState::Step(SetupStep::SubmissionToken)
            }
            (SetupStep::SymbolsToken, SetupAction::SubmitSymbolsToken { symbols_token }) => {
                self.config.symbols_token = symbols_token;
                FlowState::Step(SetupStep::Summary)
            }
            (SetupStep::SymbolsToken, SetupAction::Skip) => FlowState::Step(SetupStep::Summary),

            (SetupStep::Summary, SetupAction::Apply(form)) => {
                self.config.realm = form.realm;
                self.config.token = form.token;
                self.config.symbols_token = form.symbols_token;
                self.config.send_debug_builds = form.send_debug_builds;
                self.config.send_release_builds = form.send_release_builds;
                self.config.override_global_reporter = form.override_global_reporter;
                FlowState::Finished(FlowOutcome::Applied)
            }

            _ => {
                return Err(FlowError::InvalidTransition {
                    step,
                    action: action_name,
                })
            }
        };

        debug!(from = ?step, action = action_name, to = ?next, "setup flow transition");
        self.state = next;
        Ok(next)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> SummaryForm {
        SummaryForm {
            realm: "studio".to_string(),
            token: "tok".to_string(),
            symbols_token: "sym".to_string(),
            send_debug_builds: true,
            send_release_builds: true,
            override_global_reporter: true,
        }
    }

    #[test]
    fn test_begin_first_run_opens_welcome() {
        let flow = SetupFlow::begin(true, IntegrationConfig::default());
        assert_eq!(flow.step(), Some(SetupStep::Welcome));
    }

    #[test]
    fn test_begin_after_first_run_opens_summary() {
        let flow = SetupFlow::begin(false, IntegrationConfig::default());
        assert_eq!(flow.step(), Some(SetupStep::Summary));
    }

    #[test]
    fn test_full_wizard_walk_collects_every_field() {
        // Arrange
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());

        // Act
        flow.handle(SetupAction::HaveAccount).unwrap();
        flow.handle(SetupAction::SubmitInstance {
            realm: "studio".to_string(),
            project_name: "Shooter".to_string(),
        })
        .unwrap();
        flow.handle(SetupAction::SubmitToken {
            token: "crash".to_string(),
        })
        .unwrap();
        flow.handle(SetupAction::SubmitSymbolsToken {
            symbols_token: "sym".to_string(),
        })
        .unwrap();
        let form = SummaryForm::from_config(flow.config());
        let state = flow.handle(SetupAction::Apply(form)).unwrap();

        // Assert
        assert_eq!(state, FlowState::Finished(FlowOutcome::Applied));
        let cfg = flow.into_config();
        assert_eq!(cfg.realm, "studio");
        assert_eq!(cfg.project_name, "Shooter");
        assert_eq!(cfg.token, "crash");
        assert_eq!(cfg.symbols_token, "sym");
    }

    #[test]
    fn test_skip_keeps_existing_symbols_token() {
        let mut cfg = IntegrationConfig::default();
        cfg.symbols_token = "kept".to_string();
        let mut flow = SetupFlow::wizard(cfg);
        flow.handle(SetupAction::HaveAccount).unwrap();
        flow.handle(SetupAction::SubmitInstance {
            realm: "r".to_string(),
            project_name: "p".to_string(),
        })
        .unwrap();
        flow.handle(SetupAction::SubmitToken { token: "t".to_string() }).unwrap();

        let state = flow.handle(SetupAction::Skip).unwrap();

        assert_eq!(state, FlowState::Step(SetupStep::Summary));
        assert_eq!(flow.config().symbols_token, "kept");
    }

    #[test]
    fn test_back_walks_to_previous_steps() {
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());
        flow.handle(SetupAction::HaveAccount).unwrap();
        flow.handle(SetupAction::SubmitInstance {
            realm: "r".to_string(),
            project_name: "p".to_string(),
        })
        .unwrap();

        assert_eq!(
            flow.handle(SetupAction::Back).unwrap(),
            FlowState::Step(SetupStep::Instance)
        );
        assert_eq!(
            flow.handle(SetupAction::Back).unwrap(),
            FlowState::Step(SetupStep::Welcome)
        );
    }

    #[test]
    fn test_apply_on_summary_overwrites_settings() {
        let mut flow = SetupFlow::settings_dialog(IntegrationConfig::default());

        flow.handle(SetupAction::Apply(filled_form())).unwrap();

        let cfg = flow.config();
        assert_eq!(cfg.realm, "studio");
        assert!(cfg.send_debug_builds);
        assert!(cfg.send_release_builds);
        assert!(cfg.override_global_reporter);
        // The summary form has no project name field.
        assert!(cfg.project_name.is_empty());
    }

    #[test]
    fn test_cancel_is_accepted_from_any_step() {
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());
        flow.handle(SetupAction::HaveAccount).unwrap();

        let state = flow.handle(SetupAction::Cancel).unwrap();

        assert_eq!(state, FlowState::Finished(FlowOutcome::Cancelled));
        assert_eq!(flow.outcome(), Some(FlowOutcome::Cancelled));
        assert_eq!(flow.config(), &IntegrationConfig::default());
    }

    #[test]
    fn test_invalid_action_is_rejected_and_state_kept() {
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());

        let err = flow.handle(SetupAction::Skip).unwrap_err();

        assert_eq!(
            err,
            FlowError::InvalidTransition {
                step: SetupStep::Welcome,
                action: "Skip"
            }
        );
        assert_eq!(flow.step(), Some(SetupStep::Welcome));
    }

    #[test]
    fn test_summary_has_no_back_transition() {
        let mut flow = SetupFlow::settings_dialog(IntegrationConfig::default());
        assert!(flow.handle(SetupAction::Back).is_err());
    }

    #[test]
    fn test_actions_after_finish_return_finished_error() {
        let mut flow = SetupFlow::settings_dialog(IntegrationConfig::default());
        flow.handle(SetupAction::Cancel).unwrap();

        let err = flow.handle(SetupAction::HaveAccount).unwrap_err();

        assert_eq!(err, FlowError::Finished(FlowOutcome::Cancelled));
    }

    #[test]
    fn test_token_help_link_uses_realm_and_project() {
        let mut cfg = IntegrationConfig::default();
        cfg.realm = "studio".to_string();
        cfg.project_name = "Shooter".to_string();

        assert_eq!(
            SetupStep::SubmissionToken.help_link(&cfg).as_deref(),
            Some("https://studio.sp.backtrace.io/config/studio/projects/Shooter/tokens")
        );
        assert_eq!(
            SetupStep::SymbolsToken.help_link(&cfg).as_deref(),
            Some("https://studio.sp.backtrace.io/config/studio/projects/Shooter/symbol-access-tokens")
        );
    }

    #[test]
    fn test_welcome_offers_documentation_and_sign_up_links() {
        let cfg = IntegrationConfig::default();

        assert_eq!(
            SetupStep::Welcome.help_link(&cfg).as_deref(),
            Some("https://documentation.backtrace.io/product_integration_ue4/")
        );
        assert_eq!(
            SetupStep::Welcome.create_account_link(),
            Some("https://backtrace.io/createue4marketplace/")
        );
    }

    #[test]
    fn test_instance_step_has_no_links() {
        let cfg = IntegrationConfig::default();

        assert_eq!(SetupStep::Instance.help_link(&cfg), None);
        assert_eq!(SetupStep::Instance.create_account_link(), None);
    }

    #[test]
    fn test_progress_label_only_on_data_entry_steps() {
        assert_eq!(SetupStep::Instance.progress_label().as_deref(), Some("Step 1 of 3."));
        assert_eq!(SetupStep::SymbolsToken.progress_label().as_deref(), Some("Step 3 of 3."));
        assert_eq!(SetupStep::Welcome.progress_label(), None);
        assert_eq!(SetupStep::Summary.progress_label(), None);
    }
}
