//! Terminal front end for the setup flow.
//!
//! [`WizardPrompter`] renders each [`SetupStep`] as a few text prompts and
//! turns the answers into [`SetupAction`]s. It is generic over the reader
//! and writer so tests can script a whole session.
//!
//! On every prompt an empty answer keeps the value shown in brackets,
//! `:b` goes back one step and `:q` (or end of input) cancels.

use std::io::{self, BufRead, Write};

use bt_setup_core::{IntegrationConfig, SetupAction, SetupFlow, SetupStep, SummaryForm};
use tracing::{debug, info, warn};

use crate::application::apply_settings::{Notification, Notifier, Severity};

const BACK_COMMAND: &str = ":b";
const QUIT_COMMAND: &str = ":q";

/// Prints notifications to stderr and mirrors them to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.severity {
            Severity::Info => {
                info!(message = %notification.message, "notification");
                eprintln!("{}", notification.message);
            }
            Severity::Warning => {
                warn!(step = ?notification.step, message = %notification.message, "notification");
                eprintln!("warning: {}", notification.message);
            }
        }
    }
}

/// A single answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    Value(String),
    Back,
    Quit,
}

/// Drives a [`SetupFlow`] from line-based input.
pub struct WizardPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> WizardPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompts until `flow` reaches Applied or Cancelled.
    pub fn run(&mut self, flow: &mut SetupFlow) -> io::Result<()> {
        writeln!(
            self.output,
            "Press Enter to keep a value, {BACK_COMMAND} to go back, {QUIT_COMMAND} to cancel."
        )?;
        while let Some(step) = flow.step() {
            self.show_header(step, flow.config())?;
            let action = self.next_action(step, flow.config())?;
            if let Err(e) = flow.handle(action) {
                debug!(error = %e, "ignored action");
                writeln!(self.output, "{e}")?;
            }
        }
        Ok(())
    }

    fn show_header(&mut self, step: SetupStep, config: &IntegrationConfig) -> io::Result<()> {
        writeln!(self.output)?;
        if let Some(progress) = step.progress_label() {
            writeln!(self.output, "{progress}")?;
        }
        let title = match step {
            SetupStep::Welcome => "Welcome to the Backtrace crash reporting setup.",
            SetupStep::Instance => "Enter your Backtrace instance and project.",
            SetupStep::SubmissionToken => "Enter the crash submission token for the project.",
            SetupStep::SymbolsToken => "Enter a symbol upload token.",
            SetupStep::Summary => "Backtrace settings",
        };
        writeln!(self.output, "{title}")?;
        if let Some(link) = step.help_link(config) {
            writeln!(self.output, "Help: {link}")?;
        }
        Ok(())
    }

    fn next_action(
        &mut self,
        step: SetupStep,
        config: &IntegrationConfig,
    ) -> io::Result<SetupAction> {
        match step {
            SetupStep::Welcome => self.welcome(),
            SetupStep::Instance => {
                let realm = match self.ask("Instance sub-domain", &config.realm)? {
                    Answer::Value(v) => v,
                    Answer::Back => return Ok(SetupAction::Back),
                    Answer::Quit => return Ok(SetupAction::Cancel),
                };
                let project_name = match self.ask("Project name", &config.project_name)? {
                    Answer::Value(v) => v,
                    Answer::Back => return Ok(SetupAction::Back),
                    Answer::Quit => return Ok(SetupAction::Cancel),
                };
                Ok(SetupAction::SubmitInstance {
                    realm,
                    project_name,
                })
            }
            SetupStep::SubmissionToken => Ok(match self.ask("Submission token", &config.token)? {
                Answer::Value(token) => SetupAction::SubmitToken { token },
                Answer::Back => SetupAction::Back,
                Answer::Quit => SetupAction::Cancel,
            }),
            SetupStep::SymbolsToken => {
                writeln!(self.output, "Enter - to skip symbol uploads for now.")?;
                Ok(match self.ask("Symbols token", &config.symbols_token)? {
                    Answer::Value(v) if v == "-" => SetupAction::Skip,
                    Answer::Value(symbols_token) => {
                        SetupAction::SubmitSymbolsToken { symbols_token }
                    }
                    Answer::Back => SetupAction::Back,
                    Answer::Quit => SetupAction::Cancel,
                })
            }
            SetupStep::Summary => self.summary(config),
        }
    }

    fn welcome(&mut self) -> io::Result<SetupAction> {
        loop {
            write!(
                self.output,
                "[a] I have an account  [c] Create an account  [q] Quit: "
            )?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(SetupAction::Cancel);
            };
            match line.as_str() {
                "a" | "A" => return Ok(SetupAction::HaveAccount),
                "q" | "Q" | QUIT_COMMAND => return Ok(SetupAction::Cancel),
                "c" | "C" => {
                    if let Some(link) = SetupStep::Welcome.create_account_link() {
                        writeln!(self.output, "Create an account at {link}, then choose [a].")?;
                    }
                }
                _ => {}
            }
        }
    }

    fn summary(&mut self, config: &IntegrationConfig) -> io::Result<SetupAction> {
        let mut form = SummaryForm::from_config(config);

        for (label, field) in [
            ("Instance sub-domain", &mut form.realm),
            ("Submission token", &mut form.token),
            ("Symbols token", &mut form.symbols_token),
        ] {
            match self.ask(label, field)? {
                Answer::Value(v) => *field = v,
                Answer::Back | Answer::Quit => return Ok(SetupAction::Cancel),
            }
        }
        for (label, flag) in [
            ("Upload symbols for debug builds", &mut form.send_debug_builds),
            ("Upload symbols for release builds", &mut form.send_release_builds),
            (
                "Also redirect the user-wide crash reporter",
                &mut form.override_global_reporter,
            ),
        ] {
            match self.ask_flag(label, *flag)? {
                Some(v) => *flag = v,
                None => return Ok(SetupAction::Cancel),
            }
        }

        match self.ask_flag("Apply these settings", true)? {
            Some(true) => Ok(SetupAction::Apply(form)),
            Some(false) | None => Ok(SetupAction::Cancel),
        }
    }

    fn ask(&mut self, label: &str, current: &str) -> io::Result<Answer> {
        write!(self.output, "{label} [{current}]: ")?;
        self.output.flush()?;
        Ok(match self.read_line()? {
            None => Answer::Quit,
            Some(line) if line == QUIT_COMMAND => Answer::Quit,
            Some(line) if line == BACK_COMMAND => Answer::Back,
            Some(line) if line.is_empty() => Answer::Value(current.to_string()),
            Some(line) => Answer::Value(line),
        })
    }

    /// Asks a yes/no question. `None` means the user cancelled.
    fn ask_flag(&mut self, label: &str, current: bool) -> io::Result<Option<bool>> {
        let shown = if current { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{label}? [{shown}]: ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.to_ascii_lowercase().as_str() {
                "" => return Ok(Some(current)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                QUIT_COMMAND | BACK_COMMAND => return Ok(None),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    /// Reads one trimmed line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bt_setup_core::FlowOutcome;
    use std::io::Cursor;

    fn run_script(flow: &mut SetupFlow, script: &str) -> String {
        let mut output = Vec::new();
        WizardPrompter::new(Cursor::new(script.to_string()), &mut output)
            .run(flow)
            .expect("run");
        String::from_utf8(output).expect("utf8")
    }

    #[test]
    fn test_full_wizard_session_applies_answers() {
        // Arrange
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());
        let script = "a\nstudio\nshooter\ntok-1\nsym-1\n\n\n\ny\nn\n\ny\n";

        // Act
        let transcript = run_script(&mut flow, script);

        // Assert
        assert_eq!(flow.outcome(), Some(FlowOutcome::Applied));
        let cfg = flow.into_config();
        assert_eq!(cfg.realm, "studio");
        assert_eq!(cfg.project_name, "shooter");
        assert_eq!(cfg.token, "tok-1");
        assert_eq!(cfg.symbols_token, "sym-1");
        assert!(cfg.send_debug_builds);
        assert!(!cfg.send_release_builds);
        assert!(!cfg.override_global_reporter);
        assert!(transcript.contains("Step 1 of 3."));
        assert!(transcript
            .contains("https://studio.sp.backtrace.io/config/studio/projects/shooter/tokens"));
    }

    #[test]
    fn test_skip_symbols_keeps_existing_token() {
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());
        let script = "a\nstudio\nshooter\ntok-1\n-\n\n\n\n\n\n\n\n";

        run_script(&mut flow, script);

        assert_eq!(flow.outcome(), Some(FlowOutcome::Applied));
        assert_eq!(
            flow.into_config().symbols_token,
            IntegrationConfig::default().symbols_token
        );
    }

    #[test]
    fn test_back_returns_to_previous_step() {
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());
        // Back from the token step, resubmit the instance, then input ends.
        let script = "a\nstudio\nshooter\n:b\nother\n\n";

        run_script(&mut flow, script);

        assert_eq!(flow.outcome(), Some(FlowOutcome::Cancelled));
        assert_eq!(flow.config().realm, "other");
    }

    #[test]
    fn test_create_account_choice_shows_sign_up_link() {
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());

        let transcript = run_script(&mut flow, "c\nq\n");

        assert!(
            transcript.contains("Create an account at https://backtrace.io/createue4marketplace/")
        );
        assert!(!transcript.contains("Step 1 of 3."));
        assert_eq!(flow.outcome(), Some(FlowOutcome::Cancelled));
    }

    #[test]
    fn test_end_of_input_cancels() {
        let mut flow = SetupFlow::wizard(IntegrationConfig::default());

        run_script(&mut flow, "");

        assert_eq!(flow.outcome(), Some(FlowOutcome::Cancelled));
    }

    #[test]
    fn test_settings_dialog_declining_apply_cancels() {
        let mut flow = SetupFlow::settings_dialog(IntegrationConfig::default());

        run_script(&mut flow, "\n\n\n\n\n\nn\n");

        assert_eq!(flow.outcome(), Some(FlowOutcome::Cancelled));
    }

    #[test]
    fn test_invalid_flag_answer_is_asked_again() {
        let mut flow = SetupFlow::settings_dialog(IntegrationConfig::default());

        let transcript = run_script(&mut flow, "\n\n\nmaybe\ny\n\n\ny\n");

        assert!(transcript.contains("Please answer y or n."));
        assert_eq!(flow.outcome(), Some(FlowOutcome::Applied));
        assert!(flow.config().send_debug_builds);
    }
}
