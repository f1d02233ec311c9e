//! Post-build step that uploads debug symbols to Backtrace.
//!
//! The engine build system runs every command listed under
//! `PostBuildSteps.<Platform>` in the project descriptor after compiling a
//! target. This plugin registers one such command: its bundled uploader
//! executable, invoked with the integration settings as flags and with
//! build-system macros (`$(ProjectDir)`, `$(TargetName)`, ...) that the
//! build system substitutes at build time.
//!
//! Format (one line, shown wrapped):
//! ```text
//! "$(ProjectDir)/Plugins/BacktraceIntegration/Content/BacktraceIntegration/backtrace_post_build.exe"
//!     --token=<token> --send_debug=True|False --send_release=True|False
//!     --realm=<realm> --symbols_token=<symbols token>
//!     --engine_dir="$(EngineDir)" --project_dir="$(ProjectDir)"
//!     --target_name="$(TargetName)" --target_configuration="$(TargetConfiguration)"
//!     --target_type="$(TargetType)" --project_file="$(ProjectFile)"
//! ```

use std::fmt;

use crate::domain::config::IntegrationConfig;

/// Descriptor platform key the post-build step is registered under.
pub const POST_BUILD_PLATFORM: &str = "Win64";

/// Uploader executable shipped with the plugin.
pub const POST_BUILD_EXECUTABLE: &str = "backtrace_post_build.exe";

/// Uploader name used by older plugin releases; its steps are also replaced.
pub const LEGACY_UPLOADER_EXECUTABLE: &str = "backtrace_symbol_uploader.exe";

const EXECUTABLE_DIR: &str = "$(ProjectDir)/Plugins/BacktraceIntegration/Content/BacktraceIntegration";

/// Build-system macros passed through unresolved.
const HOST_PLACEHOLDER_FLAGS: [&str; 6] = [
    "--engine_dir=\"$(EngineDir)\"",
    "--project_dir=\"$(ProjectDir)\"",
    "--target_name=\"$(TargetName)\"",
    "--target_configuration=\"$(TargetConfiguration)\"",
    "--target_type=\"$(TargetType)\"",
    "--project_file=\"$(ProjectFile)\"",
];

/// A fully rendered post-build command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBuildCommand(String);

impl PostBuildCommand {
    /// Renders the uploader invocation for `config`.
    pub fn for_config(config: &IntegrationConfig) -> Self {
        let mut parts = vec![
            format!("\"{EXECUTABLE_DIR}/{POST_BUILD_EXECUTABLE}\""),
            format!("--token={}", config.token),
            format!("--send_debug={}", python_bool(config.send_debug_builds)),
            format!("--send_release={}", python_bool(config.send_release_builds)),
            format!("--realm={}", config.realm),
            format!("--symbols_token={}", config.symbols_token),
        ];
        parts.extend(HOST_PLACEHOLDER_FLAGS.iter().map(|flag| flag.to_string()));
        Self(parts.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PostBuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns `true` if `step` invokes one of this plugin's uploader executables.
pub fn is_plugin_post_build_step(step: &str) -> bool {
    step.contains(POST_BUILD_EXECUTABLE) || step.contains(LEGACY_UPLOADER_EXECUTABLE)
}

/// The uploader parses `True`/`False`.
fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> IntegrationConfig {
        IntegrationConfig {
            token: "crash-tok".to_string(),
            symbols_token: "sym-tok".to_string(),
            realm: "studio".to_string(),
            project_name: "Shooter".to_string(),
            send_debug_builds: true,
            send_release_builds: false,
            override_global_reporter: false,
        }
    }

    #[test]
    fn test_command_starts_with_quoted_executable_path() {
        // Arrange / Act
        let cmd = PostBuildCommand::for_config(&sample_config());

        // Assert
        assert!(cmd.as_str().starts_with(
            "\"$(ProjectDir)/Plugins/BacktraceIntegration/Content/BacktraceIntegration/backtrace_post_build.exe\" "
        ));
    }

    #[test]
    fn test_command_embeds_all_config_flags_in_order() {
        let cmd = PostBuildCommand::for_config(&sample_config()).into_string();
        let token = cmd.find("--token=crash-tok").expect("token flag");
        let debug = cmd.find("--send_debug=True").expect("debug flag");
        let release = cmd.find("--send_release=False").expect("release flag");
        let realm = cmd.find("--realm=studio").expect("realm flag");
        let symbols = cmd.find("--symbols_token=sym-tok").expect("symbols flag");
        assert!(token < debug && debug < release && release < realm && realm < symbols);
    }

    #[test]
    fn test_command_leaves_build_system_macros_unresolved() {
        let cmd = PostBuildCommand::for_config(&sample_config());
        assert!(cmd.as_str().ends_with("--project_file=\"$(ProjectFile)\""));
        assert!(cmd.as_str().contains("--target_type=\"$(TargetType)\""));
        assert!(cmd.as_str().contains("--engine_dir=\"$(EngineDir)\""));
    }

    #[test]
    fn test_rendered_command_is_recognised_as_plugin_step() {
        let cmd = PostBuildCommand::for_config(&sample_config());
        assert!(is_plugin_post_build_step(cmd.as_str()));
    }

    #[test]
    fn test_legacy_uploader_is_recognised_as_plugin_step() {
        assert!(is_plugin_post_build_step(
            "\"C:/Tools/backtrace_symbol_uploader.exe\" --token=x"
        ));
    }

    #[test]
    fn test_unrelated_step_is_not_recognised() {
        assert!(!is_plugin_post_build_step("\"$(EngineDir)/Build/BatchFiles/Copy.bat\""));
    }

    #[test]
    fn test_display_matches_as_str() {
        let cmd = PostBuildCommand::for_config(&IntegrationConfig::default());
        assert_eq!(cmd.to_string(), cmd.as_str());
    }
}
