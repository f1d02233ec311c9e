//! bt-setup: wires Backtrace crash reporting into an engine project.
//!
//! # Usage
//!
//! ```text
//! bt-setup [--project <PATH>] [--global-ini <PATH>] <COMMAND>
//!
//! Commands:
//!   status   Show the stored settings and where crash reports are routed
//!   apply    Write settings non-interactively (flags override stored values)
//!   wizard   Interactive setup: first-run wizard, or the settings dialog
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Description                                  |
//! |-----------------------|----------------------------------------------|
//! | `BT_SETUP_PROJECT`    | `.uproject` file or the directory holding it |
//! | `BT_SETUP_GLOBAL_INI` | Path of the user-wide `UserEngine.ini`       |
//! | `RUST_LOG`            | Log filter; defaults to the tool settings    |
//!
//! CLI args take precedence over environment variables, which take
//! precedence over `[paths] global_ini` in the tool settings file.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bt_setup::application::apply_settings::SyncReport;
use bt_setup::infrastructure::console::{ConsoleNotifier, WizardPrompter};
use bt_setup::infrastructure::context::AppContext;
use bt_setup::infrastructure::paths::ProjectPaths;
use bt_setup::infrastructure::storage::ini_router::{read_router_state, RouterState};
use bt_setup::infrastructure::storage::tool_settings::{load_tool_settings, ToolSettings};
use bt_setup_core::IntegrationConfig;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Configure Backtrace crash reporting for an engine project.
#[derive(Debug, Parser)]
#[command(name = "bt-setup", version)]
struct Cli {
    /// Project descriptor (`.uproject`) or the directory that contains it.
    #[arg(long, default_value = ".", env = "BT_SETUP_PROJECT")]
    project: PathBuf,

    /// User-wide engine INI to redirect when overriding the global reporter.
    #[arg(long, env = "BT_SETUP_GLOBAL_INI")]
    global_ini: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the stored settings and the current crash report routing.
    Status {
        /// Print machine-readable JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the settings to every project file.
    Apply(ApplyArgs),
    /// Walk through setup interactively.
    Wizard,
}

/// Overrides for `apply`; unset flags keep the stored value.
#[derive(Debug, clap::Args)]
struct ApplyArgs {
    /// Backtrace instance sub-domain.
    #[arg(long)]
    realm: Option<String>,
    /// Crash submission token.
    #[arg(long)]
    token: Option<String>,
    /// Symbol upload token.
    #[arg(long)]
    symbols_token: Option<String>,
    /// Backtrace project name.
    #[arg(long)]
    project_name: Option<String>,
    /// Upload symbols after debug builds.
    #[arg(long)]
    send_debug: Option<bool>,
    /// Upload symbols after release builds.
    #[arg(long)]
    send_release: Option<bool>,
    /// Also redirect the user-wide crash reporter.
    #[arg(long)]
    override_global: Option<bool>,
}

impl ApplyArgs {
    fn merge_into(self, mut config: IntegrationConfig) -> IntegrationConfig {
        if let Some(v) = self.realm {
            config.realm = v;
        }
        if let Some(v) = self.token {
            config.token = v;
        }
        if let Some(v) = self.symbols_token {
            config.symbols_token = v;
        }
        if let Some(v) = self.project_name {
            config.project_name = v;
        }
        if let Some(v) = self.send_debug {
            config.send_debug_builds = v;
        }
        if let Some(v) = self.send_release {
            config.send_release_builds = v;
        }
        if let Some(v) = self.override_global {
            config.override_global_reporter = v;
        }
        config
    }
}

/// Output of `status --json`.
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    project_file: &'a std::path::Path,
    first_run: bool,
    plugin_entry_found: bool,
    config: &'a IntegrationConfig,
    project_router: RouterState,
    user_router: RouterState,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_tool_settings().unwrap_or_else(|e| {
        eprintln!("warning: ignoring tool settings: {e}");
        ToolSettings::default()
    });
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with_writer(io::stderr)
        .init();

    let global_ini = cli.global_ini.or(settings.paths.global_ini);
    let paths = ProjectPaths::resolve(&cli.project, global_ini)
        .with_context(|| format!("cannot use project {}", cli.project.display()))?;
    info!(project = %paths.project_file.display(), "bt-setup starting");

    let mut ctx = if matches!(cli.command, Command::Status { .. }) {
        AppContext::inspect(paths, ConsoleNotifier)
    } else {
        AppContext::init(paths, ConsoleNotifier)
    };
    let code = match cli.command {
        Command::Status { json } => {
            print_status(&ctx, json)?;
            ExitCode::SUCCESS
        }
        Command::Apply(args) => {
            let config = args.merge_into(ctx.config().clone());
            exit_code(&ctx.apply(config))
        }
        Command::Wizard => {
            let mut flow = ctx.begin_setup();
            let stdin = io::stdin();
            WizardPrompter::new(stdin.lock(), io::stdout())
                .run(&mut flow)
                .context("interactive setup failed")?;
            match ctx.finish_setup(flow) {
                Some(report) => exit_code(&report),
                None => {
                    println!("Setup cancelled; no files were changed.");
                    ExitCode::SUCCESS
                }
            }
        }
    };

    ctx.shutdown();
    Ok(code)
}

fn print_status(ctx: &AppContext<ConsoleNotifier>, json: bool) -> anyhow::Result<()> {
    let paths = ctx.paths();
    let project_router = read_router_state(&paths.local_ini)
        .with_context(|| format!("cannot read {}", paths.local_ini.display()))?;
    let user_router = read_router_state(&paths.global_ini).unwrap_or_else(|e| {
        warn!(error = %e, "cannot read user-wide INI");
        RouterState::default()
    });

    let report = StatusReport {
        project_file: &paths.project_file,
        first_run: ctx.is_first_run(),
        plugin_entry_found: ctx.entry_found(),
        config: ctx.config(),
        project_router,
        user_router,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("cannot render status")?
        );
        return Ok(());
    }

    let cfg = report.config;
    println!("Project:              {}", report.project_file.display());
    println!("Setup completed:      {}", yes_no(!report.first_run));
    println!("Instance:             {}", cfg.realm);
    println!("Project name:         {}", cfg.project_name);
    println!("Submission token:     {}", cfg.token);
    println!("Symbols token:        {}", cfg.symbols_token);
    println!("Debug symbols:        {}", yes_no(cfg.send_debug_builds));
    println!("Release symbols:      {}", yes_no(cfg.send_release_builds));
    println!("Override user INI:    {}", yes_no(cfg.override_global_reporter));
    println!(
        "Project router URL:   {}",
        report.project_router.url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "User router URL:      {}",
        report.user_router.url.as_deref().unwrap_or("(not set)")
    );
    if let Some(old) = &report.user_router.old_url {
        println!("User router previous: {old}");
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn exit_code(report: &SyncReport) -> ExitCode {
    let failures = report.failures().count();
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{failures} step(s) failed; see warnings above.");
        ExitCode::FAILURE
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
