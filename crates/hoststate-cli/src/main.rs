// crates/hoststate-cli/src/main.rs
// ============================================================================
// Module: Hoststate CLI Entry Point
// Description: Command dispatcher for host state verification.
// Purpose: Resolve inventory hosts, run the check suite, and report results.
// Dependencies: clap, hoststate-backends, hoststate-config, hoststate-core,
//               hoststate-inventory, serde_json, thiserror, tracing.
// ============================================================================

//! ## Overview
//! The `hoststate` CLI verifies provisioned hosts. `run` resolves the target
//! group from an inventory, checks every host against the suite, prints the
//! report on stdout, and exits non-zero when any case fails. Diagnostics go
//! to stderr through `tracing` so stdout stays machine-readable.
//!
//! The inventory environment variable is read once here and passed down as
//! an explicit value.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use hoststate_backends::CommandRunner;
use hoststate_backends::ProcessRunner;
use hoststate_backends::connect;
use hoststate_config::HoststateConfig;
use hoststate_config::INVENTORY_ENV_VAR;
use hoststate_config::SuiteConfig;
use hoststate_config::config_toml_example;
use hoststate_core::HostHandle;
use hoststate_core::SuiteReport;
use hoststate_core::SuiteRunner;
use hoststate_inventory::InventoryHost;
use hoststate_inventory::resolve_hosts;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Log filter applied when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "hoststate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check every host in the inventory group against the suite.
    Run(RunCommand),
    /// List the hosts resolved from the inventory group.
    Hosts(HostsCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Suite utilities.
    Suite {
        /// Selected suite subcommand.
        #[command(subcommand)]
        command: SuiteCommand,
    },
}

/// Inventory selection shared by `run` and `hosts`.
#[derive(Args, Debug)]
struct TargetArgs {
    /// Optional config file path (defaults to hoststate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Inventory file (overrides config and `MOLECULE_INVENTORY_FILE`).
    #[arg(long, value_name = "PATH")]
    inventory: Option<PathBuf>,
    /// Inventory group to target (overrides config).
    #[arg(long, value_name = "NAME")]
    group: Option<String>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Inventory selection.
    #[command(flatten)]
    target: TargetArgs,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for the `hosts` command.
#[derive(Args, Debug)]
struct HostsCommand {
    /// Inventory selection.
    #[command(flatten)]
    target: TargetArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a hoststate configuration file.
    Validate(ConfigPathArgs),
    /// Print an example configuration.
    Example,
}

/// Suite subcommands.
#[derive(Subcommand, Debug)]
enum SuiteCommand {
    /// Print the effective suite as JSON.
    Show(ConfigPathArgs),
}

/// Config path argument.
#[derive(Args, Debug)]
struct ConfigPathArgs {
    /// Optional config file path (defaults to hoststate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Output formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("hoststate {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(&command),
        Commands::Hosts(command) => command_hosts(&command),
        Commands::Config {
            command,
        } => command_config(&command),
        Commands::Suite {
            command,
        } => command_suite(&command),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let resolved = resolve_target(&command.target)?;
    let hosts = load_hosts(&resolved)?;
    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
    let handles: Vec<HostHandle> =
        hosts.iter().map(|host| connect(host, &resolved.backend, Arc::clone(&runner))).collect();
    let report = SuiteRunner::new(resolved.suite).run(&handles);
    write_report(&report, command.format)?;
    Ok(exit_code_for(&report))
}

/// Maps a report to the process exit code.
fn exit_code_for(report: &SuiteReport) -> ExitCode {
    if report.all_passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Writes the report in the requested format.
fn write_report(report: &SuiteReport, format: OutputFormat) -> CliResult<()> {
    let rendered = match format {
        OutputFormat::Text => report.render_text(),
        OutputFormat::Json => report
            .to_json()
            .map_err(|err| CliError::new(format!("failed to serialize report: {err}")))?,
    };
    write_stdout_line(rendered.trim_end())
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Hosts Command
// ============================================================================

/// Executes the `hosts` command.
fn command_hosts(command: &HostsCommand) -> CliResult<ExitCode> {
    let resolved = resolve_target(&command.target)?;
    let hosts = load_hosts(&resolved)?;
    let rendered = match command.format {
        OutputFormat::Text => render_hosts_text(&hosts),
        OutputFormat::Json => serde_json::to_string_pretty(&hosts)
            .map_err(|err| CliError::new(format!("failed to serialize hosts: {err}")))?,
    };
    write_stdout_line(rendered.trim_end())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders one `name connection` line per host.
fn render_hosts_text(hosts: &[InventoryHost]) -> String {
    let width = hosts.iter().map(|host| host.name.len()).max().unwrap_or_default();
    let mut output = String::new();
    for host in hosts {
        let _ = writeln!(output, "{:<width$}  {}", host.name, host.connection);
    }
    output
}

// ============================================================================
// SECTION: Config and Suite Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(args) => {
            let _config = load_config(args.config.as_deref())?;
            write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Dispatches suite subcommands.
fn command_suite(command: &SuiteCommand) -> CliResult<ExitCode> {
    match command {
        SuiteCommand::Show(args) => {
            let config = load_config(args.config.as_deref())?;
            let suite =
                config.suite().map_err(|err| CliError::new(format!("invalid suite: {err}")))?;
            let rendered = serde_json::to_string_pretty(&suite)
                .map_err(|err| CliError::new(format!("failed to serialize suite: {err}")))?;
            write_stdout_line(&rendered)
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Target Resolution
// ============================================================================

/// Loads the config file.
fn load_config(path: Option<&Path>) -> CliResult<HoststateConfig> {
    HoststateConfig::load(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Loads config and folds in CLI overrides and the inventory environment value.
///
/// Only the inventory commands read the inventory variable.
fn resolve_target(target: &TargetArgs) -> CliResult<SuiteConfig> {
    let config = load_config(target.config.as_deref())?;
    let inventory_env = read_env_strict(INVENTORY_ENV_VAR).map_err(CliError::new)?;
    SuiteConfig::resolve(
        &config,
        target.inventory.as_deref(),
        target.group.as_deref(),
        inventory_env.as_deref(),
    )
    .map_err(|err| CliError::new(err.to_string()))
}

/// Resolves the target group's hosts, rejecting an empty group.
fn load_hosts(resolved: &SuiteConfig) -> CliResult<Vec<InventoryHost>> {
    let hosts = resolve_hosts(&resolved.inventory_path, &resolved.group)
        .map_err(|err| CliError::new(err.to_string()))?;
    if hosts.is_empty() {
        return Err(CliError::new(format!(
            "inventory group {} in {} has no hosts",
            resolved.group,
            resolved.inventory_path.display()
        )));
    }
    info!(
        inventory = %resolved.inventory_path.display(),
        group = %resolved.group,
        hosts = hosts.len(),
        "inventory resolved"
    );
    Ok(hosts)
}

// ============================================================================
// SECTION: Environment Helpers
// ============================================================================

/// Reads an environment variable, rejecting non-UTF-8 values.
///
/// # Errors
///
/// Returns an error when the variable is set but not valid UTF-8.
fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("error: {message}"));
    ExitCode::FAILURE
}
