// crates/hoststate-backends/src/inspector.rs
// ============================================================================
// Module: Command Inspector
// Description: Host inspector backed by shell probes.
// Purpose: Translate package, service, and file queries into probe scripts.
// Dependencies: hoststate-core, hoststate-inventory, tracing
// ============================================================================

//! ## Overview
//! Each query runs one script through the host's [`Transport`]. Scripts report
//! the exit codes of the underlying tools on stdout and always exit zero, so a
//! non-zero exit from the transport means the probe never ran. Probe exit
//! codes that carry meaning (not installed, inactive) become state; code 127
//! (tool missing) becomes an [`InspectError::Probe`].
//!
//! Security posture: every interpolated value is single-quoted, and file reads
//! are capped at `max_file_bytes + 1` bytes on the target.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::OnceLock;

use hoststate_core::FileState;
use hoststate_core::HostHandle;
use hoststate_core::HostInspector;
use hoststate_core::InspectError;
use hoststate_core::PackageState;
use hoststate_core::ServiceState;
use hoststate_inventory::InventoryHost;
use tracing::debug;

use crate::runner::CommandOutput;
use crate::runner::CommandRunner;
use crate::settings::BackendSettings;
use crate::settings::PackageManager;
use crate::transport::Transport;
use crate::transport::shell_quote;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Shell exit code for "command not found".
const EXIT_NOT_FOUND: i32 = 127;
/// dpkg status for an installed package.
const DPKG_INSTALLED: &str = "install ok installed";
/// File probe marker for an existing path.
const MARKER_PRESENT: &[u8] = b"present";
/// File probe marker for a missing path.
const MARKER_MISSING: &[u8] = b"missing";
/// Detection script choosing the package database.
const DETECT_SCRIPT: &str = "if command -v rpm >/dev/null 2>&1; then echo rpm; \
     elif command -v dpkg-query >/dev/null 2>&1; then echo dpkg; else echo none; fi";

// ============================================================================
// SECTION: Package Database
// ============================================================================

/// Package database resolved for a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Database {
    /// RPM database.
    Rpm,
    /// dpkg database.
    Dpkg,
}

impl Database {
    /// Returns the database label.
    const fn as_str(self) -> &'static str {
        match self {
            Self::Rpm => "rpm",
            Self::Dpkg => "dpkg",
        }
    }
}

// ============================================================================
// SECTION: Inspector
// ============================================================================

/// [`HostInspector`] that runs shell probes through a [`Transport`].
pub struct CommandInspector {
    /// Inventory host name, used for logging.
    host: String,
    /// Transport reaching the host.
    transport: Transport,
    /// Process runner.
    runner: Arc<dyn CommandRunner>,
    /// Configured package manager selection.
    package_manager: PackageManager,
    /// Database chosen by detection, cached for the inspector's lifetime.
    detected: OnceLock<Database>,
    /// Maximum bytes read from a file.
    max_file_bytes: usize,
}

impl CommandInspector {
    /// Creates an inspector for `host` reached through `transport`.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        transport: Transport,
        runner: Arc<dyn CommandRunner>,
        settings: &BackendSettings,
    ) -> Self {
        Self {
            host: host.into(),
            transport,
            runner,
            package_manager: settings.package_manager,
            detected: OnceLock::new(),
            max_file_bytes: settings.max_file_bytes,
        }
    }

    /// Returns the transport used by this inspector.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Runs `script` on the host and requires a zero transport exit.
    fn exec(&self, script: &str) -> Result<CommandOutput, InspectError> {
        let (program, args) = self.transport.command(script);
        let output = self.runner.run(&program, &args)?;
        if output.succeeded() {
            return Ok(output);
        }
        let code = output.code.map_or_else(|| "signal".to_string(), |code| code.to_string());
        Err(InspectError::Transport(format!(
            "{} exited with {code}: {}",
            self.transport,
            output.stderr_excerpt()
        )))
    }

    /// Returns the package database, detecting it on first use.
    fn database(&self) -> Result<Database, InspectError> {
        match self.package_manager {
            PackageManager::Rpm => return Ok(Database::Rpm),
            PackageManager::Dpkg => return Ok(Database::Dpkg),
            PackageManager::Auto => {}
        }
        if let Some(database) = self.detected.get() {
            return Ok(*database);
        }
        let output = self.exec(DETECT_SCRIPT)?;
        let database = match String::from_utf8_lossy(&output.stdout).trim() {
            "rpm" => Database::Rpm,
            "dpkg" => Database::Dpkg,
            _ => {
                return Err(InspectError::Probe(format!(
                    "no supported package manager found on {}",
                    self.host
                )));
            }
        };
        debug!(host = %self.host, database = database.as_str(), "package manager detected");
        Ok(*self.detected.get_or_init(|| database))
    }

    /// Maps a probe exit code of 127 to a missing-tool error.
    fn require_tool(&self, tool: &str, code: i32) -> Result<i32, InspectError> {
        if code == EXIT_NOT_FOUND {
            return Err(InspectError::Probe(format!("{tool} is not available on {}", self.host)));
        }
        Ok(code)
    }
}

impl HostInspector for CommandInspector {
    fn package(&self, name: &str) -> Result<PackageState, InspectError> {
        let database = self.database()?;
        let quoted = shell_quote(name);
        let installed = match database {
            Database::Rpm => {
                let script = format!("rpm -q --quiet {quoted}; printf '%s\\n' \"$?\"");
                let output = self.exec(&script)?;
                let (_, codes) = split_codes(&output.stdout, 1)?;
                self.require_tool("rpm", codes[0])? == 0
            }
            Database::Dpkg => {
                let script = format!(
                    "dpkg-query -f '${{Status}}\\n' -W {quoted} 2>/dev/null; printf '%s\\n' \"$?\""
                );
                let output = self.exec(&script)?;
                let (body, codes) = split_codes(&output.stdout, 1)?;
                self.require_tool("dpkg-query", codes[0])? == 0
                    && body.lines().any(|line| line.trim() == DPKG_INSTALLED)
            }
        };
        debug!(host = %self.host, package = name, installed, "package queried");
        Ok(PackageState::new(name, installed))
    }

    fn service(&self, name: &str) -> Result<ServiceState, InspectError> {
        let quoted = shell_quote(name);
        let script = format!(
            "systemctl is-active --quiet {quoted}; printf '%s\\n' \"$?\"; \
             systemctl is-enabled --quiet {quoted}; printf '%s\\n' \"$?\""
        );
        let output = self.exec(&script)?;
        let (_, codes) = split_codes(&output.stdout, 2)?;
        let running = self.require_tool("systemctl", codes[0])? == 0;
        let enabled = self.require_tool("systemctl", codes[1])? == 0;
        debug!(host = %self.host, service = name, running, enabled, "service queried");
        Ok(ServiceState::new(name, running, enabled))
    }

    fn file(&self, path: &str) -> Result<FileState, InspectError> {
        let quoted = shell_quote(path);
        let read_limit = self.max_file_bytes.saturating_add(1);
        let script = format!(
            "if test -e {quoted}; then printf 'present\\n'; head -c {read_limit} -- {quoted} \
             2>/dev/null; printf '\\n%s\\n' \"$?\"; else printf 'missing\\n'; fi"
        );
        let output = self.exec(&script)?;
        let newline = output
            .stdout
            .iter()
            .position(|byte| *byte == b'\n')
            .ok_or_else(|| InspectError::Probe(format!("file probe for {path} gave no marker")))?;
        let (marker, rest) = output.stdout.split_at(newline);
        let state = match marker {
            MARKER_MISSING => FileState::missing(path),
            MARKER_PRESENT => {
                let (content, code) = split_trailing_code(&rest[1..])?;
                match self.require_tool("head", code)? {
                    0 if content.len() > self.max_file_bytes => {
                        return Err(InspectError::Limit(format!(
                            "{path} exceeds {} bytes",
                            self.max_file_bytes
                        )));
                    }
                    0 => FileState::present(path, content.to_vec()),
                    _ => FileState::unreadable(path),
                }
            }
            _ => {
                return Err(InspectError::Probe(format!(
                    "file probe for {path} gave an unknown marker"
                )));
            }
        };
        debug!(host = %self.host, path, exists = state.exists, "file queried");
        Ok(state)
    }
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds a [`HostHandle`] for an inventory host.
#[must_use]
pub fn connect(
    host: &InventoryHost,
    settings: &BackendSettings,
    runner: Arc<dyn CommandRunner>,
) -> HostHandle {
    let transport = Transport::for_connection(&host.connection, settings);
    HostHandle::new(host.name.clone(), CommandInspector::new(&host.name, transport, runner, settings))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits raw file probe output into the content and the trailing exit code.
///
/// The probe prints `\n<code>\n` after the content, so the content keeps its
/// bytes exactly, including a missing final newline.
pub(crate) fn split_trailing_code(output: &[u8]) -> Result<(&[u8], i32), InspectError> {
    let missing = || InspectError::Probe("file probe output is missing its exit code".to_string());
    let trimmed = output.strip_suffix(b"\n").ok_or_else(missing)?;
    let split = trimmed.iter().rposition(|byte| *byte == b'\n').ok_or_else(missing)?;
    let code = std::str::from_utf8(&trimmed[split + 1..])
        .ok()
        .and_then(|text| text.trim().parse::<i32>().ok())
        .ok_or_else(|| InspectError::Probe("file probe exit code is not numeric".to_string()))?;
    Ok((&trimmed[..split], code))
}

/// Splits probe stdout into its body and the trailing `count` exit codes.
pub(crate) fn split_codes(stdout: &[u8], count: usize) -> Result<(String, Vec<i32>), InspectError> {
    let text = String::from_utf8_lossy(stdout);
    let mut lines: Vec<&str> = text.lines().collect();
    if lines.len() < count {
        return Err(InspectError::Probe("probe output is missing exit codes".to_string()));
    }
    let tail = lines.split_off(lines.len() - count);
    let codes = tail
        .iter()
        .map(|line| {
            line.trim().parse::<i32>().map_err(|_| {
                InspectError::Probe(format!("probe exit code is not numeric: {line}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((lines.join("\n"), codes))
}
