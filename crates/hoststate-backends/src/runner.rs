// crates/hoststate-backends/src/runner.rs
// ============================================================================
// Module: Command Runner
// Description: Process execution seam for shell probes.
// Purpose: Run one program with arguments and capture its exit status and output.
// Dependencies: hoststate-core
// ============================================================================

//! ## Overview
//! [`CommandRunner`] is the only place where processes are spawned.
//! [`ProcessRunner`] is the production implementation; tests substitute a
//! scripted runner. Stdin is closed so probes never wait for input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::Command;
use std::process::Stdio;

use hoststate_core::InspectError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum stderr bytes carried into error messages.
const MAX_STDERR_EXCERPT: usize = 512;

// ============================================================================
// SECTION: Command Output
// ============================================================================

/// Captured result of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured stdout bytes.
    pub stdout: Vec<u8>,
    /// Captured stderr bytes.
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Creates a successful output with the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Creates a failed output with the given exit code and stderr.
    #[must_use]
    pub fn failure(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns true when the command exited with status zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Returns a trimmed, length-limited excerpt of stderr.
    #[must_use]
    pub fn stderr_excerpt(&self) -> String {
        let end = self.stderr.len().min(MAX_STDERR_EXCERPT);
        String::from_utf8_lossy(&self.stderr[..end]).trim().to_string()
    }
}

// ============================================================================
// SECTION: Runner Trait
// ============================================================================

/// Runs a program and captures its output.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::Transport`] when the process cannot be spawned
    /// or awaited. A non-zero exit is reported through [`CommandOutput`].
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, InspectError>;
}

// ============================================================================
// SECTION: Process Runner
// ============================================================================

/// Runner backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, InspectError> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        let output = cmd.output().map_err(|err| {
            InspectError::Transport(format!("failed to spawn {program}: {err}"))
        })?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
