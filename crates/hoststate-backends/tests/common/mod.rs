// crates/hoststate-backends/tests/common/mod.rs
// ============================================================================
// Module: Backend Test Helpers
// Description: Scripted command runner for inspector tests.
// Purpose: Stand in for real hosts by answering probe scripts.
// Dependencies: hoststate-backends, hoststate-core
// ============================================================================

//! ## Overview
//! [`ScriptedRunner`] answers a command by the first rule whose needle occurs
//! in the final argument (the probe script). Every call is recorded.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::sync::Mutex;

use hoststate_backends::CommandOutput;
use hoststate_backends::CommandRunner;
use hoststate_core::InspectError;

/// Runner returning canned responses keyed by script fragments.
#[derive(Default)]
pub struct ScriptedRunner {
    /// Ordered (needle, response) rules.
    rules: Vec<(String, Result<CommandOutput, InspectError>)>,
    /// Recorded (program, args) calls.
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedRunner {
    /// Creates a runner with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers scripts containing `needle` with a successful `stdout`.
    pub fn reply(mut self, needle: &str, stdout: &str) -> Self {
        self.rules.push((needle.to_string(), Ok(CommandOutput::success(stdout))));
        self
    }

    /// Answers scripts containing `needle` with raw stdout bytes.
    pub fn reply_bytes(mut self, needle: &str, stdout: &[u8]) -> Self {
        self.rules.push((needle.to_string(), Ok(CommandOutput::success(stdout.to_vec()))));
        self
    }

    /// Answers scripts containing `needle` with a non-zero exit.
    pub fn exit(mut self, needle: &str, code: i32, stderr: &str) -> Self {
        self.rules.push((needle.to_string(), Ok(CommandOutput::failure(code, stderr))));
        self
    }

    /// Answers scripts containing `needle` with a runner error.
    pub fn error(mut self, needle: &str, err: InspectError) -> Self {
        self.rules.push((needle.to_string(), Err(err)));
        self
    }

    /// Returns the recorded calls.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Counts calls whose script contains `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .filter(|(_, args)| args.last().is_some_and(|script| script.contains(needle)))
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, InspectError> {
        self.calls.lock().unwrap().push((program.to_string(), args.to_vec()));
        let script = args.last().cloned().unwrap_or_default();
        self.rules
            .iter()
            .find(|(needle, _)| script.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Err(InspectError::Transport(format!("no scripted reply for {script}"))))
    }
}
