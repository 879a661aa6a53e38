// crates/hoststate-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests for the hoststate binary.
// Purpose: Exercise run, hosts, config, and suite commands end to end.
// Dependencies: hoststate-cli binary, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Runs the CLI binary against a local-connection inventory. File checks hit
//! real temp files through `sh`, so the run path is covered without a
//! package database or init system.
//!
//! Exit codes: 0 when every case passes, 1 on any failure or error.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use tempfile::TempDir;
use tempfile::tempdir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn hoststate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hoststate"))
}

/// Temp workspace with a local inventory, a web root file, and a config
/// checking that file.
struct Fixture {
    /// Owns the temp directory.
    dir: TempDir,
    /// Inventory path.
    inventory: PathBuf,
    /// Config path.
    config: PathBuf,
    /// Checked file path.
    index: PathBuf,
}

impl Fixture {
    fn new(index_content: &str) -> Self {
        let dir = tempdir().expect("temp dir");
        let inventory = dir.path().join("inventory.yml");
        fs::write(
            &inventory,
            "all:\n  hosts:\n    instance:\n      ansible_connection: local\n  children:\n    empty:\n",
        )
        .expect("write inventory");
        let index = dir.path().join("index.html");
        fs::write(&index, index_content).expect("write index");
        let config = dir.path().join("hoststate.toml");
        let toml = format!(
            "[[checks]]\nkind = \"file\"\npath = \"{}\"\ncontains = \"Managed by Ansible\"\n",
            index.display()
        );
        fs::write(&config, toml).expect("write config");
        Self {
            dir,
            inventory,
            config,
            index,
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Runs the binary with a clean environment for hoststate variables.
fn hoststate(args: &[&str]) -> Command {
    let mut command = Command::new(hoststate_bin());
    command.args(args);
    command.env_remove("HOSTSTATE_CONFIG");
    command.env_remove("MOLECULE_INVENTORY_FILE");
    command.env_remove("RUST_LOG");
    command
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ============================================================================
// SECTION: Run
// ============================================================================

#[test]
fn run_passes_for_managed_content() {
    let fixture = Fixture::new("<html>Managed by Ansible</html>");
    let output = hoststate(&[
        "run",
        "--config",
        path_arg(&fixture.config),
        "--inventory",
        path_arg(&fixture.inventory),
    ])
    .output()
    .expect("run");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains(&format!("PASS instance file[{}]", fixture.index.display())));
    assert!(text.contains("1 passed, 0 failed, 1 total across 1 host(s)"));
}

#[test]
fn run_fails_for_unmanaged_content() {
    let fixture = Fixture::new("<html>Unmanaged</html>");
    let output = hoststate(&[
        "run",
        "--config",
        path_arg(&fixture.config),
        "--inventory",
        path_arg(&fixture.inventory),
    ])
    .output()
    .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("FAIL instance"));
    assert!(text.contains("file_contains"));
    assert!(!text.contains("file_exists"));
}

#[test]
fn run_reports_missing_file_as_two_failures() {
    let fixture = Fixture::new("");
    fs::remove_file(&fixture.index).expect("remove index");
    let output = hoststate(&[
        "run",
        "--config",
        path_arg(&fixture.config),
        "--inventory",
        path_arg(&fixture.inventory),
    ])
    .output()
    .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("file_exists"));
    assert!(text.contains("file_contains"));
}

#[test]
fn run_emits_json_report() {
    let fixture = Fixture::new("<html>Managed by Ansible</html>");
    let output = hoststate(&[
        "run",
        "--config",
        path_arg(&fixture.config),
        "--inventory",
        path_arg(&fixture.inventory),
        "--format",
        "json",
    ])
    .output()
    .expect("run");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["summary"]["passed"], 1);
    assert_eq!(report["summary"]["failed"], 0);
    assert_eq!(report["results"][0]["host"], "instance");
}

#[test]
fn run_reads_inventory_from_environment() {
    let fixture = Fixture::new("<html>Managed by Ansible</html>");
    let output = hoststate(&["run", "--config", path_arg(&fixture.config)])
        .env("MOLECULE_INVENTORY_FILE", &fixture.inventory)
        .output()
        .expect("run");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[cfg(unix)]
#[test]
fn non_utf8_inventory_variable_only_affects_inventory_commands() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = Fixture::new("<html>Managed by Ansible</html>");
    let invalid = OsStr::from_bytes(b"/tmp/inventory-\xff.yml");

    let output = hoststate(&["config", "example"])
        .env("MOLECULE_INVENTORY_FILE", invalid)
        .output()
        .expect("config example");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = hoststate(&["config", "validate", "--config", path_arg(&fixture.config)])
        .env("MOLECULE_INVENTORY_FILE", invalid)
        .output()
        .expect("config validate");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = hoststate(&["hosts", "--config", path_arg(&fixture.config)])
        .env("MOLECULE_INVENTORY_FILE", invalid)
        .output()
        .expect("hosts");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("MOLECULE_INVENTORY_FILE must be valid UTF-8"));
}

#[test]
fn run_without_inventory_fails_closed() {
    let fixture = Fixture::new("<html>Managed by Ansible</html>");
    let output = hoststate(&["run", "--config", path_arg(&fixture.config)])
        .current_dir(fixture.path())
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("MOLECULE_INVENTORY_FILE"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn run_with_unknown_group_fails() {
    let fixture = Fixture::new("<html>Managed by Ansible</html>");
    let output = hoststate(&[
        "run",
        "--config",
        path_arg(&fixture.config),
        "--inventory",
        path_arg(&fixture.inventory),
        "--group",
        "staging",
    ])
    .output()
    .expect("run");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown inventory group: staging"));
}

#[test]
fn run_with_empty_group_fails() {
    let fixture = Fixture::new("<html>Managed by Ansible</html>");
    let output = hoststate(&[
        "run",
        "--config",
        path_arg(&fixture.config),
        "--inventory",
        path_arg(&fixture.inventory),
        "--group",
        "empty",
    ])
    .output()
    .expect("run");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("has no hosts"));
}

// ============================================================================
// SECTION: Hosts
// ============================================================================

#[test]
fn hosts_lists_resolved_connections() {
    let fixture = Fixture::new("");
    let output = hoststate(&["hosts", "--inventory", path_arg(&fixture.inventory)])
        .current_dir(fixture.path())
        .output()
        .expect("hosts");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "instance  local\n");
}

// ============================================================================
// SECTION: Config and Suite
// ============================================================================

#[test]
fn config_validate_accepts_fixture_config() {
    let fixture = Fixture::new("");
    let output = hoststate(&["config", "validate", "--config", path_arg(&fixture.config)])
        .output()
        .expect("config validate");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("config ok"));
}

#[test]
fn config_validate_rejects_invalid_config() {
    let fixture = Fixture::new("");
    fs::write(&fixture.config, "[backend]\nmax_file_bytes = 0\n").expect("write config");
    let output = hoststate(&["config", "validate", "--config", path_arg(&fixture.config)])
        .output()
        .expect("config validate");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("backend.max_file_bytes"));
}

#[test]
fn config_example_validates() {
    let dir = tempdir().expect("temp dir");
    let output = hoststate(&["config", "example"]).output().expect("config example");
    assert!(output.status.success());
    let path = dir.path().join("example.toml");
    fs::write(&path, &output.stdout).expect("write example");
    let validate = hoststate(&["config", "validate", "--config", path_arg(&path)])
        .output()
        .expect("config validate");
    assert!(validate.status.success(), "stderr: {}", stderr(&validate));
}

#[test]
fn suite_show_prints_builtin_cases_without_config() {
    let dir = tempdir().expect("temp dir");
    let output =
        hoststate(&["suite", "show"]).current_dir(dir.path()).output().expect("suite show");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let suite: Value = serde_json::from_slice(&output.stdout).expect("json suite");
    let cases = suite["cases"].as_array().expect("cases array");
    assert_eq!(cases.len(), 6);
    assert_eq!(cases[0]["kind"], "package");
    assert_eq!(cases[0]["name"], "httpd");
    assert_eq!(cases[5]["contains"], "Managed by Ansible");
}

#[test]
fn version_flag_prints_version() {
    let output = hoststate(&["--version"]).output().expect("version");
    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("hoststate {}\n", env!("CARGO_PKG_VERSION")));
}
