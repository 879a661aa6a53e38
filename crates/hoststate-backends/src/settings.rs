// crates/hoststate-backends/src/settings.rs
// ============================================================================
// Module: Backend Settings
// Description: Tunables for command-backed inspection.
// Purpose: Select the package manager, transport programs, and read limits.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`BackendSettings`] is deserialized from the `[backend]` config table and
//! handed to every inspector. Range checks live with the config loader.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum file bytes read by a file probe.
pub const DEFAULT_MAX_FILE_BYTES: usize = 1024 * 1024;
/// Upper bound accepted for `max_file_bytes`.
pub const MAX_FILE_BYTES_LIMIT: usize = 64 * 1024 * 1024;
/// Default SSH client program.
const DEFAULT_SSH_PROGRAM: &str = "ssh";

// ============================================================================
// SECTION: Package Manager
// ============================================================================

/// Package database queried by package probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageManager {
    /// Detect rpm or dpkg on first use.
    #[default]
    Auto,
    /// RPM database (`rpm -q`).
    Rpm,
    /// Debian package database (`dpkg-query`).
    Dpkg,
}

impl PackageManager {
    /// Returns the manager label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Rpm => "rpm",
            Self::Dpkg => "dpkg",
        }
    }
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Backend configuration shared by all inspectors in a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendSettings {
    /// Package manager selection.
    #[serde(default)]
    pub package_manager: PackageManager,
    /// Maximum bytes read from a single file.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    /// SSH client program.
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,
    /// Extra arguments passed to the SSH client before the destination.
    #[serde(default)]
    pub ssh_options: Vec<String>,
    /// Container engine program override. Defaults to the engine name.
    #[serde(default)]
    pub container_program: Option<String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            package_manager: PackageManager::Auto,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            ssh_program: default_ssh_program(),
            ssh_options: Vec::new(),
            container_program: None,
        }
    }
}

/// Serde default for `max_file_bytes`.
const fn default_max_file_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

/// Serde default for `ssh_program`.
fn default_ssh_program() -> String {
    DEFAULT_SSH_PROGRAM.to_string()
}
