// crates/hoststate-core/src/core/state.rs
// ============================================================================
// Module: Host State Snapshots
// Description: Point-in-time query results for packages, services, and files.
// Purpose: Provide immutable, serializable snapshots returned by inspectors.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! State snapshots are produced by a [`crate::HostInspector`] once per query and
//! never mutated afterwards. Checks read them to decide pass or fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Package State
// ============================================================================

/// Installed state of a named package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageState {
    /// Package name as queried.
    pub name: String,
    /// True when the package manager reports the package installed.
    pub installed: bool,
}

impl PackageState {
    /// Creates a package snapshot.
    #[must_use]
    pub fn new(name: impl Into<String>, installed: bool) -> Self {
        Self {
            name: name.into(),
            installed,
        }
    }
}

// ============================================================================
// SECTION: Service State
// ============================================================================

/// Running and boot-enabled state of a named service.
///
/// # Invariants
/// - `running` and `enabled` are independent; neither is derived from the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    /// Service name as queried.
    pub name: String,
    /// True when the service is currently active.
    pub running: bool,
    /// True when the service is configured to start at boot.
    pub enabled: bool,
}

impl ServiceState {
    /// Creates a service snapshot.
    #[must_use]
    pub fn new(name: impl Into<String>, running: bool, enabled: bool) -> Self {
        Self {
            name: name.into(),
            running,
            enabled,
        }
    }
}

// ============================================================================
// SECTION: File State
// ============================================================================

/// Existence and content of a filesystem path.
///
/// # Invariants
/// - `content` is `None` whenever `exists` is false.
/// - `content` is also `None` for an existing path that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileState {
    /// Absolute path as queried.
    pub path: String,
    /// True when the path exists on the host.
    pub exists: bool,
    /// Raw file bytes, when the file exists and was read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<u8>>,
}

impl FileState {
    /// Creates a snapshot for an existing file with the given content.
    #[must_use]
    pub fn present(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            exists: true,
            content: Some(content.into()),
        }
    }

    /// Creates a snapshot for a path that exists but could not be read, such as
    /// a directory or a file without read permission.
    #[must_use]
    pub fn unreadable(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exists: true,
            content: None,
        }
    }

    /// Creates a snapshot for a path that does not exist.
    #[must_use]
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exists: false,
            content: None,
        }
    }

    /// Returns true when the content contains `needle` as a literal substring.
    ///
    /// Matching is case-sensitive and byte-exact. A missing or unreadable file
    /// contains nothing, and an empty needle matches any file that was read.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let Some(content) = self.content.as_deref() else {
            return false;
        };
        let needle = needle.as_bytes();
        if needle.is_empty() {
            return true;
        }
        if needle.len() > content.len() {
            return false;
        }
        content.windows(needle.len()).any(|window| window == needle)
    }
}
