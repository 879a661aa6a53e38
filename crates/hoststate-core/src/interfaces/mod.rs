// crates/hoststate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Hoststate Interfaces
// Description: Backend-agnostic host inspection contract and host handles.
// Purpose: Define the seam between checks and concrete inspection backends.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Checks never talk to a machine directly. They query a [`HostInspector`],
//! which answers point-in-time questions about packages, services, and files.
//! Implementations must be read-only and synchronous.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::FileState;
use crate::core::PackageState;
use crate::core::ServiceState;

// ============================================================================
// SECTION: Host Inspector
// ============================================================================

/// Host inspection errors.
///
/// These describe a failed query, not a failed assertion. An unknown package
/// or a missing file is a state, not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InspectError {
    /// Transport to the host could not be established or executed.
    #[error("transport error: {0}")]
    Transport(String),
    /// The probe ran but produced output the backend could not interpret.
    #[error("probe error: {0}")]
    Probe(String),
    /// Query output exceeded a configured limit.
    #[error("limit exceeded: {0}")]
    Limit(String),
}

/// Backend-agnostic, read-only host inspector.
pub trait HostInspector {
    /// Queries the installed state of a package.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError`] when the query cannot be performed.
    fn package(&self, name: &str) -> Result<PackageState, InspectError>;

    /// Queries the running and enabled state of a service.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError`] when the query cannot be performed.
    fn service(&self, name: &str) -> Result<ServiceState, InspectError>;

    /// Queries existence and content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError`] when the query cannot be performed.
    fn file(&self, path: &str) -> Result<FileState, InspectError>;
}

// ============================================================================
// SECTION: Host Handle
// ============================================================================

/// Named reference to a provisioned host.
///
/// # Invariants
/// - Read-only for the lifetime of a run.
pub struct HostHandle {
    /// Host name from the inventory.
    name: String,
    /// Inspector bound to this host.
    inspector: Box<dyn HostInspector + Send + Sync>,
}

impl HostHandle {
    /// Creates a handle for the named host.
    pub fn new(
        name: impl Into<String>,
        inspector: impl HostInspector + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            inspector: Box::new(inspector),
        }
    }

    /// Returns the host name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl HostInspector for HostHandle {
    fn package(&self, name: &str) -> Result<PackageState, InspectError> {
        self.inspector.package(name)
    }

    fn service(&self, name: &str) -> Result<ServiceState, InspectError> {
        self.inspector.service(name)
    }

    fn file(&self, path: &str) -> Result<FileState, InspectError> {
        self.inspector.file(path)
    }
}
