// crates/hoststate-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: In-memory host inspector for check and runner tests.
// Purpose: Provide deterministic host state without touching real machines.
// Dependencies: hoststate-core
// ============================================================================

//! ## Overview
//! [`FakeHost`] answers queries from in-memory maps and counts every query so
//! tests can assert that checks are pure reads.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use hoststate_core::FileState;
use hoststate_core::HostInspector;
use hoststate_core::InspectError;
use hoststate_core::PackageState;
use hoststate_core::ServiceState;

// ============================================================================
// SECTION: Fake Host
// ============================================================================

/// In-memory host state.
#[derive(Default)]
pub struct FakeHost {
    /// Installed package names.
    pub packages: BTreeSet<String>,
    /// Service name to (running, enabled).
    pub services: BTreeMap<String, (bool, bool)>,
    /// File path to content.
    pub files: BTreeMap<String, String>,
    /// Paths that exist but cannot be read.
    pub unreadable: BTreeSet<String>,
    /// When set, every query fails with this error.
    pub fail_with: Option<InspectError>,
    /// Number of queries answered.
    pub queries: AtomicUsize,
}

impl FakeHost {
    /// Returns a host provisioned as a web server behind firewalld.
    #[must_use]
    pub fn provisioned() -> Self {
        Self::default()
            .with_package("httpd")
            .with_package("firewalld")
            .with_service("httpd", true, true)
            .with_service("firewalld", true, true)
            .with_file(
                "/etc/firewalld/zones/public.xml",
                "<zone>\n  <service name=\"ssh\"/>\n  <service name=\"http\"/>\n</zone>\n",
            )
            .with_file("/var/www/html/index.html", "<html>Managed by Ansible</html>")
    }

    /// Marks a package installed.
    #[must_use]
    pub fn with_package(mut self, name: &str) -> Self {
        self.packages.insert(name.to_string());
        self
    }

    /// Removes a package.
    #[must_use]
    pub fn without_package(mut self, name: &str) -> Self {
        self.packages.remove(name);
        self
    }

    /// Sets service state.
    #[must_use]
    pub fn with_service(mut self, name: &str, running: bool, enabled: bool) -> Self {
        self.services.insert(name.to_string(), (running, enabled));
        self
    }

    /// Sets file content.
    #[must_use]
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// Removes a file.
    #[must_use]
    pub fn without_file(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    /// Marks a path as existing but unreadable.
    #[must_use]
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.files.remove(path);
        self.unreadable.insert(path.to_string());
        self
    }

    /// Makes every query fail.
    #[must_use]
    pub fn failing(mut self, error: InspectError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// Returns the number of queries answered so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Records a query and returns the configured failure, if any.
    fn record(&self) -> Result<(), InspectError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.fail_with.clone().map_or(Ok(()), Err)
    }
}

impl HostInspector for FakeHost {
    fn package(&self, name: &str) -> Result<PackageState, InspectError> {
        self.record()?;
        Ok(PackageState::new(name, self.packages.contains(name)))
    }

    fn service(&self, name: &str) -> Result<ServiceState, InspectError> {
        self.record()?;
        let (running, enabled) = self.services.get(name).copied().unwrap_or((false, false));
        Ok(ServiceState::new(name, running, enabled))
    }

    fn file(&self, path: &str) -> Result<FileState, InspectError> {
        self.record()?;
        if self.unreadable.contains(path) {
            return Ok(FileState::unreadable(path));
        }
        Ok(self.files.get(path).map_or_else(
            || FileState::missing(path),
            |content| FileState::present(path, content.as_bytes()),
        ))
    }
}
