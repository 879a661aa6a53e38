// crates/hoststate-core/src/runtime/checks.rs
// ============================================================================
// Module: Host Checks
// Description: Package, service, and file assertions over a host inspector.
// Purpose: Turn point-in-time snapshots into pass/fail outcomes.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! Each check issues one query and evaluates its assertions independently, so a
//! single invocation may report more than one failure. Checks hold no state
//! and never retry. A failed query fails the invocation closed with one
//! failure naming the query error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;
use tracing::warn;

use crate::core::Assertion;
use crate::core::CheckCase;
use crate::core::CheckOutcome;
use crate::interfaces::HostInspector;
use crate::interfaces::InspectError;

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Asserts that `package_name` is installed.
#[must_use]
pub fn check_package(host: &dyn HostInspector, package_name: &str) -> CheckOutcome {
    let package = match host.package(package_name) {
        Ok(package) => package,
        Err(err) => return query_failed(Assertion::PackageInstalled, package_name, &err),
    };
    debug!(package = package_name, installed = package.installed, "package queried");
    let mut outcome = CheckOutcome::pass();
    outcome.require(package.installed, Assertion::PackageInstalled, || {
        format!("package {package_name} is not installed")
    });
    outcome
}

/// Asserts that `service_name` is both running and enabled.
#[must_use]
pub fn check_service(host: &dyn HostInspector, service_name: &str) -> CheckOutcome {
    let service = match host.service(service_name) {
        Ok(service) => service,
        Err(err) => return query_failed(Assertion::ServiceRunning, service_name, &err),
    };
    debug!(
        service = service_name,
        running = service.running,
        enabled = service.enabled,
        "service queried"
    );
    let mut outcome = CheckOutcome::pass();
    outcome.require(service.running, Assertion::ServiceRunning, || {
        format!("service {service_name} is not running")
    });
    outcome.require(service.enabled, Assertion::ServiceEnabled, || {
        format!("service {service_name} is not enabled")
    });
    outcome
}

/// Asserts that `path` exists and contains `expected_substring`.
///
/// Both assertions are evaluated, so a missing file reports two failures.
#[must_use]
pub fn check_file(host: &dyn HostInspector, path: &str, expected_substring: &str) -> CheckOutcome {
    let file = match host.file(path) {
        Ok(file) => file,
        Err(err) => return query_failed(Assertion::FileExists, path, &err),
    };
    debug!(path, exists = file.exists, "file queried");
    let mut outcome = CheckOutcome::pass();
    outcome.require(file.exists, Assertion::FileExists, || format!("file {path} does not exist"));
    outcome.require(file.contains(expected_substring), Assertion::FileContains, || {
        if file.exists && file.content.is_none() {
            format!("file {path} could not be read")
        } else {
            format!("file {path} does not contain `{expected_substring}`")
        }
    });
    outcome
}

/// Dispatches a suite case to its check.
#[must_use]
pub fn run_case(host: &dyn HostInspector, case: &CheckCase) -> CheckOutcome {
    match case {
        CheckCase::Package {
            name,
        } => check_package(host, name),
        CheckCase::Service {
            name,
        } => check_service(host, name),
        CheckCase::File {
            path,
            contains,
        } => check_file(host, path, contains),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the single-failure outcome for a query that could not be answered.
fn query_failed(assertion: Assertion, target: &str, err: &InspectError) -> CheckOutcome {
    warn!(target_resource = target, error = %err, "host query failed");
    let mut outcome = CheckOutcome::pass();
    outcome.require(false, assertion, || format!("query for {target} failed: {err}"));
    outcome
}
