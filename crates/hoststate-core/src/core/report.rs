// crates/hoststate-core/src/core/report.rs
// ============================================================================
// Module: Check Reports
// Description: Assertion failures, per-case outcomes, and suite summaries.
// Purpose: Record every failure of a run without stopping at the first.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every check invocation yields a [`CheckOutcome`] listing its failed
//! assertions. The runner wraps outcomes into [`CaseResult`] rows and folds
//! them into a [`SuiteReport`]. Reports serialize to JSON and render as text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Deserialize;
use serde::Serialize;

use crate::core::suite::CheckCase;

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Assertion evaluated by a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assertion {
    /// Package is installed.
    PackageInstalled,
    /// Service is running.
    ServiceRunning,
    /// Service is enabled at boot.
    ServiceEnabled,
    /// File exists.
    FileExists,
    /// File contains the expected substring.
    FileContains,
}

impl Assertion {
    /// Returns a stable label for the assertion.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PackageInstalled => "package_installed",
            Self::ServiceRunning => "service_running",
            Self::ServiceEnabled => "service_enabled",
            Self::FileExists => "file_exists",
            Self::FileContains => "file_contains",
        }
    }
}

/// A single failed assertion.
///
/// Absent resources and resources in the wrong state are reported the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Assertion that did not hold.
    pub assertion: Assertion,
    /// Human-readable description.
    pub message: String,
}

impl AssertionFailure {
    /// Creates an assertion failure.
    #[must_use]
    pub fn new(assertion: Assertion, message: impl Into<String>) -> Self {
        Self {
            assertion,
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Outcome of one check invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Failed assertions in evaluation order. Empty means pass.
    pub failures: Vec<AssertionFailure>,
}

impl CheckOutcome {
    /// Returns a passing outcome.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Records a failure when `holds` is false.
    pub fn require(&mut self, holds: bool, assertion: Assertion, message: impl FnOnce() -> String) {
        if !holds {
            self.failures.push(AssertionFailure::new(assertion, message()));
        }
    }

    /// Returns true when no assertion failed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result row for a single (host, case) invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Host name the case ran against.
    pub host: String,
    /// Case that was evaluated.
    pub case: CheckCase,
    /// Failed assertions. Empty means pass.
    pub failures: Vec<AssertionFailure>,
}

impl CaseResult {
    /// Returns true when the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// SECTION: Suite Report
// ============================================================================

/// Aggregate counts for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of hosts checked.
    pub hosts: usize,
    /// Total (host, case) invocations.
    pub total: usize,
    /// Invocations with no failures.
    pub passed: usize,
    /// Invocations with at least one failure.
    pub failed: usize,
}

/// Full result of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Per-invocation results in host order, then case order.
    pub results: Vec<CaseResult>,
    /// Aggregate counts.
    pub summary: ReportSummary,
}

impl SuiteReport {
    /// Builds a report from result rows.
    #[must_use]
    pub fn from_results(hosts: usize, results: Vec<CaseResult>) -> Self {
        let passed = results.iter().filter(|result| result.passed()).count();
        let summary = ReportSummary {
            hosts,
            total: results.len(),
            passed,
            failed: results.len() - passed,
        };
        Self {
            results,
            summary,
        }
    }

    /// Returns true when every invocation passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    /// Returns the failing rows.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|result| !result.passed())
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Renders a plain-text report, one line per invocation.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut output = String::new();
        for result in &self.results {
            let status = if result.passed() { "PASS" } else { "FAIL" };
            let _ = writeln!(output, "{status} {} {}", result.host, result.case);
            for failure in &result.failures {
                let _ = writeln!(output, "    - {}: {}", failure.assertion.as_str(), failure.message);
            }
        }
        let _ = writeln!(
            output,
            "{} passed, {} failed, {} total across {} host(s)",
            self.summary.passed, self.summary.failed, self.summary.total, self.summary.hosts
        );
        output
    }
}
