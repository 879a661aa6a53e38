// crates/hoststate-core/src/runtime/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Table-driven execution of a suite across resolved hosts.
// Purpose: Invoke one check per (host, case) pair and collect every failure.
// Dependencies: crate::{core, interfaces, runtime::checks}, tracing
// ============================================================================

//! ## Overview
//! The runner walks hosts in the given order and cases in suite order. A failed
//! invocation never stops the run. Invocations share no state, so the order
//! only affects report layout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::info;
use tracing::info_span;

use crate::core::CaseResult;
use crate::core::Suite;
use crate::core::SuiteReport;
use crate::interfaces::HostHandle;
use crate::runtime::checks::run_case;

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Executes a suite against host handles.
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    /// Suite applied to every host.
    suite: Suite,
}

impl SuiteRunner {
    /// Creates a runner for the given suite.
    #[must_use]
    pub const fn new(suite: Suite) -> Self {
        Self {
            suite,
        }
    }

    /// Returns the suite this runner evaluates.
    #[must_use]
    pub const fn suite(&self) -> &Suite {
        &self.suite
    }

    /// Runs every case against every host and returns the collected report.
    #[must_use]
    pub fn run(&self, hosts: &[HostHandle]) -> SuiteReport {
        let mut results = Vec::with_capacity(hosts.len() * self.suite.len());
        for host in hosts {
            let span = info_span!("host", host = host.name());
            let _entered = span.enter();
            for case in &self.suite.cases {
                let outcome = run_case(host, case);
                results.push(CaseResult {
                    host: host.name().to_string(),
                    case: case.clone(),
                    failures: outcome.failures,
                });
            }
        }
        let report = SuiteReport::from_results(hosts.len(), results);
        info!(
            hosts = report.summary.hosts,
            passed = report.summary.passed,
            failed = report.summary.failed,
            "suite run complete"
        );
        report
    }
}
