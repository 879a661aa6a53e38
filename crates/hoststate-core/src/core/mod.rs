// crates/hoststate-core/src/core/mod.rs
// ============================================================================
// Module: Hoststate Core Types
// Description: Canonical snapshots, suite model, and report structures.
// Purpose: Provide stable, serializable types shared by every Hoststate crate.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what a check reads ([`state`]), what a run evaluates
//! ([`suite`]), and what a run produces ([`report`]).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod report;
pub mod state;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use report::Assertion;
pub use report::AssertionFailure;
pub use report::CaseResult;
pub use report::CheckOutcome;
pub use report::ReportSummary;
pub use report::SuiteReport;
pub use state::FileState;
pub use state::PackageState;
pub use state::ServiceState;
pub use suite::CheckCase;
pub use suite::DEFAULT_FILES;
pub use suite::DEFAULT_PACKAGES;
pub use suite::DEFAULT_SERVICES;
pub use suite::MAX_SUITE_CASES;
pub use suite::Suite;
pub use suite::SuiteError;
