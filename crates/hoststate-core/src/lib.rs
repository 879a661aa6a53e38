// crates/hoststate-core/src/lib.rs
// ============================================================================
// Module: Hoststate Core Library
// Description: Public API surface for the Hoststate core.
// Purpose: Expose host state types, the inspector interface, and checks.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Hoststate core verifies provisioned hosts through point-in-time queries.
//! Checks assert package installation, service status, and file content
//! against any [`HostInspector`] implementation. The suite runner expands a
//! case table across hosts and collects every failure into a report.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::HostHandle;
pub use interfaces::HostInspector;
pub use interfaces::InspectError;
pub use runtime::SuiteRunner;
pub use runtime::check_file;
pub use runtime::check_package;
pub use runtime::check_service;
pub use runtime::run_case;
