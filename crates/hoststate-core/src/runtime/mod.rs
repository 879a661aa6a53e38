// crates/hoststate-core/src/runtime/mod.rs
// ============================================================================
// Module: Hoststate Runtime
// Description: Check evaluation and suite execution.
// Purpose: Group the assertion logic and the table-driven runner.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime components evaluate checks against host inspectors.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod checks;
pub mod runner;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use checks::check_file;
pub use checks::check_package;
pub use checks::check_service;
pub use checks::run_case;
pub use runner::SuiteRunner;
