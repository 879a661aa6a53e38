// crates/hoststate-config/src/lib.rs
// ============================================================================
// Module: Hoststate Config Library
// Description: Config model, validation, and run resolution.
// Purpose: Single source of truth for hoststate.toml semantics.
// Dependencies: hoststate-backends, hoststate-core, serde, toml
// ============================================================================

//! ## Overview
//! `hoststate-config` loads `hoststate.toml`, validates it fail-closed, and
//! folds CLI overrides into an explicit [`SuiteConfig`] for a run.
//!
//! Security posture: config inputs are untrusted. Files are size-limited,
//! must be UTF-8, and reject unknown keys.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
