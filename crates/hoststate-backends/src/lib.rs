// crates/hoststate-backends/src/lib.rs
// ============================================================================
// Module: Hoststate Backends
// Description: Command-backed host inspection over local, SSH, and container transports.
// Purpose: Answer package, service, and file queries by running shell probes.
// Dependencies: hoststate-core, hoststate-inventory, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`CommandInspector`] implements [`hoststate_core::HostInspector`] by
//! running short POSIX shell probes on the target through a [`Transport`].
//! Process execution sits behind [`CommandRunner`] so tests can script host
//! responses. Probes are read-only and every argument is single-quoted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod inspector;
pub mod runner;
pub mod settings;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use inspector::CommandInspector;
pub use inspector::connect;
pub use runner::CommandOutput;
pub use runner::CommandRunner;
pub use runner::ProcessRunner;
pub use settings::BackendSettings;
pub use settings::DEFAULT_MAX_FILE_BYTES;
pub use settings::MAX_FILE_BYTES_LIMIT;
pub use settings::PackageManager;
pub use transport::Transport;
pub use transport::shell_quote;
