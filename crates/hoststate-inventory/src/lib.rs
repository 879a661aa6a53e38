// crates/hoststate-inventory/src/lib.rs
// ============================================================================
// Module: Hoststate Inventory
// Description: Ansible-style inventory parsing and host resolution.
// Purpose: Resolve the target hosts of a run from an explicit inventory path.
// Dependencies: serde, serde_yaml, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate loads YAML or INI inventories, resolves a named group into its
//! hosts, and derives each host's connection from its variables. Loading is
//! bounded by a size limit and fails closed on malformed content. Callers pass
//! the inventory path explicitly. Nothing here reads the environment.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod connection;
mod ini;
pub mod inventory;
mod yaml;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use connection::Connection;
pub use connection::ContainerEngine;
pub use connection::SshTarget;
pub use inventory::GROUP_ALL;
pub use inventory::GROUP_UNGROUPED;
pub use inventory::Inventory;
pub use inventory::InventoryError;
pub use inventory::InventoryFormat;
pub use inventory::InventoryHost;
pub use inventory::MAX_INVENTORY_BYTES;
pub use inventory::Vars;
pub use inventory::resolve_hosts;
