// crates/hoststate-inventory/src/connection.rs
// ============================================================================
// Module: Host Connections
// Description: Connection settings derived from inventory host variables.
// Purpose: Map Ansible connection variables onto a closed set of transports.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each inventory host carries connection variables. This module interprets
//! `ansible_connection`, `ansible_host`, `ansible_user`, and `ansible_port`.
//! Unsupported connection plugins are rejected rather than guessed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

use crate::inventory::InventoryError;
use crate::inventory::Vars;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Variable selecting the connection plugin.
pub const VAR_CONNECTION: &str = "ansible_connection";
/// Variable overriding the address or container name.
pub const VAR_HOST: &str = "ansible_host";
/// Variable selecting the remote user.
pub const VAR_USER: &str = "ansible_user";
/// Variable selecting the remote port.
pub const VAR_PORT: &str = "ansible_port";

// ============================================================================
// SECTION: Connection Types
// ============================================================================

/// Container engine used for exec-based connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerEngine {
    /// Docker engine.
    Docker,
    /// Podman engine.
    Podman,
}

impl ContainerEngine {
    /// Returns the engine label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Podman => "podman",
        }
    }
}

/// SSH endpoint for a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SshTarget {
    /// Address or hostname to connect to.
    pub address: String,
    /// Optional remote user.
    pub user: Option<String>,
    /// Optional remote port.
    pub port: Option<u16>,
}

/// How to reach an inventory host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Connection {
    /// Commands run on the machine executing the checks.
    Local,
    /// Commands run over SSH.
    Ssh(SshTarget),
    /// Commands run inside a container via the engine's exec.
    Container {
        /// Container engine.
        engine: ContainerEngine,
        /// Container name or id.
        name: String,
    },
}

impl Connection {
    /// Derives the connection for `host` from its merged variables.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Invalid`] when the connection plugin is not
    /// supported or `ansible_port` is not a valid port.
    pub fn from_vars(host: &str, vars: &Vars) -> Result<Self, InventoryError> {
        let target = vars.get(VAR_HOST).map_or(host, String::as_str).to_string();
        let plugin = vars.get(VAR_CONNECTION).map_or("ssh", String::as_str);
        // Fully qualified plugin names resolve by their last segment.
        let plugin = plugin.rsplit('.').next().unwrap_or(plugin);
        match plugin {
            "local" => Ok(Self::Local),
            "docker" => Ok(Self::Container {
                engine: ContainerEngine::Docker,
                name: target,
            }),
            "podman" => Ok(Self::Container {
                engine: ContainerEngine::Podman,
                name: target,
            }),
            "ssh" | "paramiko" | "paramiko_ssh" | "smart" => {
                let port = vars.get(VAR_PORT).map(|raw| parse_port(host, raw)).transpose()?;
                Ok(Self::Ssh(SshTarget {
                    address: target,
                    user: vars.get(VAR_USER).cloned(),
                    port,
                }))
            }
            other => Err(InventoryError::Invalid(format!(
                "host {host} uses unsupported connection {other}"
            ))),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Ssh(target) => {
                f.write_str("ssh://")?;
                if let Some(user) = &target.user {
                    write!(f, "{user}@")?;
                }
                f.write_str(&target.address)?;
                if let Some(port) = target.port {
                    write!(f, ":{port}")?;
                }
                Ok(())
            }
            Self::Container {
                engine,
                name,
            } => write!(f, "{}://{name}", engine.as_str()),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses an `ansible_port` value.
fn parse_port(host: &str, raw: &str) -> Result<u16, InventoryError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(InventoryError::Invalid(format!("host {host} has invalid {VAR_PORT}: {raw}"))),
    }
}
