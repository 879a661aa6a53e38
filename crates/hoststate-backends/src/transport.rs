// crates/hoststate-backends/src/transport.rs
// ============================================================================
// Module: Transports
// Description: Command lines that execute a shell script on a target host.
// Purpose: Map inventory connections onto local, SSH, and container exec.
// Dependencies: hoststate-inventory
// ============================================================================

//! ## Overview
//! Every probe is a POSIX shell script. A [`Transport`] turns that script into
//! a program and argument list: `sh -c` locally, `ssh ... -- sh -c '<script>'`
//! remotely, and `<engine> exec <name> sh -c` for containers. SSH joins its
//! remote arguments into one command line, so the script is quoted once more
//! for that hop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use hoststate_inventory::Connection;
use hoststate_inventory::SshTarget;

use crate::settings::BackendSettings;

// ============================================================================
// SECTION: Shell Quoting
// ============================================================================

/// Single-quotes `value` for a POSIX shell.
///
/// Embedded single quotes become `'\''`.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// How a probe script reaches the target host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Run on the local machine.
    Local,
    /// Run over an SSH client.
    Ssh {
        /// SSH client program.
        program: String,
        /// Options placed before the destination.
        options: Vec<String>,
        /// Remote endpoint.
        target: SshTarget,
    },
    /// Run inside a container through the engine's exec.
    Container {
        /// Engine program (`docker`, `podman`, or an override).
        program: String,
        /// Container name or id.
        name: String,
    },
}

impl Transport {
    /// Builds the transport for an inventory connection.
    #[must_use]
    pub fn for_connection(connection: &Connection, settings: &BackendSettings) -> Self {
        match connection {
            Connection::Local => Self::Local,
            Connection::Ssh(target) => Self::Ssh {
                program: settings.ssh_program.clone(),
                options: settings.ssh_options.clone(),
                target: target.clone(),
            },
            Connection::Container {
                engine,
                name,
            } => Self::Container {
                program: settings
                    .container_program
                    .clone()
                    .unwrap_or_else(|| engine.as_str().to_string()),
                name: name.clone(),
            },
        }
    }

    /// Returns the program and arguments that run `script` on the target.
    #[must_use]
    pub fn command(&self, script: &str) -> (String, Vec<String>) {
        match self {
            Self::Local => ("sh".to_string(), vec!["-c".to_string(), script.to_string()]),
            Self::Ssh {
                program,
                options,
                target,
            } => {
                let mut args = options.clone();
                if let Some(port) = target.port {
                    args.push("-p".to_string());
                    args.push(port.to_string());
                }
                let destination = match &target.user {
                    Some(user) => format!("{user}@{}", target.address),
                    None => target.address.clone(),
                };
                args.push(destination);
                args.push("--".to_string());
                args.push(format!("sh -c {}", shell_quote(script)));
                (program.clone(), args)
            }
            Self::Container {
                program,
                name,
            } => (
                program.clone(),
                vec![
                    "exec".to_string(),
                    name.clone(),
                    "sh".to_string(),
                    "-c".to_string(),
                    script.to_string(),
                ],
            ),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Ssh {
                target, ..
            } => match &target.user {
                Some(user) => write!(f, "ssh {user}@{}", target.address),
                None => write!(f, "ssh {}", target.address),
            },
            Self::Container {
                program,
                name,
            } => write!(f, "{program} exec {name}"),
        }
    }
}
