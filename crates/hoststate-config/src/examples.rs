// crates/hoststate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Starting point printed by `hoststate config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The example mirrors the built-in suite so that running it against a
//! freshly provisioned web server passes.

/// Returns a canonical example `hoststate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[inventory]
# path = "molecule/default/inventory.yml"
group = "all"

[backend]
package_manager = "auto"
max_file_bytes = 1048576
ssh_program = "ssh"
ssh_options = ["-o", "BatchMode=yes"]
# container_program = "docker"

[[checks]]
kind = "package"
name = "httpd"

[[checks]]
kind = "package"
name = "firewalld"

[[checks]]
kind = "service"
name = "httpd"

[[checks]]
kind = "service"
name = "firewalld"

[[checks]]
kind = "file"
path = "/etc/firewalld/zones/public.xml"
contains = '<service name="http"/>'

[[checks]]
kind = "file"
path = "/var/www/html/index.html"
contains = "Managed by Ansible"
"#,
    )
}
