// crates/hoststate-inventory/tests/resolution.rs
// ============================================================================
// Module: Inventory Resolution Tests
// Description: File-backed loading and group resolution.
// Purpose: Validate group membership, variable precedence, and failure modes.
// Dependencies: hoststate-inventory, tempfile
// ============================================================================

//! ## Overview
//! Loads inventories from temporary files and verifies:
//! - Generated molecule-style YAML inventories resolve under `all`
//! - Nested children and INI children sections are followed
//! - Deeper group variables override ancestors; host variables win
//! - Missing files, oversized files, unknown groups, and cycles fail closed

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::PathBuf;

use hoststate_inventory::Connection;
use hoststate_inventory::ContainerEngine;
use hoststate_inventory::Inventory;
use hoststate_inventory::InventoryError;
use hoststate_inventory::MAX_INVENTORY_BYTES;
use hoststate_inventory::resolve_hosts;
use tempfile::TempDir;
use tempfile::tempdir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Inventory in the shape molecule generates for the docker driver.
const MOLECULE_INVENTORY: &str = r"
all:
  hosts:
    instance: &instance
      ansible_connection: community.docker.docker
  vars:
    molecule_file: /tmp/molecule.yml
ungrouped:
  hosts:
    instance: *instance
  vars: {}
";

/// Nested YAML inventory used for precedence tests.
const NESTED_INVENTORY: &str = r"
all:
  vars:
    tier: base
    ansible_user: root
  children:
    web:
      vars:
        tier: web
      hosts:
        web1:
        web2:
          tier: special
      children:
        canary:
          vars:
            tier: canary
          hosts:
            web3:
              ansible_port: 2200
    db:
      hosts:
        db1:
          ansible_connection: local
";

/// Writes `content` to a file named `name` in a fresh temp dir.
fn write_inventory(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}

// ============================================================================
// SECTION: Membership
// ============================================================================

#[test]
fn molecule_inventory_resolves_all_hosts() {
    let (_dir, path) = write_inventory("ansible_inventory.yml", MOLECULE_INVENTORY);
    let hosts = resolve_hosts(&path, "all").unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].name, "instance");
    assert_eq!(
        hosts[0].connection,
        Connection::Container {
            engine: ContainerEngine::Docker,
            name: "instance".to_string(),
        }
    );
    assert_eq!(hosts[0].vars.get("molecule_file").map(String::as_str), Some("/tmp/molecule.yml"));
}

#[test]
fn nested_children_are_members_of_parent_groups() {
    let (_dir, path) = write_inventory("inventory.yaml", NESTED_INVENTORY);
    let inventory = Inventory::load(&path).unwrap();
    assert_eq!(inventory.host_names("all").unwrap(), vec!["db1", "web1", "web2", "web3"]);
    assert_eq!(inventory.host_names("web").unwrap(), vec!["web1", "web2", "web3"]);
    assert_eq!(inventory.host_names("canary").unwrap(), vec!["web3"]);
    assert!(inventory.host_names("ungrouped").unwrap().is_empty());
}

#[test]
fn ini_children_sections_are_followed() {
    let content = "\
[web]
web1
web2 ansible_host=192.0.2.10

[db]
db1 ansible_connection=local

[prod:children]
web
db

[prod:vars]
env=production
";
    let (_dir, path) = write_inventory("hosts.ini", content);
    let inventory = Inventory::load(&path).unwrap();
    assert_eq!(inventory.host_names("prod").unwrap(), vec!["db1", "web1", "web2"]);
    let hosts = inventory.hosts("prod").unwrap();
    assert!(hosts.iter().all(|host| host.vars.get("env").map(String::as_str) == Some("production")));
    assert_eq!(hosts[0].connection, Connection::Local);
    assert_eq!(hosts[2].connection.to_string(), "ssh://192.0.2.10");
}

#[test]
fn resolution_is_deterministic() {
    let (_dir, path) = write_inventory("inventory.yml", NESTED_INVENTORY);
    let first = resolve_hosts(&path, "all").unwrap();
    let second = resolve_hosts(&path, "all").unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// SECTION: Variable Precedence
// ============================================================================

#[test]
fn deeper_groups_override_ancestors_and_hosts_win() {
    let (_dir, path) = write_inventory("inventory.yml", NESTED_INVENTORY);
    let hosts = resolve_hosts(&path, "all").unwrap();
    let tier = |name: &str| {
        hosts
            .iter()
            .find(|host| host.name == name)
            .and_then(|host| host.vars.get("tier").cloned())
            .unwrap()
    };
    assert_eq!(tier("db1"), "base");
    assert_eq!(tier("web1"), "web");
    assert_eq!(tier("web2"), "special");
    assert_eq!(tier("web3"), "canary");
}

#[test]
fn inherited_user_and_host_port_shape_ssh_connection() {
    let (_dir, path) = write_inventory("inventory.yml", NESTED_INVENTORY);
    let hosts = resolve_hosts(&path, "canary").unwrap();
    assert_eq!(hosts[0].connection.to_string(), "ssh://root@web3:2200");
}

// ============================================================================
// SECTION: Failure Modes
// ============================================================================

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = resolve_hosts(&dir.path().join("absent.yml"), "all").unwrap_err();
    assert!(matches!(err, InventoryError::Io(_)));
}

#[test]
fn oversized_file_is_rejected() {
    let padding = "#".repeat(MAX_INVENTORY_BYTES + 1);
    let (_dir, path) = write_inventory("big.yml", &padding);
    let err = resolve_hosts(&path, "all").unwrap_err();
    assert!(err.to_string().contains("exceeds"));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let (_dir, path) = write_inventory("broken.yml", "all:\n  hosts: [unclosed\n");
    let err = resolve_hosts(&path, "all").unwrap_err();
    assert!(matches!(err, InventoryError::Parse(_)));
}

#[test]
fn unknown_group_is_reported() {
    let (_dir, path) = write_inventory("inventory.yml", NESTED_INVENTORY);
    let err = resolve_hosts(&path, "staging").unwrap_err();
    assert_eq!(err, InventoryError::UnknownGroup("staging".to_string()));
}

#[test]
fn extensionless_ini_with_colon_values_loads_as_ini() {
    let content = "web1 ansible_ssh_common_args='-o ProxyJump=bastion:2222'\n[db]\ndb1\n";
    let (_dir, path) = write_inventory("hosts", content);
    let hosts = resolve_hosts(&path, "all").unwrap();
    let names: Vec<&str> = hosts.iter().map(|host| host.name.as_str()).collect();
    assert_eq!(names, vec!["db1", "web1"]);
}

#[test]
fn child_cycles_are_rejected() {
    let content = "[a:children]\nb\n[b:children]\na\n";
    let (_dir, path) = write_inventory("cycle.ini", content);
    let err = Inventory::load(&path).unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn all_cannot_be_a_child() {
    let content = "[web:children]\nall\n";
    let (_dir, path) = write_inventory("bad.ini", content);
    let err = Inventory::load(&path).unwrap_err();
    assert!(err.to_string().contains("cannot be a child"));
}
