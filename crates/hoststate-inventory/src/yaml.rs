// crates/hoststate-inventory/src/yaml.rs
// ============================================================================
// Module: YAML Inventory Parser
// Description: Parser for Ansible YAML (and JSON) inventories.
// Purpose: Translate nested group mappings into the inventory graph.
// Dependencies: serde_yaml
// ============================================================================

//! ## Overview
//! Top-level keys are group names. Each group may hold `hosts`, `vars`, and
//! `children` mappings. Anchors and aliases are resolved by `serde_yaml`, so
//! generated inventories that alias host entries parse as written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_yaml::Mapping;
use serde_yaml::Value;

use crate::inventory::Inventory;
use crate::inventory::InventoryError;
use crate::inventory::MAX_GROUP_DEPTH;
use crate::inventory::Vars;

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Parses YAML inventory content.
pub(crate) fn parse(content: &str) -> Result<Inventory, InventoryError> {
    let document: Value =
        serde_yaml::from_str(content).map_err(|err| InventoryError::Parse(err.to_string()))?;
    let mut inventory = Inventory::empty();
    match document {
        Value::Null => {}
        Value::Mapping(groups) => {
            for (key, value) in groups {
                let name = key_string(&key, "group name")?;
                parse_group(&mut inventory, &name, &value, 0)?;
            }
        }
        _ => {
            return Err(InventoryError::Parse("inventory root must be a mapping".to_string()));
        }
    }
    Ok(inventory)
}

/// Parses one group body, recursing into children.
fn parse_group(
    inventory: &mut Inventory,
    name: &str,
    value: &Value,
    depth: usize,
) -> Result<(), InventoryError> {
    if depth > MAX_GROUP_DEPTH {
        return Err(InventoryError::Invalid(format!(
            "group nesting exceeds {MAX_GROUP_DEPTH} levels"
        )));
    }
    inventory.ensure_group(name);
    let Some(body) = as_mapping(value, name)? else {
        return Ok(());
    };
    for (key, entry) in body {
        match key_string(key, "group key")?.as_str() {
            "hosts" => {
                let Some(hosts) = as_mapping(entry, name)? else {
                    continue;
                };
                for (host, host_vars) in hosts {
                    let host = key_string(host, "host name")?;
                    inventory.add_host(name, &host, vars_from(host_vars, &host)?);
                }
            }
            "vars" => inventory.add_group_vars(name, vars_from(entry, name)?),
            "children" => {
                let Some(children) = as_mapping(entry, name)? else {
                    continue;
                };
                for (child, child_body) in children {
                    let child = key_string(child, "child group name")?;
                    inventory.add_child(name, &child);
                    parse_group(inventory, &child, child_body, depth + 1)?;
                }
            }
            other => {
                return Err(InventoryError::Parse(format!(
                    "unexpected key {other} in group {name}"
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the mapping in `value`, treating null as absent.
fn as_mapping<'a>(value: &'a Value, owner: &str) -> Result<Option<&'a Mapping>, InventoryError> {
    match value {
        Value::Null => Ok(None),
        Value::Mapping(map) => Ok(Some(map)),
        _ => Err(InventoryError::Parse(format!("entry under {owner} must be a mapping"))),
    }
}

/// Converts a mapping key into a string.
fn key_string(key: &Value, what: &str) -> Result<String, InventoryError> {
    match key {
        Value::String(text) if !text.trim().is_empty() => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(InventoryError::Parse(format!("{what} must be a non-empty string"))),
    }
}

/// Converts a variable mapping into string values.
fn vars_from(value: &Value, owner: &str) -> Result<Vars, InventoryError> {
    let mut vars = Vars::new();
    let Some(map) = as_mapping(value, owner)? else {
        return Ok(vars);
    };
    for (key, entry) in map {
        let key = key_string(key, "variable name")?;
        vars.insert(key, scalar_string(entry)?);
    }
    Ok(vars)
}

/// Renders a variable value as a string.
fn scalar_string(value: &Value) -> Result<String, InventoryError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text.clone()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => serde_yaml::to_string(value)
            .map(|text| text.trim_end().to_string())
            .map_err(|err| InventoryError::Parse(err.to_string())),
    }
}
