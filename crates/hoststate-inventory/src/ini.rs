// crates/hoststate-inventory/src/ini.rs
// ============================================================================
// Module: INI Inventory Parser
// Description: Parser for Ansible INI inventories.
// Purpose: Translate `[group]`, `[group:children]`, and `[group:vars]` sections.
// Dependencies: crate::inventory
// ============================================================================

//! ## Overview
//! Host lines take the form `name key=value ...`; values may be quoted.
//! Lines before the first section belong to `ungrouped`. Comments start with
//! `#` or `;`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::inventory::GROUP_UNGROUPED;
use crate::inventory::Inventory;
use crate::inventory::InventoryError;
use crate::inventory::Vars;

// ============================================================================
// SECTION: Sections
// ============================================================================

/// Section kinds in an INI inventory.
enum Section {
    /// Host lines for a group.
    Hosts(String),
    /// Child group names for a group.
    Children(String),
    /// Variable assignments for a group.
    Vars(String),
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Parses INI inventory content.
pub(crate) fn parse(content: &str) -> Result<Inventory, InventoryError> {
    let mut inventory = Inventory::empty();
    let mut section = Section::Hosts(GROUP_UNGROUPED.to_string());
    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            section = parse_header(line, line_no)?;
            match &section {
                Section::Hosts(group) | Section::Children(group) | Section::Vars(group) => {
                    inventory.ensure_group(group);
                }
            }
            continue;
        }
        match &section {
            Section::Hosts(group) => {
                let tokens = tokenize(line, line_no)?;
                let Some((host, rest)) = tokens.split_first() else {
                    continue;
                };
                let mut vars = Vars::new();
                for token in rest {
                    let (key, value) = token.split_once('=').ok_or_else(|| {
                        InventoryError::Parse(format!(
                            "line {line_no}: expected key=value, found {token}"
                        ))
                    })?;
                    vars.insert(key.to_string(), value.to_string());
                }
                inventory.add_host(group, host, vars);
            }
            Section::Children(group) => {
                let tokens = tokenize(line, line_no)?;
                let [child] = tokens.as_slice() else {
                    return Err(InventoryError::Parse(format!(
                        "line {line_no}: children entries take a single group name"
                    )));
                };
                inventory.add_child(group, child);
            }
            Section::Vars(group) => {
                let (key, value) = line.split_once('=').ok_or_else(|| {
                    InventoryError::Parse(format!("line {line_no}: expected key=value"))
                })?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(InventoryError::Parse(format!(
                        "line {line_no}: variable name must be non-empty"
                    )));
                }
                let mut vars = Vars::new();
                vars.insert(key.to_string(), unquote(value.trim()));
                inventory.add_group_vars(group, vars);
            }
        }
    }
    Ok(inventory)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a `[name]` or `[name:kind]` header.
fn parse_header(line: &str, line_no: usize) -> Result<Section, InventoryError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
        .ok_or_else(|| InventoryError::Parse(format!("line {line_no}: malformed section header")))?;
    let (name, kind) = match inner.split_once(':') {
        Some((name, kind)) => (name.trim(), Some(kind.trim())),
        None => (inner, None),
    };
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(InventoryError::Parse(format!("line {line_no}: invalid group name")));
    }
    match kind {
        None => Ok(Section::Hosts(name.to_string())),
        Some("children") => Ok(Section::Children(name.to_string())),
        Some("vars") => Ok(Section::Vars(name.to_string())),
        Some(other) => Err(InventoryError::Parse(format!(
            "line {line_no}: unknown section kind {other}"
        ))),
    }
}

/// Splits a line on whitespace, honoring quotes and trailing comments.
fn tokenize(line: &str, line_no: usize) -> Result<Vec<String>, InventoryError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '#' && current.is_empty() => break,
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }
    if quote.is_some() {
        return Err(InventoryError::Parse(format!("line {line_no}: unterminated quote")));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Strips one matching pair of surrounding quotes.
fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return inner.to_string();
        }
    }
    value.to_string()
}
