// crates/hoststate-inventory/src/inventory.rs
// ============================================================================
// Module: Inventory Model
// Description: Group graph, host variables, and host resolution.
// Purpose: Resolve a named group into an ordered list of connectable hosts.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! An [`Inventory`] is a directed acyclic graph of groups. Every group lists
//! its own hosts and child groups. `all` contains every host, and hosts that
//! belong to no other group are placed in `ungrouped`. Variable precedence
//! follows group depth: deeper groups override their ancestors and host
//! variables override every group.
//! Resolution is deterministic: hosts are returned sorted by name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::connection::Connection;
use crate::ini;
use crate::yaml;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Group containing every host.
pub const GROUP_ALL: &str = "all";
/// Group containing hosts with no other membership.
pub const GROUP_UNGROUPED: &str = "ungrouped";
/// Maximum inventory file size in bytes.
pub const MAX_INVENTORY_BYTES: usize = 1024 * 1024;
/// Maximum group nesting depth.
pub const MAX_GROUP_DEPTH: usize = 64;

/// Variable map attached to hosts and groups.
pub type Vars = BTreeMap<String, String>;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Inventory loading and resolution errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Inventory file could not be read.
    #[error("inventory io error: {0}")]
    Io(String),
    /// Inventory content is malformed.
    #[error("inventory parse error: {0}")]
    Parse(String),
    /// Inventory content is well-formed but violates a rule.
    #[error("invalid inventory: {0}")]
    Invalid(String),
    /// Requested group is not defined.
    #[error("unknown inventory group: {0}")]
    UnknownGroup(String),
}

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Supported inventory file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    /// YAML inventory (also accepts JSON).
    Yaml,
    /// INI inventory.
    Ini,
}

impl InventoryFormat {
    /// Detects the format from the file extension, then from the content.
    ///
    /// Without a known extension, content that parses as a YAML mapping is YAML
    /// and anything else is INI.
    #[must_use]
    pub fn detect(path: &Path, content: &str) -> Self {
        let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "yml" | "yaml" | "json" => return Self::Yaml,
            "ini" | "cfg" => return Self::Ini,
            _ => {}
        }
        match serde_yaml::from_str::<serde_yaml::Value>(content) {
            Ok(serde_yaml::Value::Mapping(_)) => Self::Yaml,
            _ => Self::Ini,
        }
    }

    /// Returns the format label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Ini => "ini",
        }
    }
}

// ============================================================================
// SECTION: Resolved Hosts
// ============================================================================

/// Host resolved from an inventory group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryHost {
    /// Inventory host name.
    pub name: String,
    /// Effective variables after precedence is applied.
    pub vars: Vars,
    /// Connection derived from the effective variables.
    pub connection: Connection,
}

// ============================================================================
// SECTION: Inventory
// ============================================================================

/// A single inventory group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Group {
    /// Hosts listed directly in the group.
    hosts: BTreeSet<String>,
    /// Child group names.
    children: BTreeSet<String>,
    /// Group variables.
    vars: Vars,
}

/// Parsed inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    /// Groups keyed by name.
    groups: BTreeMap<String, Group>,
    /// Host variables keyed by host name.
    hosts: BTreeMap<String, Vars>,
}

impl Inventory {
    /// Loads and parses an inventory file.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the file cannot be read, exceeds the size
    /// limit, is not UTF-8, or is malformed.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let bytes = read_file_limited(path, MAX_INVENTORY_BYTES)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| InventoryError::Parse("inventory file must be utf-8".to_string()))?;
        let format = InventoryFormat::detect(path, content);
        let inventory = Self::parse(content, format)?;
        debug!(
            path = %path.display(),
            format = format.as_str(),
            groups = inventory.groups.len(),
            hosts = inventory.hosts.len(),
            "inventory loaded"
        );
        Ok(inventory)
    }

    /// Parses inventory content in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] when the content is malformed or the group
    /// graph contains a cycle.
    pub fn parse(content: &str, format: InventoryFormat) -> Result<Self, InventoryError> {
        let mut inventory = match format {
            InventoryFormat::Yaml => yaml::parse(content)?,
            InventoryFormat::Ini => ini::parse(content)?,
        };
        inventory.finalize()?;
        Ok(inventory)
    }

    /// Creates an inventory containing only the `all` group.
    pub(crate) fn empty() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(GROUP_ALL.to_string(), Group::default());
        Self {
            groups,
            hosts: BTreeMap::new(),
        }
    }

    /// Declares a group if it does not exist yet.
    pub(crate) fn ensure_group(&mut self, group: &str) {
        self.groups.entry(group.to_string()).or_default();
    }

    /// Adds a host to a group and merges its variables.
    pub(crate) fn add_host(&mut self, group: &str, host: &str, vars: Vars) {
        self.groups.entry(group.to_string()).or_default().hosts.insert(host.to_string());
        self.hosts.entry(host.to_string()).or_default().extend(vars);
    }

    /// Adds `child` as a child group of `parent`.
    pub(crate) fn add_child(&mut self, parent: &str, child: &str) {
        self.ensure_group(child);
        self.groups.entry(parent.to_string()).or_default().children.insert(child.to_string());
    }

    /// Merges variables into a group.
    pub(crate) fn add_group_vars(&mut self, group: &str, vars: Vars) {
        self.groups.entry(group.to_string()).or_default().vars.extend(vars);
    }

    /// Returns all group names, sorted.
    #[must_use]
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Returns the number of distinct hosts.
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Resolves the hosts belonging to `group`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::UnknownGroup`] when the group is not defined,
    /// or [`InventoryError::Invalid`] when a host connection is unsupported.
    pub fn hosts(&self, group: &str) -> Result<Vec<InventoryHost>, InventoryError> {
        if !self.groups.contains_key(group) {
            return Err(InventoryError::UnknownGroup(group.to_string()));
        }
        let depths = self.group_depths();
        let mut members = BTreeSet::new();
        self.collect_members(group, &mut members);
        members.into_iter().map(|name| self.resolve_host(&name, &depths)).collect()
    }

    /// Returns the host names belonging to `group`, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::UnknownGroup`] when the group is not defined.
    pub fn host_names(&self, group: &str) -> Result<Vec<String>, InventoryError> {
        if !self.groups.contains_key(group) {
            return Err(InventoryError::UnknownGroup(group.to_string()));
        }
        let mut members = BTreeSet::new();
        self.collect_members(group, &mut members);
        Ok(members.into_iter().collect())
    }

    // ------------------------------------------------------------------------
    // Graph helpers
    // ------------------------------------------------------------------------

    /// Attaches root groups to `all`, fills `ungrouped`, and rejects cycles.
    fn finalize(&mut self) -> Result<(), InventoryError> {
        self.ensure_group(GROUP_UNGROUPED);
        let parented: BTreeSet<String> =
            self.groups.values().flat_map(|group| group.children.iter().cloned()).collect();
        if parented.contains(GROUP_ALL) {
            return Err(InventoryError::Invalid("group all cannot be a child group".to_string()));
        }
        let roots: Vec<String> = self
            .groups
            .keys()
            .filter(|name| name.as_str() != GROUP_ALL && !parented.contains(*name))
            .cloned()
            .collect();
        for root in roots {
            self.add_child(GROUP_ALL, &root);
        }
        self.reject_cycles()?;

        let grouped: BTreeSet<String> = self
            .groups
            .iter()
            .filter(|(name, _)| name.as_str() != GROUP_ALL)
            .flat_map(|(_, group)| group.hosts.iter().cloned())
            .collect();
        let ungrouped: Vec<String> =
            self.hosts.keys().filter(|host| !grouped.contains(*host)).cloned().collect();
        for host in ungrouped {
            self.add_host(GROUP_UNGROUPED, &host, Vars::new());
        }
        Ok(())
    }

    /// Fails when any group is reachable from itself.
    fn reject_cycles(&self) -> Result<(), InventoryError> {
        let mut done = BTreeSet::new();
        for name in self.groups.keys() {
            let mut stack = Vec::new();
            self.visit(name, &mut stack, &mut done)?;
        }
        Ok(())
    }

    /// Depth-first visit used by [`Self::reject_cycles`].
    fn visit<'a>(
        &'a self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
        done: &mut BTreeSet<&'a str>,
    ) -> Result<(), InventoryError> {
        if done.contains(name) {
            return Ok(());
        }
        if stack.contains(&name) {
            return Err(InventoryError::Invalid(format!("group cycle through {name}")));
        }
        if stack.len() >= MAX_GROUP_DEPTH {
            return Err(InventoryError::Invalid(format!(
                "group nesting exceeds {MAX_GROUP_DEPTH} levels"
            )));
        }
        stack.push(name);
        if let Some(group) = self.groups.get(name) {
            for child in &group.children {
                self.visit(child, stack, done)?;
            }
        }
        stack.pop();
        done.insert(name);
        Ok(())
    }

    /// Collects hosts of `group` and its descendants.
    fn collect_members(&self, group: &str, out: &mut BTreeSet<String>) {
        if group == GROUP_ALL {
            out.extend(self.hosts.keys().cloned());
            return;
        }
        if let Some(entry) = self.groups.get(group) {
            out.extend(entry.hosts.iter().cloned());
            for child in &entry.children {
                self.collect_members(child, out);
            }
        }
    }

    /// Computes the longest distance from `all` for every group.
    fn group_depths(&self) -> BTreeMap<&str, usize> {
        let mut depths: BTreeMap<&str, usize> = BTreeMap::new();
        depths.insert(GROUP_ALL, 0);
        let mut frontier = vec![GROUP_ALL];
        // The graph is acyclic, so depths settle within MAX_GROUP_DEPTH rounds.
        for _ in 0..=MAX_GROUP_DEPTH {
            let mut next = Vec::new();
            for name in frontier {
                let depth = depths.get(name).copied().unwrap_or_default();
                let Some(group) = self.groups.get(name) else {
                    continue;
                };
                for child in &group.children {
                    let current = depths.entry(child.as_str()).or_insert(0);
                    if *current < depth + 1 {
                        *current = depth + 1;
                        next.push(child.as_str());
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        depths
    }

    /// Builds the effective variables and connection for one host.
    fn resolve_host(
        &self,
        name: &str,
        depths: &BTreeMap<&str, usize>,
    ) -> Result<InventoryHost, InventoryError> {
        let mut memberships: Vec<(usize, &str)> = self
            .groups
            .keys()
            .filter(|group| {
                let mut members = BTreeSet::new();
                self.collect_members(group, &mut members);
                members.contains(name)
            })
            .map(|group| (depths.get(group.as_str()).copied().unwrap_or_default(), group.as_str()))
            .collect();
        memberships.sort_unstable();

        let mut vars = Vars::new();
        for (_, group) in memberships {
            if let Some(entry) = self.groups.get(group) {
                vars.extend(entry.vars.iter().map(|(key, value)| (key.clone(), value.clone())));
            }
        }
        if let Some(host_vars) = self.hosts.get(name) {
            vars.extend(host_vars.iter().map(|(key, value)| (key.clone(), value.clone())));
        }
        let connection = Connection::from_vars(name, &vars)?;
        Ok(InventoryHost {
            name: name.to_string(),
            vars,
            connection,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads the inventory at `path` and resolves the hosts in `group`.
///
/// # Errors
///
/// Returns [`InventoryError`] when loading or resolution fails.
pub fn resolve_hosts(path: &Path, group: &str) -> Result<Vec<InventoryHost>, InventoryError> {
    Inventory::load(path)?.hosts(group)
}

/// Reads a file while enforcing a maximum byte limit.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, InventoryError> {
    let file = File::open(path).map_err(|err| {
        InventoryError::Io(format!("unable to open {}: {err}", path.display()))
    })?;
    let limit = u64::try_from(max_bytes.saturating_add(1))
        .map_err(|_| InventoryError::Io("inventory size limit exceeds u64".to_string()))?;
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf).map_err(|err| {
        InventoryError::Io(format!("unable to read {}: {err}", path.display()))
    })?;
    if buf.len() > max_bytes {
        return Err(InventoryError::Invalid(format!(
            "inventory file exceeds {max_bytes} bytes"
        )));
    }
    Ok(buf)
}
