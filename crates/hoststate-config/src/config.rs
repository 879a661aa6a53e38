// crates/hoststate-config/src/config.rs
// ============================================================================
// Module: Hoststate Configuration
// Description: Configuration loading and validation for hoststate runs.
// Purpose: Provide strict, fail-closed config parsing with defaults.
// Dependencies: hoststate-backends, hoststate-core, serde, toml
// ============================================================================

//! ## Overview
//! This module loads `hoststate.toml` with strict validation and applies safe
//! defaults. The config path comes from the CLI, then `HOSTSTATE_CONFIG`, then
//! the default file name. A missing default file means "all defaults"; an
//! explicitly named file must exist.
//!
//! The inventory path is not read from the environment here. Callers pass the
//! `MOLECULE_INVENTORY_FILE` value into [`SuiteConfig::resolve`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use hoststate_backends::BackendSettings;
use hoststate_backends::MAX_FILE_BYTES_LIMIT;
use hoststate_core::CheckCase;
use hoststate_core::MAX_SUITE_CASES;
use hoststate_core::Suite;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Default config file name.
pub const DEFAULT_CONFIG_NAME: &str = "hoststate.toml";
/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "HOSTSTATE_CONFIG";
/// Environment variable naming the inventory file.
pub const INVENTORY_ENV_VAR: &str = "MOLECULE_INVENTORY_FILE";
/// Default inventory group.
pub const DEFAULT_GROUP: &str = "all";
/// Maximum size of the config file in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a configured path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum number of SSH options.
pub(crate) const MAX_SSH_OPTIONS: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Hoststate configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoststateConfig {
    /// Inventory selection.
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// Backend settings.
    #[serde(default)]
    pub backend: BackendSettings,
    /// Check cases. Empty means the built-in suite.
    #[serde(default)]
    pub checks: Vec<CheckCase>,
}

impl HoststateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = read_file_limited(&resolved, MAX_CONFIG_FILE_SIZE)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.inventory.validate()?;
        validate_backend(&self.backend)?;
        if self.checks.len() > MAX_SUITE_CASES {
            return Err(ConfigError::Invalid(format!("checks exceeds {MAX_SUITE_CASES} entries")));
        }
        for (index, case) in self.checks.iter().enumerate() {
            case.validate().map_err(|err| ConfigError::Invalid(format!("checks[{index}]: {err}")))?;
        }
        Ok(())
    }

    /// Returns the configured suite, or the built-in suite when none is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configured cases do not form a valid
    /// suite.
    pub fn suite(&self) -> Result<Suite, ConfigError> {
        if self.checks.is_empty() {
            return Ok(Suite::default_cases());
        }
        Suite::new(self.checks.clone()).map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}

/// Inventory selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    /// Inventory file path.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Group whose hosts are checked.
    #[serde(default = "default_group")]
    pub group: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            group: default_group(),
        }
    }
}

impl InventoryConfig {
    /// Validates inventory selection.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_group("inventory.group", &self.group)?;
        if let Some(path) = &self.path {
            validate_path_string("inventory.path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Run Resolution
// ============================================================================

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Inventory file path.
    pub inventory_path: PathBuf,
    /// Group whose hosts are checked.
    pub group: String,
    /// Backend settings.
    pub backend: BackendSettings,
    /// Suite to run.
    pub suite: Suite,
}

impl SuiteConfig {
    /// Folds CLI overrides and the inventory environment value into `config`.
    ///
    /// Inventory path precedence: `inventory_flag`, then `inventory.path`, then
    /// `inventory_env`. Group precedence: `group_flag`, then `inventory.group`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no inventory path is available or
    /// an override is invalid.
    pub fn resolve(
        config: &HoststateConfig,
        inventory_flag: Option<&Path>,
        group_flag: Option<&str>,
        inventory_env: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let inventory_path = inventory_flag
            .map(Path::to_path_buf)
            .or_else(|| config.inventory.path.clone())
            .or_else(|| inventory_env.map(PathBuf::from))
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "no inventory path: pass --inventory, set inventory.path, or set \
                     {INVENTORY_ENV_VAR}"
                ))
            })?;
        validate_path_string("inventory path", &inventory_path.to_string_lossy())?;
        let group = group_flag.map_or_else(|| config.inventory.group.clone(), str::to_string);
        validate_group("group", &group)?;
        Ok(Self {
            inventory_path,
            group,
            backend: config.backend.clone(),
            suite: config.suite()?,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// Returns the path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Reads at most `max_bytes` from `path`, failing when the file is larger.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ConfigError> {
    let file = File::open(path)
        .map_err(|err| ConfigError::Io(format!("unable to read {}: {err}", path.display())))?;
    let limit = u64::try_from(max_bytes.saturating_add(1))
        .map_err(|_| ConfigError::Invalid("config size limit exceeds u64".to_string()))?;
    let mut bytes = Vec::new();
    file.take(limit)
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(format!("unable to read {}: {err}", path.display())))?;
    if bytes.len() > max_bytes {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    Ok(bytes)
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an inventory group name.
fn validate_group(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} must not contain whitespace")));
    }
    Ok(())
}

/// Validates backend settings.
fn validate_backend(backend: &BackendSettings) -> Result<(), ConfigError> {
    if backend.max_file_bytes == 0 || backend.max_file_bytes > MAX_FILE_BYTES_LIMIT {
        return Err(ConfigError::Invalid(format!(
            "backend.max_file_bytes must be between 1 and {MAX_FILE_BYTES_LIMIT}"
        )));
    }
    if backend.ssh_program.trim().is_empty() {
        return Err(ConfigError::Invalid("backend.ssh_program must be non-empty".to_string()));
    }
    if let Some(program) = &backend.container_program
        && program.trim().is_empty()
    {
        return Err(ConfigError::Invalid(
            "backend.container_program must be non-empty".to_string(),
        ));
    }
    if backend.ssh_options.len() > MAX_SSH_OPTIONS {
        return Err(ConfigError::Invalid(format!(
            "backend.ssh_options exceeds {MAX_SSH_OPTIONS} entries"
        )));
    }
    if backend.ssh_options.iter().any(|option| option.is_empty()) {
        return Err(ConfigError::Invalid(
            "backend.ssh_options entries must be non-empty".to_string(),
        ));
    }
    Ok(())
}

/// Serde default for `inventory.group`.
fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}
