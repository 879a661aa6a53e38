// crates/hoststate-core/src/core/suite.rs
// ============================================================================
// Module: Check Suite
// Description: Table of check cases applied to every resolved host.
// Purpose: Model parametrized checks as an explicit ordered list of inputs.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A suite is an ordered sequence of [`CheckCase`] values. The runner applies
//! each case to each host, so one logical assertion expands into one
//! invocation per (host, case) pair. The built-in case table verifies a web
//! server provisioned behind firewalld.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Packages checked by the built-in suite.
pub const DEFAULT_PACKAGES: &[&str] = &["httpd", "firewalld"];
/// Services checked by the built-in suite.
pub const DEFAULT_SERVICES: &[&str] = &["httpd", "firewalld"];
/// File path and expected substring pairs checked by the built-in suite.
pub const DEFAULT_FILES: &[(&str, &str)] = &[
    ("/etc/firewalld/zones/public.xml", "<service name=\"http\"/>"),
    ("/var/www/html/index.html", "Managed by Ansible"),
];
/// Maximum number of cases accepted in a single suite.
pub const MAX_SUITE_CASES: usize = 1024;

// ============================================================================
// SECTION: Check Cases
// ============================================================================

/// One parametrized check input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckCase {
    /// Package must be installed.
    Package {
        /// Package name.
        name: String,
    },
    /// Service must be running and enabled.
    Service {
        /// Service name.
        name: String,
    },
    /// File must exist and contain a literal substring.
    File {
        /// Absolute file path.
        path: String,
        /// Expected substring.
        contains: String,
    },
}

impl CheckCase {
    /// Creates a package case.
    #[must_use]
    pub fn package(name: impl Into<String>) -> Self {
        Self::Package {
            name: name.into(),
        }
    }

    /// Creates a service case.
    #[must_use]
    pub fn service(name: impl Into<String>) -> Self {
        Self::Service {
            name: name.into(),
        }
    }

    /// Creates a file case.
    #[must_use]
    pub fn file(path: impl Into<String>, contains: impl Into<String>) -> Self {
        Self::File {
            path: path.into(),
            contains: contains.into(),
        }
    }

    /// Returns a stable label for the case kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Package {
                ..
            } => "package",
            Self::Service {
                ..
            } => "service",
            Self::File {
                ..
            } => "file",
        }
    }

    /// Validates the case inputs.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] when a name or path is empty, a file path is not
    /// absolute, or the expected substring is empty.
    pub fn validate(&self) -> Result<(), SuiteError> {
        match self {
            Self::Package {
                name,
            }
            | Self::Service {
                name,
            } => {
                if name.trim().is_empty() {
                    return Err(SuiteError::Invalid(format!("{} name must be non-empty", self.kind())));
                }
                if name.chars().any(char::is_whitespace) {
                    return Err(SuiteError::Invalid(format!(
                        "{} name must not contain whitespace: {name}",
                        self.kind()
                    )));
                }
            }
            Self::File {
                path,
                contains,
            } => {
                if !path.starts_with('/') {
                    return Err(SuiteError::Invalid(format!("file path must be absolute: {path}")));
                }
                if contains.is_empty() {
                    return Err(SuiteError::Invalid(format!(
                        "expected content for {path} must be non-empty"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for CheckCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package {
                name,
            } => write!(f, "package[{name}]"),
            Self::Service {
                name,
            } => write!(f, "service[{name}]"),
            Self::File {
                path,
                ..
            } => write!(f, "file[{path}]"),
        }
    }
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Ordered table of check cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    /// Cases in evaluation order.
    pub cases: Vec<CheckCase>,
}

impl Suite {
    /// Creates a validated suite from the given cases.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] when the suite is empty, too large, or any case
    /// is invalid.
    pub fn new(cases: Vec<CheckCase>) -> Result<Self, SuiteError> {
        let suite = Self {
            cases,
        };
        suite.validate()?;
        Ok(suite)
    }

    /// Returns the built-in web server suite.
    ///
    /// Packages come first, then services, then files.
    #[must_use]
    pub fn default_cases() -> Self {
        let mut cases = Vec::with_capacity(
            DEFAULT_PACKAGES.len() + DEFAULT_SERVICES.len() + DEFAULT_FILES.len(),
        );
        cases.extend(DEFAULT_PACKAGES.iter().map(|name| CheckCase::package(*name)));
        cases.extend(DEFAULT_SERVICES.iter().map(|name| CheckCase::service(*name)));
        cases.extend(DEFAULT_FILES.iter().map(|(path, contains)| CheckCase::file(*path, *contains)));
        Self {
            cases,
        }
    }

    /// Validates every case in the suite.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] on the first invalid case.
    pub fn validate(&self) -> Result<(), SuiteError> {
        if self.cases.is_empty() {
            return Err(SuiteError::Invalid("suite must contain at least one case".to_string()));
        }
        if self.cases.len() > MAX_SUITE_CASES {
            return Err(SuiteError::Invalid(format!(
                "suite exceeds {MAX_SUITE_CASES} cases"
            )));
        }
        for case in &self.cases {
            case.validate()?;
        }
        Ok(())
    }

    /// Returns the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when the suite has no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl Default for Suite {
    fn default() -> Self {
        Self::default_cases()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Suite construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuiteError {
    /// Suite or case inputs are invalid.
    #[error("invalid suite: {0}")]
    Invalid(String),
}
