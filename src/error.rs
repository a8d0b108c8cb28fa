//! Error types for envcfg

use crate::config::SettingKind;
use std::fmt;
use thiserror::Error;

/// Result type alias for envcfg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for envcfg
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Schema Errors (programming defects, raised before any lookup)
    // -------------------------------------------------------------------------
    #[error("Schema must declare at least one setting")]
    EmptySchema,

    #[error("Duplicate setting name in schema: {0}")]
    DuplicateSettingName(String),

    #[error("Invalid setting specification for {name}: {reason}")]
    InvalidSettingSpec { name: String, reason: String },

    // -------------------------------------------------------------------------
    // Resolution Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    // -------------------------------------------------------------------------
    // Access Errors
    // -------------------------------------------------------------------------
    #[error("Setting not found: {0}")]
    SettingNotFound(String),

    #[error("Type mismatch for {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: SettingKind,
        actual: SettingKind,
    },

    // -------------------------------------------------------------------------
    // Environment File Errors (dotenv feature)
    // -------------------------------------------------------------------------
    #[cfg(feature = "dotenv")]
    #[error("Failed to read env file '{path}': {source}")]
    EnvFile {
        path: std::path::PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

impl Error {
    /// Check if this error comes from schema construction
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Error::EmptySchema | Error::DuplicateSettingName(_) | Error::InvalidSettingSpec { .. }
        )
    }

    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SettingNotFound(_))
    }

    /// Per-setting failures, if this is a resolution error
    #[must_use]
    pub fn setting_errors(&self) -> &[SettingError] {
        match self {
            Error::Resolve(e) => e.errors(),
            _ => &[],
        }
    }
}

/// A single setting that could not be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    /// A required setting had no environment value and no default
    #[error("missing required setting {name} (environment variable {env_var})")]
    MissingRequiredSetting { name: String, env_var: String },

    /// A value was present but did not parse as its declared kind
    #[error("invalid value {raw:?} for setting {name} ({kind}): {reason}")]
    InvalidSettingValue {
        name: String,
        kind: SettingKind,
        raw: String,
        reason: String,
    },
}

impl SettingError {
    /// Name of the setting this error is about
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SettingError::MissingRequiredSetting { name, .. }
            | SettingError::InvalidSettingValue { name, .. } => name,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, SettingError::MissingRequiredSetting { .. })
    }
}

/// Every per-setting failure from one resolution pass, in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    errors: Vec<SettingError>,
}

impl ResolveError {
    pub(crate) fn new(errors: Vec<SettingError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    #[must_use]
    pub fn errors(&self) -> &[SettingError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<SettingError> {
        self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of required settings that were missing
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(|e| e.is_missing())
            .map(SettingError::name)
    }

    /// Errors for values that were present but invalid
    pub fn invalid(&self) -> impl Iterator<Item = &SettingError> {
        self.errors.iter().filter(|e| !e.is_missing())
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "configuration resolution failed with {} error(s)",
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResolveError {}

impl IntoIterator for ResolveError {
    type Item = SettingError;
    type IntoIter = std::vec::IntoIter<SettingError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
