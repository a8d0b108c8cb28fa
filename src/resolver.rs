//! Resolution of a [`Schema`] against an environment
//!
//! [`ConfigResolver::resolve`] is a single pass over the schema that collects
//! every problem before failing, so an operator sees all missing and invalid
//! variables at once. It performs no I/O of its own and does not log; the
//! `load*` functions wrap it for process startup and report the outcome.

use crate::config::{REDACTED, Schema, SettingSource, SettingSpec};
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{ResolveError, Result, SettingError};
use crate::resolved::{ResolvedConfig, ResolvedEntry, SettingValue, ValueOrigin};
use log::{debug, error, info};

#[cfg(feature = "dotenv")]
use crate::env::EnvSnapshot;
#[cfg(feature = "dotenv")]
use std::path::Path;

/// Turns a [`Schema`] plus an [`EnvSource`] into a [`ResolvedConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigResolver {
    env_prefix: Option<String>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `{PREFIX}_{VAR}` instead of `VAR`
    ///
    /// A blank prefix means no prefix.
    ///
    /// # Example
    /// ```rust
    /// use envcfg::{ConfigResolver, EnvSnapshot, Schema, SettingSpec};
    ///
    /// let schema = Schema::new(vec![SettingSpec::string("DB_NAME").required()])?;
    /// let env = EnvSnapshot::from_pairs([("MYAPP_DB_NAME", "app")]);
    ///
    /// let config = ConfigResolver::new().with_env_prefix("myapp").resolve(&schema, &env)?;
    /// assert_eq!(config.get_str("DB_NAME")?, "app");
    /// # Ok::<(), envcfg::Error>(())
    /// ```
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.env_prefix = (!prefix.trim().is_empty()).then_some(prefix);
        self
    }

    /// Full environment variable name a spec is read from, `None` for fixed literals
    pub fn env_var_name(&self, spec: &SettingSpec) -> Option<String> {
        let var = spec.env_var()?;
        Some(match self.env_prefix {
            Some(ref prefix) => format!("{}_{}", prefix.to_uppercase(), var),
            None => var.to_string(),
        })
    }

    /// Resolve every setting in `schema`
    ///
    /// For each spec, in order: fixed literals are used as-is; otherwise the
    /// variable is looked up, falling back to the default only when it is
    /// absent. Missing required settings and unparsable values are collected
    /// and returned together; no partially resolved config is ever produced.
    ///
    /// # Errors
    ///
    /// [`ResolveError`] carrying every [`SettingError`] in schema order.
    pub fn resolve<E>(
        &self,
        schema: &Schema,
        env: &E,
    ) -> std::result::Result<ResolvedConfig, ResolveError>
    where
        E: EnvSource + ?Sized,
    {
        let mut entries = Vec::with_capacity(schema.len());
        let mut errors = Vec::new();

        for spec in schema {
            match self.resolve_one(spec, env) {
                Ok(entry) => entries.push(entry),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(ResolvedConfig::new(entries))
        } else {
            Err(ResolveError::new(errors))
        }
    }

    fn resolve_one<E>(
        &self,
        spec: &SettingSpec,
        env: &E,
    ) -> std::result::Result<ResolvedEntry, SettingError>
    where
        E: EnvSource + ?Sized,
    {
        let (raw, origin) = match (&spec.source, self.env_var_name(spec)) {
            (SettingSource::Fixed(literal), _) => (Some(literal.clone()), ValueOrigin::Fixed),
            (SettingSource::Env(_), Some(var)) => match env.var(&var) {
                Some(value) => (Some(value), ValueOrigin::Environment),
                None => match spec.default {
                    Some(ref default) => (Some(default.clone()), ValueOrigin::Default),
                    None if spec.required => {
                        return Err(SettingError::MissingRequiredSetting {
                            name: spec.name.clone(),
                            env_var: var,
                        });
                    }
                    None => (None, ValueOrigin::Unset),
                },
            },
            (SettingSource::Env(_), None) => (None, ValueOrigin::Unset),
        };

        let value = match raw {
            Some(raw) => Some(parse_checked(spec, origin, raw)?),
            None => None,
        };

        Ok(ResolvedEntry {
            name: spec.name.clone(),
            value,
            origin,
            secret: spec.is_secret(),
        })
    }
}

fn parse_checked(
    spec: &SettingSpec,
    origin: ValueOrigin,
    raw: String,
) -> std::result::Result<SettingValue, SettingError> {
    let invalid = |raw: String, reason: String| SettingError::InvalidSettingValue {
        name: spec.name.clone(),
        kind: spec.kind,
        raw: if spec.is_secret() {
            REDACTED.to_string()
        } else {
            raw
        },
        reason,
    };

    // Defaults and fixed literals were validated with the schema
    if raw.is_empty()
        && spec.required
        && spec.default.is_none()
        && origin == ValueOrigin::Environment
    {
        return Err(invalid(raw, "value must not be empty".to_string()));
    }

    spec.parse(&raw).map_err(|reason| invalid(raw, reason))
}

/// Resolve `schema` against `env` with a default [`ConfigResolver`]
///
/// # Errors
///
/// See [`ConfigResolver::resolve`].
pub fn resolve<E>(schema: &Schema, env: &E) -> std::result::Result<ResolvedConfig, ResolveError>
where
    E: EnvSource + ?Sized,
{
    ConfigResolver::new().resolve(schema, env)
}

// =============================================================================
// Startup Entry Points
// =============================================================================

/// Resolve `schema` against the live process environment, logging the outcome
///
/// Intended for process startup: on error the caller should abort and report
/// every error in the returned list.
///
/// # Errors
///
/// [`crate::Error::Resolve`] when any setting fails.
pub fn load(schema: &Schema) -> Result<ResolvedConfig> {
    load_from(&ConfigResolver::new(), schema, &ProcessEnv)
}

/// Resolve `schema` against the process environment layered over a `.env` file
///
/// Variables already set in the process take precedence over the file.
///
/// # Errors
///
/// [`crate::Error::EnvFile`] when the file cannot be read, otherwise see [`load`].
#[cfg(feature = "dotenv")]
pub fn load_with_env_file(schema: &Schema, path: impl AsRef<Path>) -> Result<ResolvedConfig> {
    let env = EnvSnapshot::capture_with_env_file(path)?;
    load_from(&ConfigResolver::new(), schema, &env)
}

/// [`load`] with an explicit resolver and environment
///
/// # Errors
///
/// [`crate::Error::Resolve`] when any setting fails.
pub fn load_from<E>(resolver: &ConfigResolver, schema: &Schema, env: &E) -> Result<ResolvedConfig>
where
    E: EnvSource + ?Sized,
{
    match resolver.resolve(schema, env) {
        Ok(config) => {
            for entry in &config {
                debug!("Setting {} resolved from {:?}", entry.name, entry.origin);
            }
            info!("Resolved {} settings", config.len());
            Ok(config)
        }
        Err(e) => {
            for setting_error in e.errors() {
                error!("{setting_error}");
            }
            error!("Configuration resolution failed with {} error(s)", e.len());
            Err(e.into())
        }
    }
}
