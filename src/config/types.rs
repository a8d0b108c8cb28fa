//! Schema: the ordered, validated set of settings

use crate::config::SettingSpec;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Ordered collection of [`SettingSpec`] with unique names
///
/// A `Schema` can only be obtained through validation, so resolution never sees
/// an empty schema, duplicate names or a default that does not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    specs: Vec<SettingSpec>,
}

impl Schema {
    /// Build a schema from specs in declaration order
    ///
    /// # Errors
    ///
    /// - [`Error::EmptySchema`] when `specs` is empty
    /// - [`Error::DuplicateSettingName`] for the first repeated name
    /// - [`Error::InvalidSettingSpec`] when a spec fails [`SettingSpec::validate_spec`]
    ///
    /// # Example
    /// ```rust
    /// use envcfg::{Schema, SettingSpec};
    ///
    /// let schema = Schema::new(vec![
    ///     SettingSpec::string("DB_NAME").required(),
    ///     SettingSpec::string("DB_HOST").required().default_value("localhost"),
    /// ])?;
    /// assert_eq!(schema.len(), 2);
    /// # Ok::<(), envcfg::Error>(())
    /// ```
    pub fn new(specs: Vec<SettingSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(Error::EmptySchema);
        }

        let mut seen = HashSet::with_capacity(specs.len());
        for spec in &specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::DuplicateSettingName(spec.name.clone()));
            }
            spec.validate_spec()
                .map_err(|reason| Error::InvalidSettingSpec {
                    name: spec.name.clone(),
                    reason,
                })?;
        }

        Ok(Self { specs })
    }

    /// Create a new builder for Schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Look up a spec by setting name
    pub fn get(&self, name: &str) -> Option<&SettingSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Specs in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, SettingSpec> {
        self.specs.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Distinct environment variables read by this schema, first-use order
    pub fn env_vars(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.specs
            .iter()
            .filter_map(SettingSpec::env_var)
            .filter(|var| seen.insert(*var))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SettingSpec;
    type IntoIter = std::slice::Iter<'a, SettingSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

impl TryFrom<Vec<SettingSpec>> for Schema {
    type Error = Error;

    fn try_from(specs: Vec<SettingSpec>) -> Result<Self> {
        Self::new(specs)
    }
}

/// Builder for creating a Schema with a fluent API
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    specs: Vec<SettingSpec>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a setting
    #[must_use]
    pub fn setting(mut self, spec: SettingSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Append several settings
    #[must_use]
    pub fn settings(mut self, specs: impl IntoIterator<Item = SettingSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Validate and build the Schema
    ///
    /// # Errors
    ///
    /// See [`Schema::new`].
    pub fn build(self) -> Result<Schema> {
        Schema::new(self.specs)
    }
}

/// Macro for building a [`Schema`] from a list of specs
///
/// Expands to [`Schema::new`], so it returns `Result<Schema>`.
///
/// # Example
/// ```rust
/// use envcfg::{schema, SettingSpec};
///
/// let schema = schema![
///     SettingSpec::string("DB_NAME").required(),
///     SettingSpec::boolean("WP_DEBUG").fixed("false"),
/// ]?;
/// assert!(schema.contains("WP_DEBUG"));
/// # Ok::<(), envcfg::Error>(())
/// ```
#[macro_export]
macro_rules! schema {
    ($($spec:expr),* $(,)?) => {
        $crate::Schema::new(vec![$($spec),*])
    };
}
