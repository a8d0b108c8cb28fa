//! The immutable result of resolution

use crate::config::{REDACTED, SettingKind};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use url::Url;

// =============================================================================
// Setting Value
// =============================================================================

/// A typed setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Boolean(bool),
    Integer(i64),
    Url(Url),
    String(String),
}

impl SettingValue {
    /// Kind this value was parsed as
    #[must_use]
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::String(_) => SettingKind::String,
            SettingValue::Integer(_) => SettingKind::Integer,
            SettingValue::Boolean(_) => SettingKind::Boolean,
            SettingValue::Url(_) => SettingKind::Url,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            SettingValue::Url(u) => Some(u),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            SettingValue::String(s) => Value::String(s.clone()),
            SettingValue::Integer(n) => Value::from(*n),
            SettingValue::Boolean(b) => Value::Bool(*b),
            SettingValue::Url(u) => Value::String(u.to_string()),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(s) => f.write_str(s),
            SettingValue::Integer(n) => write!(f, "{n}"),
            SettingValue::Boolean(b) => write!(f, "{b}"),
            SettingValue::Url(u) => write!(f, "{u}"),
        }
    }
}

// =============================================================================
// Resolved Entries
// =============================================================================

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueOrigin {
    /// Read from the environment
    Environment,
    /// Variable absent, spec default applied
    Default,
    /// Fixed literal from the schema
    Fixed,
    /// Optional setting with neither value nor default
    Unset,
}

/// One resolved setting
#[derive(Clone, PartialEq)]
pub struct ResolvedEntry {
    pub name: String,
    pub value: Option<SettingValue>,
    pub origin: ValueOrigin,
    pub secret: bool,
}

impl fmt::Debug for ResolvedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ResolvedEntry");
        debug.field("name", &self.name);
        if self.secret && self.value.is_some() {
            debug.field("value", &REDACTED);
        } else {
            debug.field("value", &self.value);
        }
        debug
            .field("origin", &self.origin)
            .field("secret", &self.secret)
            .finish()
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

/// Immutable, validated configuration: one entry per schema setting, in schema order
///
/// Values are reached through accessors; there is no way to mutate a
/// `ResolvedConfig` after resolution, so it can be shared freely across threads.
///
/// # Example
/// ```rust
/// use envcfg::{resolve, EnvSnapshot, Schema, SettingSpec};
///
/// let schema = Schema::new(vec![
///     SettingSpec::string("DB_NAME").required(),
///     SettingSpec::integer("DB_PORT").default_value("3306"),
/// ])?;
/// let env = EnvSnapshot::from_pairs([("DB_NAME", "app")]);
///
/// let config = resolve(&schema, &env)?;
/// assert_eq!(config.get_str("DB_NAME")?, "app");
/// assert_eq!(config.get_i64("DB_PORT")?, 3306);
/// # Ok::<(), envcfg::Error>(())
/// ```
#[derive(Clone, PartialEq)]
pub struct ResolvedConfig {
    entries: Vec<ResolvedEntry>,
    index: HashMap<String, usize>,
}

impl ResolvedConfig {
    pub(crate) fn new(entries: Vec<ResolvedEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        Self { entries, index }
    }

    fn entry(&self, name: &str) -> Option<&ResolvedEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Value of a setting, `None` when unknown or unset
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.entry(name).and_then(|e| e.value.as_ref())
    }

    /// Whether the setting has a value
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Origin of a setting's value, `None` when the name is unknown
    pub fn origin(&self, name: &str) -> Option<ValueOrigin> {
        self.entry(name).map(|e| e.origin)
    }

    fn require(&self, name: &str) -> Result<&SettingValue> {
        self.get(name).ok_or_else(|| Error::SettingNotFound(name.to_string()))
    }

    /// # Errors
    ///
    /// [`Error::SettingNotFound`] when unknown or unset, [`Error::TypeMismatch`] for other kinds.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.require(name)? {
            SettingValue::String(text) => Ok(text.as_str()),
            other => Err(mismatch(name, SettingKind::String, other)),
        }
    }

    /// # Errors
    ///
    /// See [`ResolvedConfig::get_str`].
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        match self.require(name)? {
            SettingValue::Integer(n) => Ok(*n),
            other => Err(mismatch(name, SettingKind::Integer, other)),
        }
    }

    /// # Errors
    ///
    /// See [`ResolvedConfig::get_str`].
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.require(name)? {
            SettingValue::Boolean(b) => Ok(*b),
            other => Err(mismatch(name, SettingKind::Boolean, other)),
        }
    }

    /// # Errors
    ///
    /// See [`ResolvedConfig::get_str`].
    pub fn get_url(&self, name: &str) -> Result<&Url> {
        match self.require(name)? {
            SettingValue::Url(url) => Ok(url),
            other => Err(mismatch(name, SettingKind::Url, other)),
        }
    }

    /// Entries in schema order
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object of all values with secrets replaced by `"****"`
    ///
    /// Unset settings map to `null`.
    #[must_use]
    pub fn redacted_json(&self) -> Value {
        let mut map = Map::new();
        for entry in &self.entries {
            let value = match (&entry.value, entry.secret) {
                (None, _) => Value::Null,
                (Some(_), true) => Value::String(REDACTED.to_string()),
                (Some(v), false) => v.to_json(),
            };
            map.insert(entry.name.clone(), value);
        }
        Value::Object(map)
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ResolvedConfig {
    type Item = &'a ResolvedEntry;
    type IntoIter = std::slice::Iter<'a, ResolvedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn mismatch(name: &str, expected: SettingKind, actual: &SettingValue) -> Error {
    Error::TypeMismatch {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}
