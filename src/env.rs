//! Environment variable sources
//!
//! Resolution never reads `std::env` directly; it goes through an [`EnvSource`].
//! That keeps `resolve` a pure function of its inputs and lets tests inject
//! a snapshot instead of mutating the process environment.

use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::hash::BuildHasher;

#[cfg(feature = "dotenv")]
use crate::error::{Error, Result};
#[cfg(feature = "dotenv")]
use std::path::Path;

/// Capability to look up an environment variable by name
pub trait EnvSource {
    /// Value of `name`, or `None` if it is not set
    fn var(&self, name: &str) -> Option<String>;
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

// =============================================================================
// Process Environment
// =============================================================================

/// The live process environment
///
/// Values that are not valid UTF-8 are logged at `warn` and treated as unset,
/// so a mangled secret never resolves silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        decode_value(name, std::env::var_os(name)?)
    }
}

fn decode_value(name: &str, value: OsString) -> Option<String> {
    match value.into_string() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Environment variable {name} is not valid UTF-8, treating it as unset");
            None
        }
    }
}

// =============================================================================
// Closure Adapter
// =============================================================================

/// Adapts any `Fn(&str) -> Option<String>` into an [`EnvSource`]
///
/// ```rust
/// use envcfg::{EnvSource, FnEnv};
///
/// let env = FnEnv(|name: &str| (name == "DB_HOST").then(|| "mariadb".to_string()));
/// assert_eq!(env.var("DB_HOST").as_deref(), Some("mariadb"));
/// assert_eq!(env.var("DB_USER"), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnEnv<F>(pub F);

impl<F> EnvSource for FnEnv<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Owned, ordered snapshot of name/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    ///
    /// Entries whose name or value is not valid UTF-8 are skipped with a warning.
    pub fn capture() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| {
                let name = match k.into_string() {
                    Ok(name) => name,
                    Err(k) => {
                        warn!("Skipping non UTF-8 environment variable {}", k.to_string_lossy());
                        return None;
                    }
                };
                let value = decode_value(&name, v)?;
                Some((name, value))
            })
            .collect()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Add or replace one variable
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Remove one variable
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.vars.remove(name);
        self
    }

    /// Overlay `other` on top of `self`; variables in `other` win
    #[must_use]
    pub fn layer(mut self, other: EnvSnapshot) -> Self {
        self.vars.extend(other.vars);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a `.env` file without touching the process environment
    ///
    /// # Errors
    ///
    /// Returns [`Error::EnvFile`] if the file cannot be read or a line cannot be parsed.
    #[cfg(feature = "dotenv")]
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let to_error = |source| Error::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let mut vars = BTreeMap::new();
        for item in dotenvy::from_path_iter(path).map_err(to_error)? {
            let (key, value) = item.map_err(to_error)?;
            vars.insert(key, value);
        }
        log::debug!("Read {} variables from {}", vars.len(), path.display());
        Ok(Self { vars })
    }

    /// Process environment layered over a `.env` file (process variables win)
    ///
    /// # Errors
    ///
    /// See [`EnvSnapshot::from_env_file`].
    #[cfg(feature = "dotenv")]
    pub fn capture_with_env_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_env_file(path)?.layer(Self::capture()))
    }
}

impl EnvSource for EnvSnapshot {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for EnvSnapshot {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.vars
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookup() {
        let env = EnvSnapshot::from_pairs([("DB_NAME", "app"), ("DB_COLLATE", "")]);

        assert_eq!(env.var("DB_NAME").as_deref(), Some("app"));
        assert_eq!(env.var("DB_COLLATE").as_deref(), Some(""));
        assert_eq!(env.var("DB_USER"), None);
    }

    #[test]
    fn test_layer_right_wins() {
        let base = EnvSnapshot::new().with("A", "file").with("B", "file");
        let top = EnvSnapshot::new().with("B", "process");

        let merged = base.layer(top);
        assert_eq!(merged.get("A"), Some("file"));
        assert_eq!(merged.get("B"), Some("process"));
        assert_eq!(merged.without("A").len(), 1);
    }

    #[test]
    fn test_map_sources() {
        let mut hash = HashMap::new();
        hash.insert("K".to_string(), "v".to_string());
        let mut btree = BTreeMap::new();
        btree.insert("K".to_string(), "w".to_string());

        assert_eq!(hash.var("K").as_deref(), Some("v"));
        assert_eq!((&btree).var("K").as_deref(), Some("w"));
    }

    #[test]
    fn test_process_env_reads_path() {
        assert_eq!(ProcessEnv.var("ENVCFG_SURELY_UNSET_VARIABLE_0x5f3759df"), None);
        assert_eq!(ProcessEnv.var("PATH"), std::env::var("PATH").ok());
    }

    #[test]
    fn test_utf8_value_decoded() {
        assert_eq!(
            decode_value("DB_PASSWORD", OsString::from("s3cret")).as_deref(),
            Some("s3cret")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_value_is_unset_not_mangled() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b'p', b'w', 0xff, b'!']);

        assert_eq!(decode_value("DB_PASSWORD", raw), None);
    }
}
