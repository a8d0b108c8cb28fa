//! Setting specifications and value parsing
//!
//! # Overview
//!
//! A [`SettingSpec`] describes one configuration item: its name, the
//! environment variable it reads, whether it is required, an optional
//! default literal, and the [`SettingKind`] its raw string must parse as.
//!
//! ```rust
//! use envcfg::SettingSpec;
//!
//! let port = SettingSpec::integer("PORT")
//!     .default_value("8080")
//!     .min(1)
//!     .max(65535)
//!     .description("Listen port");
//!
//! let password = SettingSpec::string("DB_PASSWORD")
//!     .required()
//!     .secret();
//!
//! // Two settings can share one variable
//! let home = SettingSpec::url("WP_HOME").from_env("WP_FULL_URL").required();
//!
//! // Literals never touch the environment
//! let charset = SettingSpec::string("DB_CHARSET").fixed("utf8");
//! ```
//!
//! # Parsing Rules
//!
//! | Kind      | Accepted input                                              |
//! |-----------|-------------------------------------------------------------|
//! | `string`  | anything, verbatim (empty string included)                  |
//! | `integer` | signed 64-bit decimal, surrounding whitespace ignored       |
//! | `boolean` | `true/false`, `1/0`, `yes/no`, `on/off` (case-insensitive)   |
//! | `url`     | absolute URL, surrounding whitespace ignored                |

use crate::resolved::SettingValue;
use serde::{Deserialize, Serialize};
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

// =============================================================================
// Well-known Metadata Keys
// =============================================================================

/// Metadata keys the library reads itself.
///
/// Anything else stored through `.meta_*()` is free-form.
pub mod meta {
    /// Mark as secret (masked in `Debug`, docs, errors and redacted output)
    pub const SECRET: &str = "secret";
    /// Human readable description, used by the docs generator
    pub const DESCRIPTION: &str = "description";
    /// Grouping key, used by the docs generator
    pub const CATEGORY: &str = "category";
}

/// Placeholder printed in place of secret values
pub const REDACTED: &str = "****";

// =============================================================================
// Setting Kind
// =============================================================================

/// Declared type of a setting
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    #[default]
    String,
    Integer,
    Boolean,
    Url,
}

impl SettingKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKind::String => "string",
            SettingKind::Integer => "integer",
            SettingKind::Boolean => "boolean",
            SettingKind::Url => "url",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Setting Source
// =============================================================================

/// Where a setting's raw value comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingSource {
    /// Read from an environment variable. `None` means "same as the setting name".
    Env(Option<String>),
    /// A literal that is never looked up in the environment
    Fixed(String),
}

impl Default for SettingSource {
    fn default() -> Self {
        SettingSource::Env(None)
    }
}

// =============================================================================
// Kind-Specific Constraints
// =============================================================================

/// Constraints for integer settings (inclusive bounds)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IntegerConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

/// Constraints for string settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TextConstraints {
    /// Regex the whole value must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip)]
    compiled: CompiledPattern,
}

impl TextConstraints {
    /// Anchored regex for `pattern`, compiled once and reused across resolves
    fn regex(&self, pattern: &str) -> Result<Cow<'_, Regex>, String> {
        if let Some((source, re)) = self.compiled.0.get() {
            if source == pattern {
                return Ok(Cow::Borrowed(re));
            }
            // `pattern` was reassigned after the cache was filled
            return compile_anchored(pattern).map(Cow::Owned);
        }
        let re = compile_anchored(pattern)?;
        let (_, cached) = self
            .compiled
            .0
            .get_or_init(|| (pattern.to_string(), re));
        Ok(Cow::Borrowed(cached))
    }
}

/// Compiled form of [`TextConstraints::pattern`], ignored by equality
#[derive(Debug, Clone, Default)]
struct CompiledPattern(OnceLock<(String, Regex)>);

impl PartialEq for CompiledPattern {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for CompiledPattern {}

/// Constraints for URL settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UrlConstraints {
    /// Allowed schemes, lowercase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<String>>,
}

/// Kind-specific constraints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SettingConstraints {
    #[serde(flatten)]
    pub integer: IntegerConstraints,

    #[serde(flatten)]
    pub text: TextConstraints,

    #[serde(flatten)]
    pub url: UrlConstraints,
}

impl SettingConstraints {
    fn is_unconstrained(&self) -> bool {
        *self == SettingConstraints::default()
    }
}

// =============================================================================
// Setting Spec
// =============================================================================

/// Description of one configuration item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingSpec {
    /// Unique key in the schema and in the resolved config
    pub name: String,

    /// Declared type
    pub kind: SettingKind,

    /// Environment variable or fixed literal
    #[serde(default)]
    pub source: SettingSource,

    /// Fail resolution when absent and no default is set
    #[serde(default)]
    pub required: bool,

    /// Literal used when the variable is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Kind-specific constraints
    #[serde(flatten)]
    pub constraints: SettingConstraints,

    /// Free-form metadata (description, category, secret, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl SettingSpec {
    // =========================================================================
    // Kind-specific constructors
    // =========================================================================

    /// Create an optional setting of the given kind, read from the variable of the same name
    pub fn new(name: impl Into<String>, kind: SettingKind) -> Self {
        Self {
            name: name.into(),
            kind,
            source: SettingSource::default(),
            required: false,
            default: None,
            constraints: SettingConstraints::default(),
            metadata: HashMap::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, SettingKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, SettingKind::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, SettingKind::Boolean)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, SettingKind::Url)
    }

    // =========================================================================
    // Presence policy
    // =========================================================================

    /// Mark the setting as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the setting as optional (the default)
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Literal used when the environment variable is absent
    ///
    /// Never applied when the variable is present, even if it is empty.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    // =========================================================================
    // Source
    // =========================================================================

    /// Read from `var` instead of the variable named like the setting
    #[must_use]
    pub fn from_env(mut self, var: impl Into<String>) -> Self {
        self.source = SettingSource::Env(Some(var.into()));
        self
    }

    /// Use a literal that is never looked up in the environment
    #[must_use]
    pub fn fixed(mut self, value: impl Into<String>) -> Self {
        self.source = SettingSource::Fixed(value.into());
        self
    }

    /// Environment variable this setting reads, `None` for fixed literals
    pub fn env_var(&self) -> Option<&str> {
        match &self.source {
            SettingSource::Env(Some(var)) => Some(var),
            SettingSource::Env(None) => Some(&self.name),
            SettingSource::Fixed(_) => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.source, SettingSource::Fixed(_))
    }

    // =========================================================================
    // Constraint setters (builder pattern)
    // =========================================================================

    /// Inclusive lower bound for integer settings
    #[must_use]
    pub fn min(mut self, val: i64) -> Self {
        self.constraints.integer.min = Some(val);
        self
    }

    /// Inclusive upper bound for integer settings
    #[must_use]
    pub fn max(mut self, val: i64) -> Self {
        self.constraints.integer.max = Some(val);
        self
    }

    /// Regex the whole value of a string setting must match
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.text = TextConstraints {
            pattern: Some(pattern.into()),
            compiled: CompiledPattern::default(),
        };
        self
    }

    /// Allowed URL schemes for url settings
    #[must_use]
    pub fn schemes(mut self, schemes: &[&str]) -> Self {
        self.constraints.url.schemes =
            Some(schemes.iter().map(|s| s.to_ascii_lowercase()).collect());
        self
    }

    // =========================================================================
    // Dynamic metadata methods
    // =========================================================================

    #[must_use]
    pub fn meta_str(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata
            .insert(key.to_string(), Value::String(value.into()));
        self
    }

    #[must_use]
    pub fn meta_bool(mut self, key: &str, value: bool) -> Self {
        self.metadata.insert(key.to_string(), Value::Bool(value));
        self
    }

    pub fn get_meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    pub fn get_meta_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(|v| v.as_bool())
    }

    #[must_use]
    pub fn description(self, text: impl Into<String>) -> Self {
        self.meta_str(meta::DESCRIPTION, text)
    }

    #[must_use]
    pub fn category(self, name: impl Into<String>) -> Self {
        self.meta_str(meta::CATEGORY, name)
    }

    /// Mark setting as secret
    #[must_use]
    pub fn secret(self) -> Self {
        self.meta_bool(meta::SECRET, true)
    }

    pub fn is_secret(&self) -> bool {
        self.get_meta_bool(meta::SECRET).unwrap_or(false)
    }

    // =========================================================================
    // Parsing & Validation
    // =========================================================================

    /// Parse a raw string against this setting's kind and constraints
    ///
    /// The error is a human readable reason; the caller attaches name and raw value.
    pub fn parse(&self, raw: &str) -> Result<SettingValue, String> {
        let value = match self.kind {
            SettingKind::String => SettingValue::String(raw.to_string()),
            SettingKind::Integer => {
                SettingValue::Integer(raw.trim().parse::<i64>().map_err(|e| e.to_string())?)
            }
            SettingKind::Boolean => SettingValue::Boolean(parse_bool(raw)?),
            SettingKind::Url => {
                SettingValue::Url(Url::parse(raw.trim()).map_err(|e| e.to_string())?)
            }
        };
        self.check_constraints(&value)?;
        Ok(value)
    }

    fn check_constraints(&self, value: &SettingValue) -> Result<(), String> {
        match value {
            SettingValue::Integer(n) => {
                if let Some(min) = self.constraints.integer.min {
                    if *n < min {
                        return Err(format!("value must be at least {min}"));
                    }
                }
                if let Some(max) = self.constraints.integer.max {
                    if *n > max {
                        return Err(format!("value must be at most {max}"));
                    }
                }
            }
            SettingValue::String(text) => {
                if let Some(ref pattern) = self.constraints.text.pattern {
                    let re = self.constraints.text.regex(pattern)?;
                    if !re.is_match(text) {
                        return Err(format!("value does not match pattern: {pattern}"));
                    }
                }
            }
            SettingValue::Url(url) => {
                if let Some(ref schemes) = self.constraints.url.schemes {
                    if !schemes.iter().any(|s| s == url.scheme()) {
                        return Err(format!(
                            "scheme '{}' is not one of: {}",
                            url.scheme(),
                            schemes.join(", ")
                        ));
                    }
                }
            }
            SettingValue::Boolean(_) => {}
        }
        Ok(())
    }

    /// Validate the spec definition itself
    ///
    /// Checks:
    /// - The environment variable name is usable
    /// - Constraints fit the declared kind
    /// - `min <= max`, pattern is a valid non-empty regex, schemes non-empty
    /// - Default and fixed literals satisfy kind and constraints
    /// - A required fixed literal without default is non-empty
    pub fn validate_spec(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("setting name cannot be empty".to_string());
        }

        if let Some(var) = self.env_var() {
            if var.is_empty() || var.contains('=') || var.contains('\0') {
                return Err(format!("invalid environment variable name: {var:?}"));
            }
        }

        let c = &self.constraints;
        let has_integer = c.integer != IntegerConstraints::default();
        let has_text = c.text != TextConstraints::default();
        let has_url = c.url != UrlConstraints::default();
        let fits = match self.kind {
            SettingKind::Integer => !has_text && !has_url,
            SettingKind::String => !has_integer && !has_url,
            SettingKind::Url => !has_integer && !has_text,
            SettingKind::Boolean => c.is_unconstrained(),
        };
        if !fits {
            return Err(format!("constraints do not apply to {} settings", self.kind));
        }

        if let (Some(min), Some(max)) = (c.integer.min, c.integer.max) {
            if min > max {
                return Err(format!("min ({min}) cannot be greater than max ({max})"));
            }
        }

        if let Some(ref pattern) = c.text.pattern {
            if pattern.is_empty() {
                return Err("pattern cannot be empty string".to_string());
            }
            c.text.regex(pattern)?;
        }

        if let Some(ref schemes) = c.url.schemes {
            if schemes.is_empty() {
                return Err("schemes list cannot be empty".to_string());
            }
        }

        if let Some(ref default) = self.default {
            self.parse(default)
                .map_err(|e| format!("default value is invalid: {e}"))?;
        }

        if let SettingSource::Fixed(ref literal) = self.source {
            if literal.is_empty() && self.required && self.default.is_none() {
                return Err("required fixed value cannot be empty".to_string());
            }
            self.parse(literal)
                .map_err(|e| format!("fixed value is invalid: {e}"))?;
        }

        Ok(())
    }
}

fn compile_anchored(pattern: &str) -> Result<Regex, String> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|e| format!("invalid regex pattern: {e}"))
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    let value = raw.trim();
    const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];
    const FALSY: [&str; 4] = ["false", "0", "no", "off"];

    if TRUTHY.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Ok(true)
    } else if FALSY.iter().any(|f| value.eq_ignore_ascii_case(f)) {
        Ok(false)
    } else {
        Err("expected one of true/false, 1/0, yes/no, on/off".to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
