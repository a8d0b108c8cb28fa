//! WordPress container configuration
//!
//! Declares the settings a containerised WordPress site needs at startup and
//! exposes them as a typed [`WordPressConfig`]:
//!
//! | Setting        | Source                    | Kind    |
//! |----------------|---------------------------|---------|
//! | `DB_NAME`      | `DB_NAME` (required)      | string  |
//! | `DB_USER`      | `DB_USER` (required)      | string  |
//! | `DB_PASSWORD`  | `DB_PASSWORD` (required)  | string  |
//! | `DB_HOST`      | `DB_HOST` or `localhost`  | string  |
//! | `WP_HOME`      | `WP_FULL_URL` (required)  | url     |
//! | `WP_SITEURL`   | `WP_FULL_URL` (required)  | url     |
//! | `DB_CHARSET`   | fixed `utf8`              | string  |
//! | `DB_COLLATE`   | fixed empty               | string  |
//! | `table_prefix` | fixed `wp_`               | string  |
//! | `WP_DEBUG`     | fixed `false`             | boolean |

use crate::config::{REDACTED, Schema, SettingSpec};
use crate::env::{EnvSource, ProcessEnv};
use crate::error::Result;
use crate::resolved::ResolvedConfig;
use crate::resolver::{ConfigResolver, load_from};
use std::fmt;
use url::Url;

/// Setting names
pub mod keys {
    pub const DB_NAME: &str = "DB_NAME";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASSWORD: &str = "DB_PASSWORD";
    pub const DB_HOST: &str = "DB_HOST";
    pub const WP_HOME: &str = "WP_HOME";
    pub const WP_SITEURL: &str = "WP_SITEURL";
    pub const DB_CHARSET: &str = "DB_CHARSET";
    pub const DB_COLLATE: &str = "DB_COLLATE";
    pub const TABLE_PREFIX: &str = "table_prefix";
    pub const WP_DEBUG: &str = "WP_DEBUG";

    /// Environment variable holding the public site URL
    pub const WP_FULL_URL: &str = "WP_FULL_URL";
}

pub const DEFAULT_DB_HOST: &str = "localhost";

/// The WordPress settings schema
///
/// # Errors
///
/// Only fails if the declarations below are edited into an invalid schema.
pub fn schema() -> Result<Schema> {
    Schema::builder()
        .setting(
            SettingSpec::string(keys::DB_NAME)
                .required()
                .category("database")
                .description("Name of the WordPress database"),
        )
        .setting(
            SettingSpec::string(keys::DB_USER)
                .required()
                .category("database")
                .description("Database user"),
        )
        .setting(
            SettingSpec::string(keys::DB_PASSWORD)
                .required()
                .secret()
                .category("database")
                .description("Database password"),
        )
        .setting(
            SettingSpec::string(keys::DB_HOST)
                .required()
                .default_value(DEFAULT_DB_HOST)
                .category("database")
                .description("Database host, optionally with :port"),
        )
        .setting(
            SettingSpec::url(keys::WP_HOME)
                .from_env(keys::WP_FULL_URL)
                .required()
                .schemes(&["http", "https"])
                .category("site")
                .description("Public site URL"),
        )
        .setting(
            SettingSpec::url(keys::WP_SITEURL)
                .from_env(keys::WP_FULL_URL)
                .required()
                .schemes(&["http", "https"])
                .category("site"),
        )
        .setting(
            SettingSpec::string(keys::DB_CHARSET)
                .fixed("utf8")
                .category("database"),
        )
        .setting(
            SettingSpec::string(keys::DB_COLLATE)
                .fixed("")
                .category("database"),
        )
        .setting(
            SettingSpec::string(keys::TABLE_PREFIX)
                .fixed("wp_")
                .pattern("[A-Za-z0-9_]+")
                .category("database"),
        )
        .setting(
            SettingSpec::boolean(keys::WP_DEBUG)
                .fixed("false")
                .category("site"),
        )
        .build()
}

/// Typed WordPress configuration
#[derive(Clone, PartialEq, Eq)]
pub struct WordPressConfig {
    pub db_name: String,
    pub db_user: String,
    db_password: String,
    pub db_host: String,
    pub home: Url,
    pub site_url: Url,
    pub db_charset: String,
    pub db_collate: String,
    pub table_prefix: String,
    pub debug: bool,
}

impl WordPressConfig {
    /// Extract from a config resolved with [`schema`]
    ///
    /// # Errors
    ///
    /// `SettingNotFound` or `TypeMismatch` if `config` was resolved from another schema.
    pub fn from_resolved(config: &ResolvedConfig) -> Result<Self> {
        Ok(Self {
            db_name: config.get_str(keys::DB_NAME)?.to_string(),
            db_user: config.get_str(keys::DB_USER)?.to_string(),
            db_password: config.get_str(keys::DB_PASSWORD)?.to_string(),
            db_host: config.get_str(keys::DB_HOST)?.to_string(),
            home: config.get_url(keys::WP_HOME)?.clone(),
            site_url: config.get_url(keys::WP_SITEURL)?.clone(),
            db_charset: config.get_str(keys::DB_CHARSET)?.to_string(),
            db_collate: config.get_str(keys::DB_COLLATE)?.to_string(),
            table_prefix: config.get_str(keys::TABLE_PREFIX)?.to_string(),
            debug: config.get_bool(keys::WP_DEBUG)?,
        })
    }

    /// Resolve from any environment source
    ///
    /// # Errors
    ///
    /// `Error::Resolve` with every missing or invalid variable.
    pub fn from_env<E>(env: &E) -> Result<Self>
    where
        E: EnvSource + ?Sized,
    {
        let config = load_from(&ConfigResolver::new(), &schema()?, env)?;
        Self::from_resolved(&config)
    }

    /// Resolve from the process environment
    ///
    /// # Errors
    ///
    /// See [`WordPressConfig::from_env`].
    pub fn load() -> Result<Self> {
        Self::from_env(&ProcessEnv)
    }

    pub fn db_password(&self) -> &str {
        &self.db_password
    }
}

impl fmt::Debug for WordPressConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordPressConfig")
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &REDACTED)
            .field("db_host", &self.db_host)
            .field("home", &self.home.as_str())
            .field("site_url", &self.site_url.as_str())
            .field("db_charset", &self.db_charset)
            .field("db_collate", &self.db_collate)
            .field("table_prefix", &self.table_prefix)
            .field("debug", &self.debug)
            .finish()
    }
}
