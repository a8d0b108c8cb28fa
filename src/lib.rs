//! # envcfg - Environment Configuration Resolver
//!
//! Typed, schema-driven configuration resolution from environment variables.
//!
//! ## Features
//!
//! - **Typed Schema**: Declare each setting's kind (string, integer, boolean, URL), presence policy and default
//! - **All Errors At Once**: Every missing or invalid variable is reported in a single pass
//! - **Immutable Result**: `ResolvedConfig` is built once and shared read-only
//! - **Injectable Environment**: Resolve against the process, a snapshot, a `.env` file or a closure
//! - **Secret Settings**: Mark settings with `.secret()` to keep them out of `Debug`, errors and docs
//! - **Docs Generation**: Markdown reference and `.env` template straight from the schema
//!
//! ## Quick Start
//!
//! ```rust
//! use envcfg::{resolve, EnvSnapshot, Schema, SettingSpec};
//!
//! let schema = Schema::builder()
//!     .setting(SettingSpec::string("DB_NAME").required())
//!     .setting(SettingSpec::string("DB_USER").required())
//!     .setting(SettingSpec::string("DB_HOST").required().default_value("localhost"))
//!     .build()?;
//!
//! let env = EnvSnapshot::from_pairs([("DB_NAME", "app"), ("DB_USER", "admin")]);
//! let config = resolve(&schema, &env)?;
//!
//! assert_eq!(config.get_str("DB_HOST")?, "localhost");
//! # Ok::<(), envcfg::Error>(())
//! ```
//!
//! ## Startup
//!
//! At process start, [`load`] resolves against the live environment and logs
//! the outcome through the `log` facade. On failure the returned error lists
//! every problem; the application should report it and exit.
//!
//! ```rust,no_run
//! use envcfg::wordpress;
//!
//! # fn main() -> envcfg::Result<()> {
//! let config = envcfg::load(&wordpress::schema()?)?;
//! let site = wordpress::WordPressConfig::from_resolved(&config)?;
//! println!("serving {}", site.home);
//! # Ok(())
//! # }
//! ```

// Core modules
mod docs;
mod error;
mod resolved;
mod resolver;

// Grouped modules
pub mod config;
pub mod env;

// Presets
pub mod wordpress;

// Re-exports from core
pub use docs::{DocsConfig, generate_docs, generate_env_template};
pub use error::{Error, ResolveError, Result, SettingError};
pub use resolved::{ResolvedConfig, ResolvedEntry, SettingValue, ValueOrigin};
pub use resolver::{ConfigResolver, load, load_from, resolve};

#[cfg(feature = "dotenv")]
pub use resolver::load_with_env_file;

// Re-exports from config
pub use config::{Schema, SchemaBuilder, SettingKind, SettingSource, SettingSpec};

// Re-exports from env
pub use env::{EnvSnapshot, EnvSource, FnEnv, ProcessEnv};
