//! Schema types
//!
//! This module contains the declarative side of configuration:
//! - `SettingSpec` - One setting: name, kind, source, presence policy, constraints
//! - `Schema` - Ordered, validated collection of specs

mod schema;
mod types;

pub use schema::{
    IntegerConstraints, REDACTED, SettingConstraints, SettingKind, SettingSource, SettingSpec,
    TextConstraints, UrlConstraints, meta,
};

pub use types::{Schema, SchemaBuilder};
