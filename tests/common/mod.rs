//! Common test utilities for envcfg integration tests
//!
//! Provides shared schemas, environment snapshots and helper functions.

#![allow(dead_code)]

use envcfg::{EnvSnapshot, Schema, SettingSpec};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Test Schemas
// =============================================================================

/// The three-setting database schema used throughout the scenarios
pub fn db_schema() -> Schema {
    Schema::builder()
        .setting(SettingSpec::string("DB_NAME").required())
        .setting(SettingSpec::string("DB_USER").required())
        .setting(
            SettingSpec::string("DB_HOST")
                .required()
                .default_value("localhost"),
        )
        .build()
        .expect("db schema is valid")
}

/// A schema touching every kind, constraint and source
pub fn service_schema() -> Schema {
    Schema::builder()
        .setting(
            SettingSpec::string("SERVICE_NAME")
                .required()
                .pattern("[a-z][a-z0-9-]*")
                .category("general")
                .description("Service identifier"),
        )
        .setting(
            SettingSpec::integer("PORT")
                .default_value("8080")
                .min(1)
                .max(65535)
                .category("network"),
        )
        .setting(
            SettingSpec::boolean("VERBOSE")
                .default_value("false")
                .category("general"),
        )
        .setting(
            SettingSpec::url("PUBLIC_URL")
                .required()
                .schemes(&["http", "https"])
                .category("network"),
        )
        .setting(
            SettingSpec::string("API_TOKEN")
                .required()
                .secret()
                .category("security"),
        )
        .setting(SettingSpec::string("PROXY").category("network"))
        .setting(SettingSpec::string("REGION").fixed("eu-west-1"))
        .build()
        .expect("service schema is valid")
}

/// A fully populated environment for [`service_schema`]
pub fn service_env() -> EnvSnapshot {
    EnvSnapshot::from_pairs([
        ("SERVICE_NAME", "billing-api"),
        ("PORT", "9090"),
        ("VERBOSE", "yes"),
        ("PUBLIC_URL", "https://billing.example.com/api"),
        ("API_TOKEN", "tok_live_abcdef"),
    ])
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Temporary directory holding a `.env` file
pub struct EnvFileFixture {
    pub temp_dir: TempDir,
}

impl EnvFileFixture {
    /// Write `contents` to `<tmp>/.env`
    pub fn new(contents: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join(".env"), contents).expect("Failed to write .env");
        Self { temp_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join(".env")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Route `log` output through env_logger in test mode
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
