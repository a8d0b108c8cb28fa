//! Edge Cases Integration Tests
//!
//! Tests for edge cases, error conditions, and boundary behaviors:
//! - Schema construction failures before any lookup
//! - Empty strings versus absence
//! - Whitespace and case handling per kind
//! - Shared variables and fixed literals
//! - Concurrent resolution and read-only sharing

mod common;

use common::{db_schema, service_env, service_schema};
use envcfg::{
    EnvSnapshot, Error, ResolvedConfig, Schema, SettingError, SettingSpec, ValueOrigin, resolve,
    schema,
};
use std::sync::{Arc, Barrier};
use std::thread;

// =============================================================================
// Schema Construction
// =============================================================================

#[test]
fn test_duplicate_rejected_at_construction() {
    let result = schema![
        SettingSpec::string("DB_NAME").required(),
        SettingSpec::integer("PORT"),
        SettingSpec::string("DB_NAME").required(),
    ];

    match result {
        Err(Error::DuplicateSettingName(name)) => assert_eq!(name, "DB_NAME"),
        other => panic!("expected duplicate error, got {other:?}"),
    }
}

#[test]
fn test_schema_errors_are_flagged() {
    let errors = [
        Schema::new(Vec::new()).unwrap_err(),
        Schema::new(vec![SettingSpec::string("A"), SettingSpec::string("A")]).unwrap_err(),
        Schema::new(vec![SettingSpec::boolean("B").default_value("perhaps")]).unwrap_err(),
    ];

    for err in &errors {
        assert!(err.is_schema_error(), "{err}");
        assert!(err.setting_errors().is_empty());
    }
}

#[test]
fn test_invalid_fixed_literal_rejected() {
    let err = Schema::new(vec![SettingSpec::integer("WORKERS").fixed("many")]).unwrap_err();

    assert!(matches!(err, Error::InvalidSettingSpec { ref name, .. } if name == "WORKERS"));
}

// =============================================================================
// Empty Strings vs Absence
// =============================================================================

#[test]
fn test_default_not_applied_to_empty_string() {
    let schema = Schema::new(vec![
        SettingSpec::string("SUFFIX").default_value("-prod"),
        SettingSpec::string("LABEL").required().default_value("main"),
    ])
    .unwrap();
    let env = EnvSnapshot::from_pairs([("SUFFIX", ""), ("LABEL", "")]);

    let config = resolve(&schema, &env).unwrap();

    assert_eq!(config.get_str("SUFFIX").unwrap(), "");
    assert_eq!(config.get_str("LABEL").unwrap(), "");
    assert_eq!(config.origin("SUFFIX"), Some(ValueOrigin::Environment));
}

#[test]
fn test_empty_string_invalid_for_non_string_kinds() {
    let schema = Schema::new(vec![
        SettingSpec::integer("PORT").default_value("80"),
        SettingSpec::boolean("DEBUG").default_value("false"),
        SettingSpec::url("HOME").default_value("http://localhost"),
    ])
    .unwrap();
    let env = EnvSnapshot::from_pairs([("PORT", ""), ("DEBUG", ""), ("HOME", "")]);

    let err = resolve(&schema, &env).unwrap_err();

    assert_eq!(err.invalid().count(), 3);
}

#[test]
fn test_empty_required_string_without_default_rejected() {
    let env = EnvSnapshot::from_pairs([("DB_NAME", "app"), ("DB_USER", "")]);

    let err = resolve(&db_schema(), &env).unwrap_err();

    assert_eq!(err.len(), 1);
    assert!(matches!(
        &err.errors()[0],
        SettingError::InvalidSettingValue { name, raw, .. } if name == "DB_USER" && raw.is_empty()
    ));
}

// =============================================================================
// Parsing Boundaries
// =============================================================================

#[test]
fn test_integer_bounds_are_inclusive() {
    let schema = Schema::new(vec![SettingSpec::integer("N").min(1).max(10).required()]).unwrap();

    for (raw, ok) in [("1", true), ("10", true), ("0", false), ("11", false), (" 5 ", true)] {
        let env = EnvSnapshot::from_pairs([("N", raw)]);
        assert_eq!(resolve(&schema, &env).is_ok(), ok, "N={raw:?}");
    }
}

#[test]
fn test_integer_overflow_is_invalid() {
    let schema = Schema::new(vec![SettingSpec::integer("BIG").required()]).unwrap();
    let env = EnvSnapshot::from_pairs([("BIG", "9223372036854775808")]);

    assert!(resolve(&schema, &env).is_err());
}

#[test]
fn test_string_values_keep_whitespace() {
    let schema = Schema::new(vec![SettingSpec::string("GREETING").required()]).unwrap();
    let env = EnvSnapshot::from_pairs([("GREETING", "  hello  ")]);

    let config = resolve(&schema, &env).unwrap();

    assert_eq!(config.get_str("GREETING").unwrap(), "  hello  ");
}

#[test]
fn test_url_scheme_check_is_case_insensitive() {
    let schema = Schema::new(vec![
        SettingSpec::url("HOME").required().schemes(&["HTTPS"]),
    ])
    .unwrap();
    let env = EnvSnapshot::from_pairs([("HOME", "HTTPS://Example.COM")]);

    let config = resolve(&schema, &env).unwrap();

    assert_eq!(config.get_url("HOME").unwrap().as_str(), "https://example.com/");
}

// =============================================================================
// Shared Variables
// =============================================================================

#[test]
fn test_shared_variable_missing_reported_per_setting() {
    let schema = Schema::new(vec![
        SettingSpec::url("WP_HOME").from_env("WP_FULL_URL").required(),
        SettingSpec::url("WP_SITEURL").from_env("WP_FULL_URL").required(),
    ])
    .unwrap();

    let err = resolve(&schema, &EnvSnapshot::new()).unwrap_err();

    assert_eq!(err.missing().collect::<Vec<_>>(), ["WP_HOME", "WP_SITEURL"]);
    assert!(err.errors().iter().all(|e| matches!(
        e,
        SettingError::MissingRequiredSetting { env_var, .. } if env_var == "WP_FULL_URL"
    )));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_resolution() {
    let schema = Arc::new(service_schema());
    let env = Arc::new(service_env());
    let expected = resolve(&schema, &*env).unwrap();
    let barrier = Arc::new(Barrier::new(8));
    let mut handles = vec![];

    for _ in 0..8 {
        let s = Arc::clone(&schema);
        let e = Arc::clone(&env);
        let b = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            b.wait();
            resolve(&s, &*e).unwrap()
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_resolved_config_shared_read_only() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResolvedConfig>();
    assert_send_sync::<Schema>();

    let config = Arc::new(resolve(&service_schema(), &service_env()).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = Arc::clone(&config);
            thread::spawn(move || c.get_i64("PORT").unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 9090);
    }
}
