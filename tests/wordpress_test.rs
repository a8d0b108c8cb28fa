//! WordPress Preset Integration Tests
//!
//! Tests for the WordPress container configuration:
//! - Mapping of environment variables to typed fields
//! - Fixed literals that ignore the environment
//! - Startup failure listing every missing variable

mod common;

use common::init_logging;
use envcfg::wordpress::{self, WordPressConfig, keys};
use envcfg::{EnvSnapshot, SettingError, ValueOrigin, generate_env_template, resolve};

fn container_env() -> EnvSnapshot {
    EnvSnapshot::from_pairs([
        ("DB_NAME", "thedatabase"),
        ("DB_USER", "theuser"),
        ("DB_PASSWORD", "abc"),
        ("DB_HOST", "mariadb"),
        ("WP_FULL_URL", "https://login.42.fr"),
    ])
}

#[test]
fn test_full_url_feeds_home_and_siteurl() {
    let config = resolve(&wordpress::schema().unwrap(), &container_env()).unwrap();

    assert_eq!(config.get_url(keys::WP_HOME).unwrap().as_str(), "https://login.42.fr/");
    assert_eq!(config.get(keys::WP_HOME), config.get(keys::WP_SITEURL));
    assert_eq!(config.origin(keys::DB_HOST), Some(ValueOrigin::Environment));
}

#[test]
fn test_fixed_literals_ignore_environment() {
    let env = container_env()
        .with("DB_CHARSET", "latin1")
        .with("WP_DEBUG", "true")
        .with("table_prefix", "evil;");

    let site = WordPressConfig::from_env(&env).unwrap();

    assert_eq!(site.db_charset, "utf8");
    assert_eq!(site.db_collate, "");
    assert_eq!(site.table_prefix, "wp_");
    assert!(!site.debug);
}

#[test]
fn test_empty_environment_lists_every_missing_variable() {
    init_logging();

    let err = WordPressConfig::from_env(&EnvSnapshot::new()).unwrap_err();
    let missing: Vec<_> = err
        .setting_errors()
        .iter()
        .filter(|e| e.is_missing())
        .map(SettingError::name)
        .collect();

    // DB_HOST falls back to localhost
    assert_eq!(
        missing,
        ["DB_NAME", "DB_USER", "DB_PASSWORD", "WP_HOME", "WP_SITEURL"]
    );
}

#[test]
fn test_non_http_site_url_rejected() {
    let env = container_env().with("WP_FULL_URL", "file:///var/www/html");

    let err = WordPressConfig::from_env(&env).unwrap_err();

    assert_eq!(err.setting_errors().len(), 2);
    assert!(err.to_string().contains("scheme 'file'"));
}

#[test]
fn test_password_never_printed() {
    let env = container_env().with("DB_PASSWORD", "correct-horse");

    let config = resolve(&wordpress::schema().unwrap(), &env).unwrap();
    let site = WordPressConfig::from_resolved(&config).unwrap();

    assert_eq!(site.db_password(), "correct-horse");
    assert!(!format!("{config:?}").contains("correct-horse"));
    assert!(!format!("{site:?}").contains("correct-horse"));
    assert!(!config.redacted_json().to_string().contains("correct-horse"));
}

#[test]
fn test_env_template_for_container() {
    let template = generate_env_template(&wordpress::schema().unwrap());

    for var in ["DB_NAME=", "DB_USER=", "DB_PASSWORD=", "DB_HOST=localhost", "WP_FULL_URL="] {
        assert!(template.contains(var), "missing {var}");
    }
    assert!(!template.contains("DB_CHARSET"));
    assert!(!template.contains("WP_SITEURL"));
}
