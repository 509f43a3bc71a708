//! Test plan for the `daawa-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and clamping behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use daawa_config::{
    load, AppConfig, CoHostsConfig, ContactsConfig, InvitationsConfig, MAX_TOKEN_LENGTH,
    MIN_TOKEN_LENGTH,
};

const ENV_VARS_TO_RESET: &[&str] = &[
    "DAAWA_CONFIG",
    "DAAWA__CONTACTS__DEFAULT_COUNTRY_CODE",
    "DAAWA__CONTACTS__MIN_DIGITS",
    "DAAWA__CO_HOSTS__MAX_CO_HOSTS",
    "DAAWA__INVITATIONS__DEFAULT_CHANNEL",
    "DAAWA__INVITATIONS__MAX_PLUS_ONES",
    "DAAWA__INVITATIONS__TOKEN_LENGTH",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

fn isolated() -> (TempDir, TestContext) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let (_temp_dir, _ctx) = isolated();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(
        config.contacts.default_country_code,
        defaults.contacts.default_country_code
    );
    assert_eq!(config.contacts.min_digits, defaults.contacts.min_digits);
    assert_eq!(config.co_hosts.max_co_hosts, defaults.co_hosts.max_co_hosts);
    assert_eq!(
        config.invitations.default_channel,
        defaults.invitations.default_channel
    );
    assert_eq!(
        config.invitations.max_plus_ones,
        defaults.invitations.max_plus_ones
    );
    assert_eq!(
        config.invitations.token_length,
        defaults.invitations.token_length
    );
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "daawa.toml",
        r#"
        [co_hosts]
        max_co_hosts = 3
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/daawa.toml",
        r#"
        [co_hosts]
        max_co_hosts = 9
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.co_hosts.max_co_hosts, 3);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "config/daawa.toml",
        r#"
        [contacts]
        default_country_code = "966"

        [invitations]
        default_channel = "sms"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.contacts.default_country_code, "966");
    assert_eq!(config.contacts.min_digits, defaults.contacts.min_digits);
    assert_eq!(config.invitations.default_channel, "sms");
    assert_eq!(
        config.invitations.max_plus_ones,
        defaults.invitations.max_plus_ones
    );
    assert_eq!(config.co_hosts.max_co_hosts, defaults.co_hosts.max_co_hosts);
}

#[test]
#[serial]
fn load_honours_explicit_config_path() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "elsewhere/engine.toml",
        r#"
        [invitations]
        max_plus_ones = 2
        "#,
    );
    ctx.set_var(
        "DAAWA_CONFIG",
        temp_dir.path().join("elsewhere/engine.toml").display().to_string(),
    );

    let config = load().expect("configuration load should read DAAWA_CONFIG");
    assert_eq!(config.invitations.max_plus_ones, 2);
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let (temp_dir, mut ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "daawa.toml",
        r#"
        [co_hosts]
        max_co_hosts = 2
        "#,
    );

    ctx.set_var("DAAWA__CO_HOSTS__MAX_CO_HOSTS", "8");
    ctx.set_var("DAAWA__CONTACTS__DEFAULT_COUNTRY_CODE", "971");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.co_hosts.max_co_hosts, 8);
    assert_eq!(config.contacts.default_country_code, "971");
}

#[test]
#[serial]
fn load_clamps_token_length_into_supported_range() {
    let (_temp_dir, mut ctx) = isolated();

    ctx.set_var("DAAWA__INVITATIONS__TOKEN_LENGTH", "4");
    let config = load().expect("configuration load should succeed with short token");
    assert_eq!(config.invitations.token_length, MIN_TOKEN_LENGTH);

    ctx.set_var("DAAWA__INVITATIONS__TOKEN_LENGTH", "4096");
    let config = load().expect("configuration load should succeed with long token");
    assert_eq!(config.invitations.token_length, MAX_TOKEN_LENGTH);
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let (temp_dir, _ctx) = isolated();

    write_config_file(
        temp_dir.path(),
        "daawa.toml",
        r#"
        [co_hosts]
        max_co_hosts = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn contacts_config_defaults_target_qatar() {
    let defaults = ContactsConfig::default();
    assert_eq!(defaults.default_country_code, "974");
    assert_eq!(defaults.min_digits, 7);
}

#[test]
fn co_hosts_config_defaults_cap_at_five() {
    assert_eq!(CoHostsConfig::default().max_co_hosts, 5);
}

#[test]
fn invitations_config_defaults_match_expected_values() {
    let defaults = InvitationsConfig::default();
    assert_eq!(defaults.default_channel, "whatsapp");
    assert_eq!(defaults.max_plus_ones, 10);
    assert_eq!(defaults.token_length, 32);
}
