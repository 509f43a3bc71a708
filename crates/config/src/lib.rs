use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "daawa.toml",
    "config/daawa.toml",
    "crates/config/daawa.toml",
    "../daawa.toml",
    "../config/daawa.toml",
];

/// Hard bounds for generated invitation tokens.
pub const MIN_TOKEN_LENGTH: usize = 16;
pub const MAX_TOKEN_LENGTH: usize = 128;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub contacts: ContactsConfig,
    #[serde(default)]
    pub co_hosts: CoHostsConfig,
    #[serde(default)]
    pub invitations: InvitationsConfig,
}

/// Phone normalization settings applied to every contact and manual entry.
///
/// ```
/// use daawa_config::ContactsConfig;
///
/// let contacts = ContactsConfig::default();
/// assert_eq!(contacts.default_country_code, "974");
/// assert_eq!(contacts.min_digits, 7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsConfig {
    /// Calling code prefixed to numbers entered without one. Empty disables.
    #[serde(default = "ContactsConfig::default_country_code")]
    pub default_country_code: String,
    #[serde(default = "ContactsConfig::default_min_digits")]
    pub min_digits: usize,
}

impl ContactsConfig {
    fn default_country_code() -> String {
        "974".to_string()
    }

    const fn default_min_digits() -> usize {
        7
    }
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            default_country_code: Self::default_country_code(),
            min_digits: Self::default_min_digits(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoHostsConfig {
    #[serde(default = "CoHostsConfig::default_max_co_hosts")]
    pub max_co_hosts: usize,
}

impl CoHostsConfig {
    const fn default_max_co_hosts() -> usize {
        5
    }
}

impl Default for CoHostsConfig {
    fn default() -> Self {
        Self {
            max_co_hosts: Self::default_max_co_hosts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationsConfig {
    /// One of `sms`, `whatsapp` or `in_app`.
    #[serde(default = "InvitationsConfig::default_channel")]
    pub default_channel: String,
    #[serde(default = "InvitationsConfig::default_max_plus_ones")]
    pub max_plus_ones: u32,
    #[serde(default = "InvitationsConfig::default_token_length")]
    pub token_length: usize,
}

impl InvitationsConfig {
    fn default_channel() -> String {
        "whatsapp".to_string()
    }

    const fn default_max_plus_ones() -> u32 {
        10
    }

    const fn default_token_length() -> usize {
        32
    }
}

impl Default for InvitationsConfig {
    fn default() -> Self {
        Self {
            default_channel: Self::default_channel(),
            max_plus_ones: Self::default_max_plus_ones(),
            token_length: Self::default_token_length(),
        }
    }
}

/// Load the engine configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use daawa_config::load;
///
/// std::env::remove_var("DAAWA_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(config.co_hosts.max_co_hosts > 0);
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let builder = config::Config::builder()
        .set_default(
            "contacts.default_country_code",
            defaults.contacts.default_country_code.clone(),
        )?
        .set_default(
            "contacts.min_digits",
            i64::try_from(defaults.contacts.min_digits).unwrap_or(i64::MAX),
        )?
        .set_default(
            "co_hosts.max_co_hosts",
            i64::try_from(defaults.co_hosts.max_co_hosts).unwrap_or(i64::MAX),
        )?
        .set_default(
            "invitations.default_channel",
            defaults.invitations.default_channel.clone(),
        )?
        .set_default(
            "invitations.max_plus_ones",
            i64::from(defaults.invitations.max_plus_ones),
        )?
        .set_default(
            "invitations.token_length",
            i64::try_from(defaults.invitations.token_length).unwrap_or(i64::MAX),
        )?;

    let environment_overrides = config::Environment::with_prefix("DAAWA").separator("__");

    let mut builder = builder;
    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("DAAWA_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via DAAWA_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    config.invitations.token_length = config
        .invitations
        .token_length
        .clamp(MIN_TOKEN_LENGTH, MAX_TOKEN_LENGTH);

    debug!(?config, "loaded engine configuration");
    Ok(config)
}
