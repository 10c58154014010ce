//! Configuration for Hive tools.
//!
//! A TOML file plus `HIVE_*` environment overrides, token resolution
//! (env + keyring + plaintext), and translation to
//! `hive_api::ClientConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hive_api::endpoints::{DEFAULT_BASE_URL, DEFAULT_CAMERA_BASE_URL};
use hive_api::transport::DEFAULT_TIMEOUT_SECS;
use hive_api::{ClientConfig, Credentials, Platform, TlsMode, TransportConfig, UrlTemplates};

/// Environment variable holding a raw token.
pub const TOKEN_ENV: &str = "HIVE_TOKEN";

const KEYRING_SERVICE: &str = "hivectl";
const KEYRING_USER: &str = "token";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Home to scope queries to.
    pub home_id: Option<String>,

    /// Plaintext token; keyring or env var take precedence.
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Accept any TLS certificate.
    #[serde(default)]
    pub insecure: bool,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Beekeeper platform root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Camera platform host suffix.
    #[serde(default = "default_camera_base_url")]
    pub camera_base_url: String,

    /// Endpoint template overrides.
    #[serde(default)]
    pub urls: UrlTemplates,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            home_id: None,
            token: None,
            token_env: None,
            insecure: false,
            ca_cert: None,
            base_url: default_base_url(),
            camera_base_url: default_camera_base_url(),
            urls: UrlTemplates::default(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_camera_base_url() -> String {
    DEFAULT_CAMERA_BASE_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hivectl", "hivectl").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("hivectl");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` + environment. A missing file is not an
/// error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HIVE_").ignore(&["token"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a token from the credential chain.
///
/// 1. the variable named by `token_env`
/// 2. `HIVE_TOKEN`
/// 3. the system keyring
/// 4. plaintext `token` in the config
pub fn resolve_token(cfg: &Config) -> Option<SecretString> {
    resolve_token_with(cfg, keyring_token)
}

fn keyring_token() -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .and_then(|entry| entry.get_password())
        .ok()
}

fn resolve_token_with(
    cfg: &Config,
    keyring: impl FnOnce() -> Option<String>,
) -> Option<SecretString> {
    if let Some(ref env_name) = cfg.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(TOKEN_ENV) {
        return Some(SecretString::from(val));
    }

    keyring()
        .or_else(|| cfg.token.clone())
        .map(SecretString::from)
}

/// Build a `ClientConfig` from the config and an already-resolved token.
///
/// No token means anonymous credentials.
pub fn to_client_config(
    cfg: &Config,
    token: Option<SecretString>,
) -> Result<ClientConfig, ConfigError> {
    url::Url::parse(&cfg.base_url).map_err(|e| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL {}: {e}", cfg.base_url),
    })?;

    if cfg.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let tls = if cfg.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let credentials = token.map_or(Credentials::Anonymous, Credentials::Token);

    Ok(ClientConfig {
        credentials,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(cfg.timeout),
        },
        urls: cfg.urls.clone(),
        platform: Platform {
            base_url: cfg.base_url.clone(),
            camera_base_url: cfg.camera_base_url.clone(),
        },
        home_id: cfg.home_id.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    fn plaintext_config() -> Config {
        Config {
            token: Some("plaintext".into()),
            ..Config::default()
        }
    }

    #[test]
    fn plaintext_token_is_last_resort() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let token = resolve_token_with(&plaintext_config(), || None).unwrap();
            assert_eq!(token.expose_secret(), "plaintext");
            Ok(())
        });
    }

    #[test]
    fn keyring_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let token =
                resolve_token_with(&plaintext_config(), || Some("stored".into())).unwrap();
            assert_eq!(token.expose_secret(), "stored");
            Ok(())
        });
    }

    #[test]
    fn no_source_means_no_token() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            assert!(resolve_token_with(&Config::default(), || None).is_none());
            Ok(())
        });
    }
}
