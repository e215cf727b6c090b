//! Configuration for the sgtpolicy CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `sgtpolicy_api::ClientConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sgtpolicy_api::{AuthScheme, ClientConfig, Credentials, TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    60
}

/// A named DNA Center profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://dnac.example.com").
    pub controller: String,

    /// Auth scheme: "ticket" or "jwt".
    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,

    /// Username.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override request timeout in seconds.
    pub timeout: Option<u64>,
}

fn default_auth_scheme() -> String {
    "jwt".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netauto", "sgtpolicy").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sgtpolicy");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit path (tests and `--config` overrides).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DNAC_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML at an explicit path.
pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the password for a profile: named env var, then keyring,
/// then plaintext in the config file.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var("DNAC_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new("sgtpolicy", &format!("{profile_name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the full credential pair for a profile.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("DNAC_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name)?;
    Ok(Credentials { username, password })
}

/// Parse a profile's `auth_scheme` field.
pub fn resolve_scheme(profile: &Profile) -> Result<AuthScheme, ConfigError> {
    match profile.auth_scheme.as_str() {
        "ticket" => Ok(AuthScheme::Ticket),
        "jwt" => Ok(AuthScheme::JwtCookie),
        other => Err(ConfigError::Validation {
            field: "auth_scheme".into(),
            reason: format!("expected 'ticket' or 'jwt', got '{other}'"),
        }),
    }
}

/// Build a `ClientConfig` from a profile.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    let base_url: url::Url = profile
        .controller
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "controller".into(),
            reason: format!("invalid URL: {}", profile.controller),
        })?;

    let credentials = resolve_credentials(profile, profile_name)?;
    let scheme = resolve_scheme(profile)?;

    let tls = if profile.insecure.unwrap_or(true) {
        // DNA Center appliances almost always run self-signed certs.
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let transport = TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(60)),
        ..TransportConfig::default()
    };

    Ok(ClientConfig {
        base_url,
        credentials,
        scheme,
        transport,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(auth_scheme: &str) -> Profile {
        Profile {
            controller: "https://dnac.example.com".into(),
            auth_scheme: auth_scheme.into(),
            username: Some("admin".into()),
            password: Some("secret".into()),
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.profiles.insert("lab".into(), profile("ticket"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
        let lab = &loaded.profiles["lab"];
        assert_eq!(lab.controller, "https://dnac.example.com");
        assert_eq!(lab.auth_scheme, "ticket");
    }

    #[test]
    fn unknown_auth_scheme_is_rejected() {
        let err = resolve_scheme(&profile("kerberos")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn plaintext_password_is_the_last_resort() {
        let p = profile("jwt");
        let creds = resolve_credentials(&p, "lab").unwrap();
        assert_eq!(creds.username, "admin");
    }

    #[test]
    fn bad_controller_url_fails_validation() {
        let mut p = profile("jwt");
        p.controller = "not a url".into();
        let err = profile_to_client_config(&p, "lab").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
