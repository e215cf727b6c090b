//! GlobalOpts-aware configuration helpers.
//!
//! Bridges the shared `sgtpolicy-config` crate with CLI flag overrides:
//! flags beat env vars beat profile values.

use sgtpolicy_api::{AuthScheme, ClientConfig, Credentials, TlsMode, TransportConfig};
use sgtpolicy_config as shared;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Fallback request timeout when neither the flag nor the profile sets one.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// The profile name in effect: `--profile`, then the config file's
/// `default_profile`, then "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &shared::Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = shared::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global);
    }

    // No profile on disk -- build entirely from flags / env vars.
    let url_str = global
        .controller
        .as_deref()
        .ok_or_else(|| CliError::NoConfig {
            path: shared::config_path().display().to_string(),
        })?;
    from_flags(url_str, &profile_name, global)
}

/// Merge CLI flag overrides onto a stored profile.
fn resolve_profile(
    profile: &shared::Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let base_url = match global.controller {
        Some(ref url_str) => parse_url(url_str)?,
        None => parse_url(&profile.controller)?,
    };

    let credentials = overridden_credentials(profile, profile_name, global)?;

    let scheme = match global.auth_scheme {
        Some(ref s) => parse_scheme(s)?,
        None => shared::resolve_scheme(profile)?,
    };

    let tls = if global.insecure || profile.insecure.unwrap_or(true) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout_secs = global.timeout.or(profile.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS);
    let timeout = std::time::Duration::from_secs(timeout_secs);

    Ok(ClientConfig {
        base_url,
        credentials,
        scheme,
        transport: TransportConfig {
            tls,
            timeout,
            ..TransportConfig::default()
        },
    })
}

/// Credential chain with CLI flags at the front.
fn overridden_credentials(
    profile: &shared::Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<Credentials, shared::ConfigError> {
    match (&global.username, &global.password) {
        (Some(user), Some(pass)) => Ok(Credentials::new(user.clone(), pass.clone())),
        (Some(user), None) => {
            let password = shared::resolve_password(profile, profile_name)?;
            Ok(Credentials {
                username: user.clone(),
                password,
            })
        }
        (None, Some(pass)) => {
            let mut creds = shared::resolve_credentials(profile, profile_name)?;
            creds.password = secrecy::SecretString::from(pass.clone());
            Ok(creds)
        }
        (None, None) => shared::resolve_credentials(profile, profile_name),
    }
}

/// Build a config purely from flags when no profile exists.
fn from_flags(
    url_str: &str,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let base_url = parse_url(url_str)?;

    let username = global
        .username
        .clone()
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.to_owned(),
        })?;
    let password = global
        .password
        .clone()
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.to_owned(),
        })?;

    let scheme = match global.auth_scheme.as_deref() {
        Some(s) => parse_scheme(s)?,
        None => AuthScheme::JwtCookie,
    };

    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    Ok(ClientConfig {
        base_url,
        credentials: Credentials::new(username, password),
        scheme,
        transport: TransportConfig {
            tls,
            timeout: std::time::Duration::from_secs(
                global.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            ..TransportConfig::default()
        },
    })
}

fn parse_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}

fn parse_scheme(scheme: &str) -> Result<AuthScheme, CliError> {
    match scheme {
        "ticket" => Ok(AuthScheme::Ticket),
        "jwt" => Ok(AuthScheme::JwtCookie),
        other => Err(CliError::Validation {
            field: "auth-scheme".into(),
            reason: format!("expected 'ticket' or 'jwt', got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;
    use crate::cli::{ColorMode, OutputFormat};

    fn bare_global() -> GlobalOpts {
        GlobalOpts {
            profile: None,
            controller: None,
            username: None,
            password: None,
            auth_scheme: None,
            output: OutputFormat::Table,
            color: ColorMode::Auto,
            verbose: 0,
            quiet: false,
            yes: false,
            insecure: false,
            timeout: None,
        }
    }

    fn lab_profile() -> shared::Profile {
        shared::Profile {
            controller: "https://dnac.example.com".into(),
            auth_scheme: "jwt".into(),
            username: Some("admin".into()),
            password: Some("secret".into()),
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: Some(120),
        }
    }

    #[test]
    fn timeout_flag_beats_the_profile_value() {
        let mut global = bare_global();
        global.timeout = Some(10);
        let cfg = resolve_profile(&lab_profile(), "lab", &global).unwrap();
        assert_eq!(cfg.transport.timeout, Duration::from_secs(10));
    }

    #[test]
    fn profile_timeout_applies_when_no_flag_is_given() {
        let cfg = resolve_profile(&lab_profile(), "lab", &bare_global()).unwrap();
        assert_eq!(cfg.transport.timeout, Duration::from_secs(120));
    }

    #[test]
    fn timeout_defaults_when_neither_flag_nor_profile_sets_it() {
        let mut profile = lab_profile();
        profile.timeout = None;
        let cfg = resolve_profile(&profile, "lab", &bare_global()).unwrap();
        assert_eq!(cfg.transport.timeout, Duration::from_secs(60));
    }
}
