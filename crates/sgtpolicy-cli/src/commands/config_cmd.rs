//! Config subcommand handlers.
//!
//! These run without a controller connection: they only read and write
//! the local TOML config and the system keyring.

use std::io::{BufRead, IsTerminal};

use sgtpolicy_config::{self as shared, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &shared::Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "controller = \"{}\"", p.controller);
        let _ = writeln!(out, "auth_scheme = \"{}\"", p.auth_scheme);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Read a password from `--password`, or from stdin when piped.
fn read_password(flag: Option<String>) -> Result<String, CliError> {
    if let Some(password) = flag {
        return Ok(password);
    }
    if std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "pass --password or pipe the password via stdin".into(),
        });
    }
    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']).to_owned();
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(password)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&shared::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = shared::load_config_or_default();
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            controller,
            profile,
            username,
            auth_scheme,
            insecure,
        } => {
            let path = shared::config_path();
            if path.exists() {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!(
                        "config already exists at {}; use 'config set' to change it",
                        path.display()
                    ),
                });
            }

            controller.parse::<url::Url>().map_err(|_| CliError::Validation {
                field: "controller".into(),
                reason: format!("invalid URL: {controller}"),
            })?;
            if auth_scheme != "ticket" && auth_scheme != "jwt" {
                return Err(CliError::Validation {
                    field: "auth-scheme".into(),
                    reason: format!("expected 'ticket' or 'jwt', got '{auth_scheme}'"),
                });
            }

            let mut profiles = std::collections::HashMap::new();
            profiles.insert(
                profile.clone(),
                Profile {
                    controller,
                    auth_scheme,
                    username,
                    password: None,
                    password_env: None,
                    ca_cert: None,
                    insecure,
                    timeout: None,
                },
            );
            let cfg = shared::Config {
                default_profile: Some(profile.clone()),
                profiles,
                ..shared::Config::default()
            };
            shared::save_config(&cfg)?;

            output::print_status(
                &format!("Config created at {} with profile '{profile}'", path.display()),
                global,
            );
            Ok(())
        }

        ConfigCommand::Set {
            profile,
            controller,
            username,
            auth_scheme,
            insecure,
            timeout,
        } => {
            let mut cfg = shared::load_config_or_default();

            let entry = cfg.profiles.entry(profile.clone()).or_insert_with(|| Profile {
                controller: String::new(),
                auth_scheme: "jwt".into(),
                username: None,
                password: None,
                password_env: None,
                ca_cert: None,
                insecure: None,
                timeout: None,
            });

            if let Some(url_str) = controller {
                url_str.parse::<url::Url>().map_err(|_| CliError::Validation {
                    field: "controller".into(),
                    reason: format!("invalid URL: {url_str}"),
                })?;
                entry.controller = url_str;
            }
            if let Some(username) = username {
                entry.username = Some(username);
            }
            if let Some(scheme) = auth_scheme {
                if scheme != "ticket" && scheme != "jwt" {
                    return Err(CliError::Validation {
                        field: "auth-scheme".into(),
                        reason: format!("expected 'ticket' or 'jwt', got '{scheme}'"),
                    });
                }
                entry.auth_scheme = scheme;
            }
            if insecure.is_some() {
                entry.insecure = insecure;
            }
            if timeout.is_some() {
                entry.timeout = timeout;
            }

            if entry.controller.is_empty() {
                return Err(CliError::Validation {
                    field: "controller".into(),
                    reason: "new profiles need --controller".into(),
                });
            }

            shared::save_config(&cfg)?;
            output::print_status(&format!("Profile '{profile}' saved"), global);
            Ok(())
        }

        ConfigCommand::SetPassword { profile, password } => {
            let cfg = shared::load_config_or_default();
            if !cfg.profiles.contains_key(&profile) {
                return Err(CliError::ProfileNotFound { name: profile });
            }

            let password = read_password(password)?;
            let entry = keyring::Entry::new("sgtpolicy", &format!("{profile}/password"))
                .map_err(|e| CliError::Validation {
                    field: "keyring".into(),
                    reason: format!("failed to access keyring: {e}"),
                })?;
            entry.set_password(&password).map_err(|e| CliError::Validation {
                field: "keyring".into(),
                reason: format!("failed to store password in keyring: {e}"),
            })?;

            output::print_status(
                &format!("Password for profile '{profile}' stored in system keyring"),
                global,
            );
            Ok(())
        }

        ConfigCommand::Use { profile } => {
            let mut cfg = shared::load_config_or_default();
            if !cfg.profiles.contains_key(&profile) {
                return Err(CliError::ProfileNotFound { name: profile });
            }
            cfg.default_profile = Some(profile.clone());
            shared::save_config(&cfg)?;
            output::print_status(&format!("Default profile set to '{profile}'"), global);
            Ok(())
        }
    }
}
