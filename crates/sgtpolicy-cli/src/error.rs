//! CLI error types with miette diagnostics.
//!
//! Maps `sgtpolicy_api::Error` and `ConfigError` variants into
//! user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sgtpolicy_api::Error as ApiError;
use sgtpolicy_config::ConfigError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const VERIFICATION: i32 = 5;
    pub const TASK_FAILED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the controller")]
    #[diagnostic(
        code(sgtpolicy::connection_failed),
        help(
            "Check that DNA Center is running and accessible.\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS error: {reason}")]
    #[diagnostic(
        code(sgtpolicy::tls_error),
        help("Use --insecure (-k) to accept a self-signed certificate, or configure ca_cert in your profile.")
    )]
    Tls { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(sgtpolicy::auth_failed),
        help(
            "Verify your username and password.\n\
             Run: sgtpolicy config set-password <profile>"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(sgtpolicy::no_credentials),
        help(
            "Configure credentials with: sgtpolicy config set <profile> --username <user>\n\
             Or set the DNAC_USERNAME and DNAC_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sgtpolicy::not_found),
        help("Run: sgtpolicy {list_command} to see what exists on the controller")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Tasks / deploy ───────────────────────────────────────────────

    #[error("Task {task_id} failed: {reason}")]
    #[diagnostic(code(sgtpolicy::task_failed))]
    TaskFailed { task_id: String, reason: String },

    #[error("Task {task_id} did not complete within {timeout_secs}s")]
    #[diagnostic(
        code(sgtpolicy::task_timeout),
        help("The controller may still be processing. Check the task status before retrying.")
    )]
    TaskTimeout { task_id: String, timeout_secs: u64 },

    #[error("Deploy finished with unexpected status: {status}")]
    #[diagnostic(code(sgtpolicy::deploy_status))]
    DeployStatus { status: String },

    #[error("Verification failed: {message}")]
    #[diagnostic(code(sgtpolicy::verification))]
    Verification { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(sgtpolicy::api_error))]
    Api { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sgtpolicy::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sgtpolicy::profile_not_found),
        help("Create one with: sgtpolicy config set {name} --controller <url> --username <user>")
    )]
    ProfileNotFound { name: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(sgtpolicy::no_config),
        help(
            "Create one with: sgtpolicy config set default --controller <url>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sgtpolicy::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(sgtpolicy::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(sgtpolicy::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Verification { .. } => exit_code::VERIFICATION,
            Self::TaskFailed { .. } | Self::DeployStatus { .. } => exit_code::TASK_FAILED,
            Self::TaskTimeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication { message } => Self::AuthFailed { message },
            ApiError::SessionExpired => Self::AuthFailed {
                message: "session expired".into(),
            },

            ApiError::Transport(e) => Self::ConnectionFailed { source: e.into() },
            ApiError::Tls(reason) => Self::Tls { reason },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            ApiError::Api { status, message } => Self::Api { status, message },
            ApiError::Deserialization { message, .. } => Self::Api {
                status: 0,
                message: format!("unexpected response shape: {message}"),
            },

            ApiError::TaskFailed { task_id, reason } => Self::TaskFailed { task_id, reason },
            ApiError::TaskTimeout {
                task_id,
                timeout_secs,
            } => Self::TaskTimeout {
                task_id,
                timeout_secs,
            },
            ApiError::Deploy { status } => Self::DeployStatus { status },

            ApiError::NotFound { resource, name } => Self::NotFound {
                list_command: match resource {
                    "contract" => "contract list".into(),
                    "policy" => "policy list".into(),
                    _ => "sgt list".into(),
                },
                resource_type: resource.into(),
                identifier: name,
            },
            ApiError::Verification { message } => Self::Verification { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Serialization(e) => Self::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}
