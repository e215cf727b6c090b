use thiserror::Error;

/// Top-level error type for the `sgtpolicy-api` crate.
///
/// Covers every failure mode across the SDK: authentication, transport,
/// controller API errors, task polling, and name resolution.
/// `sgtpolicy-cli` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session has expired (ticket revoked or JWT cookie timed out).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller API ──────────────────────────────────────────────
    /// Non-2xx response from the controller, with body for debugging.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Tasks ───────────────────────────────────────────────────────
    /// An asynchronous task completed with `isError: true`.
    #[error("Task {task_id} failed: {reason}")]
    TaskFailed { task_id: String, reason: String },

    /// A task did not reach a terminal state within the wait window.
    #[error("Task {task_id} didn't complete within {timeout_secs}s")]
    TaskTimeout { task_id: String, timeout_secs: u64 },

    /// Deploy finished but reported an unexpected status string.
    #[error("Deploy status mismatch: {status}")]
    Deploy { status: String },

    // ── Resolution / verification ───────────────────────────────────
    /// A named resource could not be resolved on the controller.
    #[error("No {resource} named '{name}' found on the controller")]
    NotFound { resource: &'static str, name: String },

    /// A presence check found missing or unexpected resources.
    #[error("Verification failed: {message}")]
    Verification { message: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::TaskTimeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            Self::NotFound { .. } => true,
            _ => false,
        }
    }
}
