use secrecy::SecretString;

/// Which authentication flow a [`DnacClient`](crate::DnacClient) uses.
///
/// DNA Center exposes two northbound auth mechanisms. Older clusters use a
/// CAS service ticket carried in request headers; maglev-based clusters use
/// an `X-JWT-ACCESS-TOKEN` cookie with an idle timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Service-ticket auth: `POST /api/v1/ticket`, then
    /// `X-Auth-Token` on every request.
    Ticket,
    /// JWT cookie auth (maglev): `GET /api/system/v1/identitymgmt/login`
    /// with HTTP basic auth; the session cookie lives in the jar.
    JwtCookie,
}

impl AuthScheme {
    /// The login endpoint path (absolute against the server root).
    pub fn login_path(&self) -> &'static str {
        match self {
            Self::Ticket => "/api/v1/ticket",
            Self::JwtCookie => "/api/system/v1/identitymgmt/login",
        }
    }
}

/// Username/password credentials for the controller.
///
/// The password is wrapped in [`SecretString`] so it never lands in
/// `Debug` output or log lines.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
