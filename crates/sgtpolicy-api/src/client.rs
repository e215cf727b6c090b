// DNA Center HTTP client
//
// Wraps `reqwest::Client` with controller-specific URL construction,
// `{ "response": ... }` envelope unwrapping, and session management for
// both auth schemes. All endpoint modules (security groups, contracts,
// policies, tasks) are implemented as inherent methods via separate files
// to keep this module focused on transport mechanics.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::{AuthScheme, Credentials};
use crate::error::Error;
use crate::models::ResponseEnvelope;
use crate::transport::TransportConfig;

/// Seconds of session age after which the login timestamp is refreshed;
/// the controller rolls the JWT cookie on any request before expiry.
const TOKEN_RENEW_AFTER: Duration = Duration::from_secs(600);
/// Seconds of session age after which the JWT cookie is assumed expired
/// and a full re-authentication is performed.
const TOKEN_MAX_IDLE: Duration = Duration::from_secs(900);

/// Everything needed to construct a [`DnacClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub credentials: Credentials,
    pub scheme: AuthScheme,
    pub transport: TransportConfig,
}

#[derive(Debug, Default)]
struct SessionState {
    /// CAS service ticket (ticket scheme only).
    ticket: Option<String>,
    /// When the current session was established (JWT scheme only).
    authenticated_at: Option<Instant>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketResponse {
    service_ticket: String,
}

/// Raw HTTP client for DNA Center's northbound API.
///
/// Handles the `{ "response": ..., "version": ... }` envelope, the `/api`
/// path prefix for customer-facing-service resources, auth header
/// injection, and JWT idle-timeout renewal. All methods return unwrapped
/// `response` payloads -- the envelope is stripped before the caller
/// sees it.
pub struct DnacClient {
    http: reqwest::Client,
    base_url: Url,
    scheme: AuthScheme,
    credentials: Credentials,
    session: RwLock<SessionState>,
}

impl DnacClient {
    /// Create a new client from a [`ClientConfig`].
    ///
    /// If the transport doesn't already include a cookie jar, one is
    /// created automatically (JWT-cookie auth requires cookies). No
    /// network traffic happens here; the first request triggers login.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let transport = if config.transport.cookie_jar.is_some() {
            config.transport
        } else {
            config.transport.with_cookie_jar()
        };
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: config.base_url,
            scheme: config.scheme,
            credentials: config.credentials,
            session: RwLock::new(SessionState::default()),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when you already have a client with a session cookie in
    /// its jar, or in tests against a mock controller.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        scheme: AuthScheme,
        credentials: Credentials,
    ) -> Self {
        Self {
            http,
            base_url,
            scheme,
            credentials,
            session: RwLock::new(SessionState::default()),
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured auth scheme.
    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a controller resource path.
    ///
    /// Paths already rooted at `/api/` or `/dna/` are absolute against
    /// the server; everything else (the customer-facing-service paths)
    /// is prefixed with `/api`. For example
    /// `/v2/data/customer-facing-service/scalablegroup/access` becomes
    /// `https://host/api/v2/data/customer-facing-service/scalablegroup/access`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let root = self.base_url.as_str().trim_end_matches('/');
        let full = if path.starts_with("/api/") || path.starts_with("/dna/") {
            format!("{root}{path}")
        } else {
            format!("{root}/api{path}")
        };
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Session management ───────────────────────────────────────────

    /// Authenticate now instead of lazily on the first request.
    pub async fn connect(&self) -> Result<(), Error> {
        self.ensure_session().await
    }

    /// Drop the current session. The next request re-authenticates.
    pub fn logout(&self) {
        let mut state = self.session.write().expect("session lock poisoned");
        state.ticket = None;
        state.authenticated_at = None;
        debug!("session cleared");
    }

    /// True once a login has succeeded and not been dropped.
    pub fn is_connected(&self) -> bool {
        let state = self.session.read().expect("session lock poisoned");
        match self.scheme {
            AuthScheme::Ticket => state.ticket.is_some(),
            AuthScheme::JwtCookie => state.authenticated_at.is_some(),
        }
    }

    /// Make sure a valid session exists, logging in (or re-logging-in
    /// after JWT idle expiry) when needed.
    async fn ensure_session(&self) -> Result<(), Error> {
        let action = {
            let state = self.session.read().expect("session lock poisoned");
            match self.scheme {
                AuthScheme::Ticket => {
                    if state.ticket.is_some() {
                        SessionAction::None
                    } else {
                        SessionAction::Login
                    }
                }
                AuthScheme::JwtCookie => match state.authenticated_at {
                    None => SessionAction::Login,
                    Some(at) if at.elapsed() >= TOKEN_MAX_IDLE => SessionAction::Login,
                    Some(at) if at.elapsed() >= TOKEN_RENEW_AFTER => SessionAction::Refresh,
                    Some(_) => SessionAction::None,
                },
            }
        };

        match action {
            SessionAction::None => Ok(()),
            SessionAction::Refresh => {
                // The cookie is rolled by the controller on each request;
                // just restart the idle clock.
                debug!("JWT cookie nearing idle timeout, resetting session clock");
                let mut state = self.session.write().expect("session lock poisoned");
                state.authenticated_at = Some(Instant::now());
                Ok(())
            }
            SessionAction::Login => self.login().await,
        }
    }

    /// Perform the scheme-specific login handshake.
    async fn login(&self) -> Result<(), Error> {
        match self.scheme {
            AuthScheme::Ticket => self.login_ticket().await,
            AuthScheme::JwtCookie => self.login_jwt().await,
        }
    }

    /// `POST /api/v1/ticket` -> `{ "response": { "serviceTicket": ... } }`
    async fn login_ticket(&self) -> Result<(), Error> {
        let url = self.api_url(AuthScheme::Ticket.login_path());
        debug!("requesting service ticket at {}", url);

        let body = json!({
            "username": self.credentials.username,
            "password": self.credentials.password.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("ticket request failed (HTTP {status}): {body}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let envelope: ResponseEnvelope<TicketResponse> =
            serde_json::from_str(&body).map_err(|_| Error::Authentication {
                message: format!(
                    "no service ticket issued for user {}",
                    self.credentials.username
                ),
            })?;

        let mut state = self.session.write().expect("session lock poisoned");
        state.ticket = Some(envelope.response.service_ticket);
        state.authenticated_at = Some(Instant::now());
        debug!("service ticket stored");
        Ok(())
    }

    /// `GET /api/system/v1/identitymgmt/login` with HTTP basic auth.
    /// The controller answers with an `X-JWT-ACCESS-TOKEN` cookie that
    /// the jar captures for subsequent requests.
    async fn login_jwt(&self) -> Result<(), Error> {
        let url = self.api_url(AuthScheme::JwtCookie.login_path());
        debug!("logging in at {}", url);

        let resp = self
            .http
            .get(url)
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let mut state = self.session.write().expect("session lock poisoned");
        state.authenticated_at = Some(Instant::now());
        debug!("JWT session established");
        Ok(())
    }

    /// Attach scheme-specific auth headers to a request.
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.scheme {
            AuthScheme::Ticket => {
                let state = self.session.read().expect("session lock poisoned");
                match state.ticket.as_deref() {
                    Some(ticket) => builder
                        .header("X-Auth-Token", ticket)
                        .header("X-CSRF-Token", "soon-enabled"),
                    None => builder,
                }
            }
            // Cookie jar carries the JWT.
            AuthScheme::JwtCookie => builder,
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.ensure_session().await?;
        let url = self.api_url(path);
        debug!("GET {}", url);
        let req = self.apply_auth(self.http.get(url));
        let resp = req.send().await.map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Send a GET request with query parameters and unwrap the envelope.
    pub(crate) async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        self.ensure_session().await?;
        let url = self.api_url(path);
        debug!("GET {} {:?}", url, query);
        let req = self.apply_auth(self.http.get(url).query(query));
        let resp = req.send().await.map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        self.ensure_session().await?;
        let url = self.api_url(path);
        debug!("POST {}", url);
        let req = self.apply_auth(self.http.post(url).json(body));
        let resp = req.send().await.map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        self.ensure_session().await?;
        let url = self.api_url(path);
        debug!("PUT {}", url);
        let req = self.apply_auth(self.http.put(url).json(body));
        let resp = req.send().await.map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Send a bodyless PUT request and unwrap the envelope.
    pub(crate) async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.ensure_session().await?;
        let url = self.api_url(path);
        debug!("PUT {}", url);
        let req = self.apply_auth(self.http.put(url));
        let resp = req.send().await.map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Send a DELETE request and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.ensure_session().await?;
        let url = self.api_url(path);
        debug!("DELETE {}", url);
        let req = self.apply_auth(self.http.delete(url));
        let resp = req.send().await.map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Parse the `{ "response": ... }` envelope, returning the inner
    /// payload on success. 401 maps to an auth error so callers can
    /// distinguish expired sessions from genuine API failures.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: ResponseEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        Ok(envelope.response)
    }
}

#[derive(Debug, Clone, Copy)]
enum SessionAction {
    None,
    Refresh,
    Login,
}
