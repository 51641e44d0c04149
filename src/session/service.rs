//! Authentication service boundary.
//!
//! The session core never verifies credentials itself — it hands the
//! user's email/password to the remote service and receives back a signed
//! bearer credential plus an account profile. [`AuthService`] is the seam
//! the session manager is generic over; [`HttpAuthService`] is the
//! production implementation against the complaint service's REST API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request timeout for auth calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fallback shown when the server gives us nothing usable.
const GENERIC_LOGIN_FAILURE: &str = "Login failed. Please check your credentials.";

// ── Wire types ───────────────────────────────────────────────────

/// Credentials the user types in.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account profile as returned by the service alongside a fresh credential.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountProfile {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Successful login: a fresh credential plus the account it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginSuccess {
    #[serde(rename = "token")]
    pub credential: String,
    pub user: AccountProfile,
}

/// New-account registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Error body the service emits on every failure path.
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl ApiError {
    /// The service puts the human-readable explanation in `details` and a
    /// short category in `error`; prefer the former.
    fn message(self) -> String {
        self.details
            .or(self.error)
            .unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string())
    }
}

// ── Errors ───────────────────────────────────────────────────────

/// A failed login or registration, carrying one human-readable message
/// suitable for direct display.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct LoginError {
    pub message: String,
}

impl LoginError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for LoginError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("Could not reach the complaint service: {err}"))
    }
}

// ── Service trait ────────────────────────────────────────────────

/// External authentication boundary. Asynchronous; may fail with a
/// [`LoginError`] when the service rejects the credentials or is
/// unreachable. Implementations must not retry on the caller's behalf.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginSuccess, LoginError>;
}

// ── HTTP implementation ──────────────────────────────────────────

/// REST client for the complaint service's auth endpoints.
pub struct HttpAuthService {
    base_url: String,
    http: reqwest::Client,
}

impl HttpAuthService {
    /// Create a client against the given API base URL.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/auth/{}", self.base_url, path)
    }

    /// Extract the failure message from a non-success response.
    async fn failure_message(resp: reqwest::Response) -> String {
        match resp.json::<ApiError>().await {
            Ok(body) => body.message(),
            Err(_) => GENERIC_LOGIN_FAILURE.to_string(),
        }
    }

    /// Register a new account. Returns the service's confirmation message.
    ///
    /// Not part of [`AuthService`]: registration never touches the session
    /// state machine, so only the CLI calls it.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, LoginError> {
        let resp = self
            .http
            .post(self.endpoint("register"))
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LoginError::new(Self::failure_message(resp).await));
        }

        #[derive(Deserialize)]
        struct RegisterResponse {
            #[serde(default)]
            message: Option<String>,
        }

        let body: RegisterResponse = resp.json().await?;
        Ok(body
            .message
            .unwrap_or_else(|| "Registration successful.".to_string()))
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, request: &LoginRequest) -> Result<LoginSuccess, LoginError> {
        let resp = self
            .http
            .post(self.endpoint("login"))
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LoginError::new(Self::failure_message(resp).await));
        }

        Ok(resp.json::<LoginSuccess>().await?)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
