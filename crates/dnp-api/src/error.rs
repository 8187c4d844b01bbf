use thiserror::Error;

/// Top-level error type for the `dnp-api` crate.
///
/// Covers every failure mode of the backend client: authentication,
/// transport, envelope rejections and payload decoding.
/// `dnp-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed, or the bearer token was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An authenticated endpoint was called before logging in.
    #[error("Not authenticated -- log in or configure an API token")]
    NotAuthenticated,

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

    // ── Backend ─────────────────────────────────────────────────────
    /// The backend answered `success: false`, or a non-2xx status.
    ///
    /// `status` is `None` when the rejection came inside an HTTP 200 envelope.
    #[error("{}", display_api(*status, message))]
    Api { status: Option<u16>, message: String },

    /// The envelope reported success but carried no `data` for an
    /// endpoint that must return a payload.
    #[error("Empty response from {endpoint}")]
    EmptyResponse { endpoint: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

fn display_api(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("API error (HTTP {code}): {message}"),
        None => format!("API error: {message}"),
    }
}

impl Error {
    /// Returns `true` if this error indicates the token has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::NotAuthenticated)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api {
                status: Some(code), ..
            } => *code >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api {
                status: Some(404), ..
            } => true,
            _ => false,
        }
    }

    /// The backend-provided message, if this error carries one.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Authentication { message } => Some(message),
            _ => None,
        }
    }
}
