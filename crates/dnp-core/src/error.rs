// ── Core error types ──
//
// User-facing errors from dnp-core. Consumers never see raw HTTP
// transport failures or JSON parse errors directly: the
// `From<dnp_api::Error>` impl translates them into domain variants.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not connected to the backend")]
    ControllerDisconnected,

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Rejected by backend: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration / storage errors ───────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Cannot persist {}: {message}", path.display())]
    Storage { path: PathBuf, message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<dnp_api::Error> for CoreError {
    fn from(err: dnp_api::Error) -> Self {
        match err {
            dnp_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            dnp_api::Error::NotAuthenticated => CoreError::AuthenticationFailed {
                message: "not logged in".into(),
            },
            dnp_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            dnp_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            dnp_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            dnp_api::Error::Api {
                status: Some(404),
                message,
            } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: message,
            },
            // `success: false` inside a 200 envelope: the backend refused.
            dnp_api::Error::Api {
                status: None,
                message,
            } => CoreError::Rejected { message },
            dnp_api::Error::Api { status, message } => CoreError::Api { message, status },
            dnp_api::Error::EmptyResponse { endpoint } => {
                CoreError::Internal(format!("backend returned no data for {endpoint}"))
            }
            dnp_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
