// ── Runtime connection configuration ──
//
// These types describe *how* to talk to the backend and how the client-side
// machinery (refresh, search debounce, enforcement polling) is tuned.
// They never touch disk: the CLI/TUI constructs a `ControllerConfig`
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Search debounce bounds accepted by the controller.
pub const MIN_SEARCH_DEBOUNCE: Duration = Duration::from_millis(150);
pub const MAX_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// How to authenticate with the backend.
///
/// This type carries the actual credential data.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// A bearer token obtained earlier (stored in the keyring or config).
    Token(SecretString),
    /// Email/password login; the token returned by the backend is kept
    /// in memory for the lifetime of the controller.
    Credentials {
        email: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-hosted backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one backend session.
///
/// Built by CLI/TUI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Backend root URL (e.g., `https://dnp.example.com`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How often to perform a full refresh (seconds). 0 = never.
    pub refresh_interval_secs: u64,
    /// Quiet period before a search query is sent. Clamped to 150..=300ms.
    pub search_debounce: Duration,
    /// Maximum number of search results requested.
    pub search_limit: u32,
    /// Interval between enforcement job polls.
    pub enforcement_poll_interval: Duration,
    /// Give up on an enforcement job after this long.
    pub enforcement_timeout: Duration,
    /// How long a finished enforcement operation stays visible.
    pub operation_display_timeout: Duration,
    /// Where category exceptions are persisted. `None` keeps them in memory.
    pub exceptions_path: Option<PathBuf>,
}

impl ControllerConfig {
    /// A config with default tuning for the given backend and credentials.
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            refresh_interval_secs: 300,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            search_limit: 20,
            enforcement_poll_interval: Duration::from_secs(1),
            enforcement_timeout: Duration::from_secs(120),
            operation_display_timeout: Duration::from_secs(5),
            exceptions_path: None,
        }
    }

    /// The debounce actually applied, clamped into the accepted window.
    pub fn effective_search_debounce(&self) -> Duration {
        self.search_debounce
            .clamp(MIN_SEARCH_DEBOUNCE, MAX_SEARCH_DEBOUNCE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> ControllerConfig {
        ControllerConfig::new(
            "https://dnp.example.com".parse().unwrap(),
            AuthCredentials::Token("t".to_string().into()),
        )
    }

    #[test]
    fn debounce_is_clamped() {
        let mut cfg = config();
        assert_eq!(cfg.effective_search_debounce(), DEFAULT_SEARCH_DEBOUNCE);

        cfg.search_debounce = Duration::from_millis(10);
        assert_eq!(cfg.effective_search_debounce(), MIN_SEARCH_DEBOUNCE);

        cfg.search_debounce = Duration::from_secs(2);
        assert_eq!(cfg.effective_search_debounce(), MAX_SEARCH_DEBOUNCE);
    }
}
