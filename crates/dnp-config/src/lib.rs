//! Shared configuration for the dnp CLI and TUI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! the on-device exception store location, and translation to
//! `dnp_core::ControllerConfig`. Both binaries depend on this crate; the
//! CLI adds `GlobalOpts`-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dnp_core::exceptions::EXCEPTIONS_FILE;
use dnp_core::{AuthCredentials, ControllerConfig, TlsVerification};

/// Keyring service name for stored tokens and passwords.
pub const KEYRING_SERVICE: &str = "dnp";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<keyring::Error> for ConfigError {
    fn from(err: keyring::Error) -> Self {
        Self::Keyring(err.to_string())
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: explicit override, then `default_profile`,
    /// then `"default"`.
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background refresh interval for the TUI (seconds).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Search debounce in milliseconds (clamped to 150..=300).
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    60
}
fn default_search_debounce_ms() -> u64 {
    250
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL (e.g., "https://dnp.example.com").
    pub url: String,

    /// Auth mode: "token" or "credentials".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// API token (plaintext -- prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Account email for credentials auth.
    pub email: Option<String>,

    /// Password for credentials auth (plaintext -- prefer keyring).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override search debounce (milliseconds).
    pub search_debounce_ms: Option<u64>,

    /// Override the exception store location.
    pub exceptions_file: Option<PathBuf>,
}

fn default_auth_mode() -> String {
    "token".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "dnp", "dnp")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory (exception store, TUI logs).
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("dnp");
    p
}

/// Where a profile's category exceptions live: the profile override, or
/// `<data dir>/<profile>/exceptions.json`.
pub fn exceptions_path(profile: &Profile, profile_name: &str) -> PathBuf {
    profile
        .exceptions_file
        .clone()
        .unwrap_or_else(|| data_dir().join(profile_name).join(EXCEPTIONS_FILE))
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Environment overrides use `DNP_` with
/// `__` as the nesting separator (`DNP_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DNP_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str, kind: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{kind}"),
    )?)
}

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    keyring_entry(profile_name, kind)
        .ok()?
        .get_password()
        .ok()
        .map(SecretString::from)
}

/// Save an API token (e.g. one obtained by `auth login`) to the keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "token")?.set_password(token)?;
    Ok(())
}

/// Save an account password for credentials auth to the keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "password")?.set_password(password)?;
    Ok(())
}

/// Remove a stored API token. A missing entry is not an error.
pub fn delete_token(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name, "token")?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an API token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_token_env → env var lookup
    if let Some(ref env_name) = profile.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring_secret(profile_name, "token") {
        return Ok(secret);
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.api_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve email + password without CLI flags.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let email = profile
        .email
        .clone()
        .or_else(|| std::env::var("DNP_EMAIL").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("DNP_PASSWORD") {
        return Ok((email, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Some(pw) = keyring_secret(profile_name, "password") {
        return Ok((email, pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((email, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials` from a profile's `auth_mode` field.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    match profile.auth_mode.as_str() {
        "token" => Ok(AuthCredentials::Token(resolve_token(profile, profile_name)?)),
        "credentials" => {
            let (email, password) = resolve_credentials(profile, profile_name)?;
            Ok(AuthCredentials::Credentials { email, password })
        }
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'token' or 'credentials', got '{other}'"),
        }),
    }
}

pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// TLS mode for a profile: `insecure` wins, then a custom CA, else the
/// system store.
pub fn profile_tls(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `ControllerConfig` from a profile -- no CLI flag overrides.
///
/// Suitable for the TUI and other non-CLI consumers: enables periodic
/// refresh and persists exceptions under the data directory.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let url = parse_url(&profile.url)?;
    let auth = resolve_auth(profile, profile_name)?;

    let mut config = ControllerConfig::new(url, auth);
    config.tls = profile_tls(profile, defaults);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_interval_secs = defaults.refresh_interval;
    config.search_debounce = Duration::from_millis(
        profile
            .search_debounce_ms
            .unwrap_or(defaults.search_debounce_ms),
    );
    config.exceptions_path = Some(exceptions_path(profile, profile_name));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "home"

[defaults]
output = "json"

[profiles.home]
url = "https://dnp.example.com"
api_token = "plain"
search_debounce_ms = 180
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.profile_name(None), "home");
        assert_eq!(cfg.profile_name(Some("work")), "work");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);

        let home = cfg.profile("home").unwrap();
        assert_eq!(home.auth_mode, "token");
        assert_eq!(home.search_debounce_ms, Some(180));
        assert!(matches!(
            cfg.profile("work"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                url: "https://dnp.example.com".into(),
                auth_mode: "credentials".into(),
                email: Some("me@example.com".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.email.as_deref(), Some("me@example.com"));
        assert_eq!(profile.auth_mode, "credentials");
    }

    #[test]
    fn exceptions_path_prefers_profile_override() {
        let mut profile = Profile::default();
        assert!(exceptions_path(&profile, "home").ends_with("home/exceptions.json"));

        profile.exceptions_file = Some(PathBuf::from("/tmp/mine.json"));
        assert_eq!(
            exceptions_path(&profile, "home"),
            PathBuf::from("/tmp/mine.json")
        );
    }

    #[test]
    fn unknown_auth_mode_is_rejected() {
        let profile = Profile {
            url: "https://dnp.example.com".into(),
            auth_mode: "oauth".into(),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_auth(&profile, "default"),
            Err(ConfigError::Validation { ref field, .. }) if field == "auth_mode"
        ));
    }

    #[test]
    fn tls_follows_insecure_then_ca() {
        let defaults = Defaults::default();
        let mut profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/ca.pem")),
            ..Profile::default()
        };
        assert!(matches!(
            profile_tls(&profile, &defaults),
            TlsVerification::CustomCa(_)
        ));

        profile.insecure = Some(true);
        assert_eq!(
            profile_tls(&profile, &defaults),
            TlsVerification::DangerAcceptInvalid
        );
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        assert!(matches!(
            parse_url("not a url"),
            Err(ConfigError::Validation { ref field, .. }) if field == "url"
        ));
    }
}
