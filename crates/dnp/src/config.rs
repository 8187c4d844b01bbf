//! CLI configuration -- thin wrapper around `dnp_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--url, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use dnp_core::{AuthCredentials, ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use dnp_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Build a `ControllerConfig` from the config file, profile, and CLI
/// overrides. Returns the resolved profile name alongside.
pub fn build_controller_config(
    global: &GlobalOpts,
) -> Result<(String, ControllerConfig), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let controller_config = match cfg.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, global)?,
        None => resolve_flags_only(&profile_name, global)?,
    };
    Ok((profile_name, controller_config))
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    // Token flag > profile credential chain
    let auth = match global.token {
        Some(ref token) => AuthCredentials::Token(SecretString::from(token.clone())),
        None => dnp_config::resolve_auth(profile, profile_name)?,
    };
    resolve_with_auth(profile, profile_name, global, auth)
}

/// Like [`resolve_profile`], with credentials supplied by the caller.
pub fn resolve_with_auth(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    auth: AuthCredentials,
) -> Result<ControllerConfig, CliError> {
    // 1. Backend URL (flag > env > profile)
    let url = dnp_config::parse_url(global.url.as_deref().unwrap_or(&profile.url))?;

    let mut config = ControllerConfig::new(url, auth);

    // 2. TLS verification
    config.tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 3. Timeout and one-shot tuning
    config.timeout = Duration::from_secs(global.timeout);
    config.refresh_interval_secs = 0;
    config.exceptions_path = Some(dnp_config::exceptions_path(profile, profile_name));

    Ok(config)
}

/// Build a `ControllerConfig` from flags and env vars alone, for when the
/// active profile does not exist.
pub fn resolve_flags_only(
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    let Some(ref url) = global.url else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };
    if global.token.is_none() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }

    let profile = Profile {
        url: url.clone(),
        ..Profile::default()
    };
    resolve_profile(&profile, profile_name, global)
}
