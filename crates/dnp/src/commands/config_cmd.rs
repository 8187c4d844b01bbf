//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "refresh_interval = {}", cfg.defaults.refresh_interval);
    let _ = writeln!(out, "search_debounce_ms = {}", cfg.defaults.search_debounce_ms);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "url = \"{}\"", p.url);
        let _ = writeln!(out, "auth_mode = \"{}\"", p.auth_mode);
        if p.api_token.is_some() {
            let _ = writeln!(out, "api_token = \"{REDACTED}\"");
        }
        if let Some(ref env) = p.api_token_env {
            let _ = writeln!(out, "api_token_env = \"{env}\"");
        }
        if let Some(ref email) = p.email {
            let _ = writeln!(out, "email = \"{email}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"{REDACTED}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ms) = p.search_debounce_ms {
            let _ = writeln!(out, "search_debounce_ms = {ms}");
        }
        if let Some(ref path) = p.exceptions_file {
            let _ = writeln!(out, "exceptions_file = \"{}\"", path.display());
        }
    }

    out
}

/// Serialized config with secrets masked, for the structured formats.
fn redacted_value(cfg: &Config) -> Result<serde_json::Value, CliError> {
    let mut value = serde_json::to_value(cfg)?;
    if let Some(profiles) = value
        .get_mut("profiles")
        .and_then(serde_json::Value::as_object_mut)
    {
        for profile in profiles.values_mut() {
            for key in ["api_token", "password"] {
                if let Some(field) = profile.get_mut(key).filter(|v| !v.is_null()) {
                    *field = REDACTED.into();
                }
            }
        }
    }
    Ok(value)
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Offer to store a secret in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in
/// the keyring.
fn prompt_keyring_storage(
    secret: &str,
    store: impl FnOnce(&str) -> Result<(), dnp_config::ConfigError>,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store(secret)?;
        eprintln!("   {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn parse_flag<T: std::str::FromStr>(field: &str, value: &str, hint: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: hint.into(),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("dnp -- configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let url: String = Input::new()
                .with_prompt("Backend URL")
                .default("https://localhost:8080".into())
                .interact_text()
                .map_err(prompt_err)?;
            dnp_config::parse_url(&url)?;

            let auth_choices = &["API token", "Email/password"];
            let auth_selection = Select::new()
                .with_prompt("Authentication method")
                .items(auth_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                url,
                ..Profile::default()
            };

            if auth_selection == 0 {
                let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
                if token.is_empty() {
                    return Err(CliError::Validation {
                        field: "api_token".into(),
                        reason: "token cannot be empty".into(),
                    });
                }
                profile.auth_mode = "token".into();
                profile.api_token = prompt_keyring_storage(
                    &token,
                    |secret| dnp_config::store_token(&profile_name, secret),
                    "API token",
                )?;
            } else {
                let email: String = Input::new()
                    .with_prompt("Email")
                    .interact_text()
                    .map_err(prompt_err)?;
                let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
                if email.is_empty() || password.is_empty() {
                    return Err(CliError::Validation {
                        field: "credentials".into(),
                        reason: "email and password cannot be empty".into(),
                    });
                }
                profile.auth_mode = "credentials".into();
                profile.email = Some(email);
                profile.password = prompt_keyring_storage(
                    &password,
                    |secret| dnp_config::store_password(&profile_name, secret),
                    "password",
                )?;
            }

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 || cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }
            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: dnp auth whoami");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => format_config_redacted(&cfg),
                _ => {
                    let value = redacted_value(&cfg)?;
                    output::render_single(&global.output, &value, |_| String::new(), |_| {
                        String::new()
                    })
                }
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_insert_with(|| Profile {
                auth_mode: "token".into(),
                ..Profile::default()
            });

            match key.as_str() {
                "url" => {
                    dnp_config::parse_url(&value)?;
                    profile.url = value;
                }
                "auth_mode" | "auth-mode" => {
                    if !matches!(value.as_str(), "token" | "credentials") {
                        return Err(CliError::Validation {
                            field: "auth_mode".into(),
                            reason: "must be 'token' or 'credentials'".into(),
                        });
                    }
                    profile.auth_mode = value;
                }
                "api_token" | "api-token" => profile.api_token = Some(value),
                "api_token_env" | "api-token-env" => profile.api_token_env = Some(value),
                "email" => profile.email = Some(value),
                "insecure" => {
                    profile.insecure =
                        Some(parse_flag("insecure", &value, "must be 'true' or 'false'")?);
                }
                "timeout" => {
                    profile.timeout =
                        Some(parse_flag("timeout", &value, "must be a number (seconds)")?);
                }
                "search_debounce_ms" | "search-debounce-ms" => {
                    profile.search_debounce_ms = Some(parse_flag(
                        "search_debounce_ms",
                        &value,
                        "must be a number (milliseconds)",
                    )?);
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                "exceptions_file" | "exceptions-file" => {
                    profile.exceptions_file = Some(value.into());
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: url, auth_mode, \
                             api_token, api_token_env, email, insecure, timeout, \
                             search_debounce_ms, ca_cert, exceptions_file"
                        ),
                    });
                }
            }

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: dnp config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "api_token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            dnp_config::store_token(&profile_name, &token)?;
            if !global.quiet {
                eprintln!("Token stored in system keyring for profile '{profile_name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with_secrets() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                url: "https://dnp.example.com".into(),
                auth_mode: "credentials".into(),
                email: Some("me@example.com".into()),
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn table_view_masks_secrets() {
        let out = format_config_redacted(&config_with_secrets());
        assert!(out.contains("[profiles.home]"));
        assert!(out.contains("password = \"****\""));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn structured_view_masks_secrets_but_keeps_missing_ones_null() {
        let value = redacted_value(&config_with_secrets()).unwrap();
        assert_eq!(value["profiles"]["home"]["password"], "****");
        assert!(value["profiles"]["home"]["api_token"].is_null());
        assert_eq!(value["profiles"]["home"]["email"], "me@example.com");
    }
}
