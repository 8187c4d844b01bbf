//! Session command handlers: login, logout, whoami.

use secrecy::{ExposeSecret, SecretString};

use dnp_core::{AuthCredentials, Controller, User};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

fn user_detail(u: &User) -> String {
    [
        format!("ID:      {}", u.id),
        format!("Email:   {}", u.email),
        format!("Name:    {}", u.display_name.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub async fn handle(args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login { email } => login(email, global).await,

        AuthCommand::Logout => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            dnp_config::delete_token(&profile_name)?;
            if !global.quiet {
                eprintln!("Forgot the stored token for profile '{profile_name}'");
            }
            Ok(())
        }

        AuthCommand::Whoami => {
            let (_, controller_config) = config::build_controller_config(global)?;
            let controller = Controller::new(controller_config);
            controller.connect().await?;
            let user = controller.user().await;
            controller.disconnect().await;

            let Some(user) = user else {
                return Err(CliError::AuthFailed {
                    message: "the backend did not return an account for this token".into(),
                });
            };
            let out = output::render_single(&global.output, &user, user_detail, |u| {
                u.email.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Log in with email/password and store the resulting session token in the
/// keyring under the active profile.
async fn login(email: Option<String>, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let fallback = Profile::default();
    let profile = cfg.profiles.get(&profile_name).unwrap_or(&fallback);

    if global.url.is_none() && profile.url.is_empty() {
        return Err(CliError::NoConfig {
            path: config::config_path().display().to_string(),
        });
    }

    let email = match email.or_else(|| profile.email.clone()) {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
    };
    let password = match std::env::var("DNP_PASSWORD") {
        Ok(pw) => SecretString::from(pw),
        Err(_) => SecretString::from(rpassword::prompt_password("Password: ")?),
    };

    let controller_config = config::resolve_with_auth(
        profile,
        &profile_name,
        global,
        AuthCredentials::Credentials { email, password },
    )?;
    let controller = Controller::new(controller_config);
    controller.connect().await?;

    let token = controller.session_token().await.ok_or_else(|| CliError::AuthFailed {
        message: "login succeeded but no session token was returned".into(),
    })?;
    let user = controller.user().await;
    // No disconnect(): it would end the server session the stored token
    // belongs to.

    dnp_config::store_token(&profile_name, token.expose_secret())?;

    if !global.quiet {
        let who = user.as_ref().map_or("you", User::label);
        eprintln!("Logged in as {who}. Token stored for profile '{profile_name}'.");
        if !cfg.profiles.contains_key(&profile_name) {
            eprintln!("Tip: run `dnp config init` to save the backend URL.");
        }
    }
    Ok(())
}
