// Backend authentication
//
// Email/password login exchanges credentials for a bearer token, which is
// stored on the client and attached to every subsequent request. A token
// from configuration skips the login round-trip entirely.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::{LoginResponse, UserInfo};

/// An authenticated session returned by [`DnpClient::login`].
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: Option<UserInfo>,
}

impl DnpClient {
    /// Authenticate with email/password.
    ///
    /// `POST auth/login` -- on success the bearer token is stored on the
    /// client and used for all subsequent requests.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, Error> {
        debug!(email, "logging in");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp: LoginResponse = self
            .post("auth/login", &body)
            .await
            .map_err(|e| match e {
                Error::Api { message, .. } => Error::Authentication { message },
                other => other,
            })?;

        let token: SecretString = resp.token.into();
        self.set_token(token.clone());
        info!(email, "login successful");

        Ok(Session {
            token,
            user: resp.user,
        })
    }

    /// End the session server-side and forget the token.
    ///
    /// `POST auth/logout`. The local token is dropped even if the request fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let result: Result<Option<serde_json::Value>, Error> =
            self.post_optional("auth/logout", &json!({})).await;
        self.clear_token();
        result.map(|_| ())
    }

    /// `GET auth/me` -- the user the current token belongs to.
    pub async fn current_user(&self) -> Result<UserInfo, Error> {
        if !self.has_token() {
            return Err(Error::NotAuthenticated);
        }
        self.get("auth/me").await
    }
}
