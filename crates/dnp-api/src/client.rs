// Backend HTTP client
//
// Wraps `reqwest::Client` with base-path handling, bearer-token injection
// and envelope unwrapping. Endpoint groups (artists, dnp list, categories,
// ...) are implemented as inherent methods in their own files to keep this
// module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;
use crate::transport::TransportConfig;

const API_PREFIX: &str = "api/v1/";

/// Raw HTTP client for the do-not-play backend.
///
/// Handles the `{ success, data, message }` envelope and the `/api/v1/`
/// base path. All methods return unwrapped `data` payloads -- the
/// envelope is stripped before the caller sees it.
pub struct DnpClient {
    http: reqwest::Client,
    base_url: Url,
    /// Bearer token. Set from configuration or captured by `login`.
    token: RwLock<Option<SecretString>>,
}

impl DnpClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://dnp.example.com`);
    /// `/api/v1/` is appended unless already present.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            token: RwLock::new(None),
        })
    }

    /// Append the API prefix to the backend root.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api/v1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/{API_PREFIX}"));
        }
        Ok(url)
    }

    /// The API base URL (always ending in `/api/v1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install a bearer token (from configuration or a login response).
    pub fn set_token(&self, token: SecretString) {
        debug!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the bearer token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative endpoint path (e.g. `"dnp/list"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get_with_params(path, &[]).await
    }

    /// Send a GET request with query parameters and unwrap the envelope.
    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let builder = self.apply_auth(self.http.get(url).query(params));
        let resp = builder.send().await?;

        require_data(path, parse_envelope(resp).await?)
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        require_data(path, self.post_optional(path, body).await?)
    }

    /// POST whose envelope may legitimately carry no `data`.
    pub(crate) async fn post_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let builder = self.apply_auth(self.http.post(url).json(body));
        let resp = builder.send().await?;

        parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let builder = self.apply_auth(self.http.put(url).json(body));
        let resp = builder.send().await?;

        require_data(path, parse_envelope(resp).await?)
    }

    /// Send a DELETE request. The envelope's `data`, if any, is discarded.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let builder = self.apply_auth(self.http.delete(url));
        let resp = builder.send().await?;

        let _: Option<serde_json::Value> = parse_envelope(resp).await?;
        Ok(())
    }
}

/// Parse the `{ success, data, message }` envelope, returning `data` on
/// success or an `Error::Api` carrying the backend's message.
async fn parse_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Option<T>, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Authentication {
            message: envelope_message(&body)
                .unwrap_or_else(|| "token expired or invalid credentials".into()),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = envelope_message(&body).unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body[..floor_char_boundary(&body, 200)].to_owned()
            }
        });
        return Err(Error::Api {
            status: Some(status.as_u16()),
            message,
        });
    }

    let body = resp.text().await?;
    trace!(len = body.len(), "response body received");

    let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
        let preview = &body[..floor_char_boundary(&body, 200)];
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })?;

    if envelope.success {
        Ok(envelope.data)
    } else {
        Err(Error::Api {
            status: None,
            message: envelope
                .message
                .unwrap_or_else(|| "request was rejected by the server".into()),
        })
    }
}

/// Pull `message` out of an error body shaped like the envelope.
fn envelope_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

fn require_data<T>(endpoint: &str, data: Option<T>) -> Result<T, Error> {
    data.ok_or_else(|| Error::EmptyResponse {
        endpoint: endpoint.to_owned(),
    })
}

/// Largest char boundary `<= max` so body previews never split a code point.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut idx = max;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
