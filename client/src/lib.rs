//! Blocking client for the Resource Hub API.
//!
//! ```no_run
//! use rhub_client::{Client, Credentials, Method};
//!
//! # fn example() -> rhub_client::Result<()> {
//! let client = Client::new(
//!     "https://rhub.example.com/",
//!     Credentials::basic("admin", "p4ssw0rd"),
//! );
//! let response = client.request(Method::GET, "/v0/lab/region/1", None)?;
//! println!("{}", response.text()?);
//! # Ok(())
//! # }
//! ```

mod auth;
mod error;
mod problem;

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use auth::{Authorization, CachedToken, SystemClock, TokenResponse};

pub use auth::{Clock, Credentials, TOKEN_CREATE_PATH};
pub use error::{ClientError, Result};
pub use problem::{ApiError, RawResponse, UNKNOWN_ERROR};
pub use reqwest::{Method, StatusCode};

pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
    credentials: Credentials,
    token: Mutex<Option<CachedToken>>,
    clock: Arc<dyn Clock>,
}

impl Client {
    /// Trailing slashes of `base_url` are dropped, paths are appended verbatim.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::blocking::Client::new(),
            base_url,
            credentials,
            token: Mutex::new(None),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::blocking::Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_address(&self) -> &str {
        &self.base_url
    }

    pub fn request(&self, method: Method, path: &str, body: Option<String>) -> Result<Response> {
        self.request_with_headers(method, path, body, HeaderMap::new())
    }

    /// Sends `{method} {base}{path}` and returns the response untouched when
    /// its status is 2xx.
    ///
    /// `headers` override the default `Content-Type: application/json`. Any
    /// `Authorization` header is replaced by the client's own credential.
    pub fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        headers: HeaderMap,
    ) -> Result<Response> {
        let authorization = self.resolve_authorization()?;

        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url = %url, "send request");

        let mut request = self
            .http
            .request(method, &url)
            .headers(request_headers(headers));
        if let Some(body) = body {
            request = request.body(body);
        }

        self.send(authorization.apply(request), ClientError::Api)
    }

    fn resolve_authorization(&self) -> Result<Authorization> {
        let (username, password) = match &self.credentials {
            Credentials::Token { token } => return Ok(Authorization::Token(token.clone())),
            Credentials::Basic { username, password } => (username, password),
        };

        // held across acquisition so concurrent callers refresh once
        let mut slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if let Some(cached) = slot.as_ref().filter(|cached| cached.is_valid_at(now)) {
            return Ok(Authorization::Bearer(cached.access_token.clone()));
        }

        let cached = self.acquire_token(username, password, now)?;
        let access_token = cached.access_token.clone();
        *slot = Some(cached);
        Ok(Authorization::Bearer(access_token))
    }

    fn acquire_token(
        &self,
        username: &str,
        password: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<CachedToken> {
        let url = format!("{}{}", self.base_url, TOKEN_CREATE_PATH);
        debug!(url = %url, "acquire access token");

        let request = self.http.post(&url).basic_auth(username, Some(password));
        let response = self.send(request, ClientError::Auth)?;

        let issued: TokenResponse = response
            .json()
            .map_err(|e| ClientError::Deserialization(e.to_string()))?;
        let token = CachedToken::issued(issued, now)?;

        debug!(expires_at = %token.expires_at, "access token acquired");
        Ok(token)
    }

    fn send(
        &self,
        request: RequestBuilder,
        rejected: fn(ApiError) -> ClientError,
    ) -> Result<Response> {
        let response = request.send()?;

        if !response.status().is_success() {
            let err = ApiError::from_response(response);
            warn!(status = %err.status(), message = %err.message, "request rejected");
            return Err(rejected(err));
        }

        Ok(response)
    }
}

fn request_headers(mut extra: HeaderMap) -> HeaderMap {
    extra.remove(AUTHORIZATION);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.extend(extra);
    headers
}
