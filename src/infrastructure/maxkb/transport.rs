use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

use super::envelope::Envelope;
use crate::domain::DomainError;

/// Fixed timeout applied to every upstream call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Redirect targets that indicate the upstream bounced us to its login page
const AUTH_REDIRECT_MARKERS: &[&str] = &["/admin", "/login"];

const AUTH_FAILURE_HINT: &str =
    "MaxKB redirected to its login page; the API key is probably invalid or expired. \
     Check the MAXKB_API_KEY setting.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Authenticated request/response step against the MaxKB API root (for mocking)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one call; `path` is relative to the configured API root
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Envelope, DomainError>;
}

/// Real transport using reqwest
///
/// Redirects are never followed: MaxKB answers unauthenticated calls with a
/// redirect to its admin login page instead of a 401.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    api_root: String,
}

impl ReqwestTransport {
    pub fn new(api_root: impl Into<String>, api_key: &str) -> Result<Self, DomainError> {
        Self::with_timeout(api_root, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_root: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let mut auth_header = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            DomainError::configuration("API key contains characters not allowed in a header")
        })?;
        auth_header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_header);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_root: api_root.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Release the connection pool
    pub fn close(self) {
        debug!(api_root = %self.api_root, "Closing MaxKB transport");
        drop(self.client);
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Envelope, DomainError> {
        let url = self.url(path);
        debug!(%method, %url, "Sending MaxKB request");

        let mut request = self.client.request(method.into(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(request_error)?;
        let status = response.status();

        if is_redirect(status) {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            return Err(classify_redirect(status.as_u16(), location));
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::http_status(status.as_u16(), error_body));
        }

        let bytes = response.bytes().await.map_err(request_error)?;
        Envelope::from_slice(&bytes)
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn classify_redirect(status: u16, location: String) -> DomainError {
    if AUTH_REDIRECT_MARKERS
        .iter()
        .any(|marker| location.contains(marker))
    {
        warn!(status, %location, "MaxKB redirected to login page");
        return DomainError::authentication(AUTH_FAILURE_HINT);
    }

    warn!(status, %location, "MaxKB returned an unexpected redirect");
    DomainError::unexpected_redirect(status, location)
}

fn request_error(error: reqwest::Error) -> DomainError {
    if error.is_timeout() {
        DomainError::http(format!("Request timed out: {}", error))
    } else {
        DomainError::http(format!("Request failed: {}", error))
    }
}
