//! HTTP transport seam.
//!
//! DESIGN
//! ======
//! `ApiTransport` is the only place bytes leave the process. The production
//! implementation is `reqwest` with a cookie store so the session cookie set
//! by `/auth/login` rides along on every later call; tests swap in an
//! in-memory transport behind the same trait.

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

/// HTTP verbs used by the classroom API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outgoing API call, relative to the API base (`/tasks`, not `/api/tasks`).
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a query parameter, if it was sent.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of an HTTP response. Decoding happens in the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self { status, body: body.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum TransportBuildError {
    #[error("HTTP client build failed: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid cookie header: {0}")]
    InvalidCookie(#[from] reqwest::header::InvalidHeaderValue),
}

#[async_trait::async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;
}

// =============================================================================
// REQWEST TRANSPORT
// =============================================================================

/// `reqwest`-backed transport with an in-memory cookie jar.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `base_url` (e.g. `http://localhost:5000/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, TransportBuildError> {
        Self::build(base_url, None)
    }

    /// Like [`HttpTransport::new`], seeding every request with a raw `Cookie`
    /// header (for processes that reuse a session created elsewhere).
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie is not a valid header value or the
    /// HTTP client fails to build.
    pub fn with_cookie(base_url: &str, cookie: &str) -> Result<Self, TransportBuildError> {
        Self::build(base_url, Some(cookie))
    }

    fn build(base_url: &str, cookie: Option<&str>) -> Result<Self, TransportBuildError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
        }
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl ApiTransport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.to_reqwest(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}
