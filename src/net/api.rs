//! Typed REST client for the classroom backend.
//!
//! ERROR HANDLING
//! ==============
//! Every call resolves to the decoded envelope or an [`ApiError`]. The body
//! is decoded as JSON before the status is inspected, so a non-JSON error page
//! surfaces as "unexpected response" and a JSON error surfaces the server's
//! own `message`. Nothing is retried or cached; callers treat each call as
//! at-most-once.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ApiError;
use super::transport::{ApiRequest, ApiTransport, HttpTransport, Method, TransportBuildError};
use super::types::Envelope;
use crate::config::ClientConfig;

/// Cheap-to-clone handle over a shared transport.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Client over a fresh `reqwest` transport pointed at `config.api_base()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportBuildError> {
        let transport = HttpTransport::new(&config.api_base())?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Issue `request` and decode the envelope with payload `P`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unreachable`] on transport failure,
    /// [`ApiError::UnexpectedResponse`] on a malformed body, and
    /// [`ApiError::Server`] on a non-2xx status.
    pub async fn send<P: DeserializeOwned>(&self, request: ApiRequest) -> Result<Envelope<P>, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        debug!(method, path = %path, query = ?request.query, "api request");

        let raw = self.transport.execute(request).await.map_err(|e| {
            warn!(method, path = %path, error = %e, "api transport failed");
            ApiError::Unreachable { detail: e.0 }
        })?;

        let value: serde_json::Value = serde_json::from_str(&raw.body).map_err(|e| {
            warn!(method, path = %path, status = raw.status, error = %e, "api response not JSON");
            ApiError::UnexpectedResponse { detail: e.to_string() }
        })?;

        if !(200..300).contains(&raw.status) {
            let err = ApiError::from_status(raw.status, &value);
            warn!(method, path = %path, status = raw.status, error = %err, "api request rejected");
            return Err(err);
        }

        serde_json::from_value(value).map_err(|e| {
            warn!(method, path = %path, error = %e, "api response shape mismatch");
            ApiError::UnexpectedResponse { detail: e.to_string() }
        })
    }

    pub(crate) async fn get<P: DeserializeOwned>(&self, path: impl Into<String>) -> Result<Envelope<P>, ApiError> {
        self.send(ApiRequest::get(path)).await
    }

    pub(crate) async fn get_with_query<P: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        query: QueryParams,
    ) -> Result<Envelope<P>, ApiError> {
        self.send(ApiRequest::get(path).with_query(query.into_pairs()))
            .await
    }

    pub(crate) async fn send_json<P: DeserializeOwned>(
        &self,
        method: Method,
        path: impl Into<String>,
        body: &impl serde::Serialize,
    ) -> Result<Envelope<P>, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::UnexpectedResponse { detail: e.to_string() })?;
        self.send(ApiRequest::new(method, path).with_body(body))
            .await
    }

    pub(crate) async fn send_empty<P: DeserializeOwned>(
        &self,
        method: Method,
        path: impl Into<String>,
    ) -> Result<Envelope<P>, ApiError> {
        self.send(ApiRequest::new(method, path)).await
    }
}

// =============================================================================
// QUERY PARAMS
// =============================================================================

/// Ordered query-string builder that drops absent and empty values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value` unless the value is absent or blank.
    pub fn push(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.pairs.push((key.to_owned(), value.to_owned()));
        }
        self
    }

    /// Append a positive number; zero means "not set".
    pub fn push_number(&mut self, key: &str, value: Option<u32>) -> &mut Self {
        if let Some(value) = value.filter(|v| *v > 0) {
            self.pairs.push((key.to_owned(), value.to_string()));
        }
        self
    }

    /// Append `key=true` only when the flag is set.
    pub fn push_flag(&mut self, key: &str, value: bool) -> &mut Self {
        if value {
            self.pairs.push((key.to_owned(), "true".to_owned()));
        }
        self
    }

    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
