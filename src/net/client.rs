//! HTTP gateway shared by every resource function.
//!
//! ARCHITECTURE
//! ============
//! One `ApiClient` per process, built with a base address and a fixed
//! timeout. Two cross-cutting behaviors are injected at construction:
//!
//! - a [`TokenSource`] consulted on every outgoing request; when it yields a
//!   token the request carries `Authorization: Bearer <token>`.
//! - an [`UnauthorizedHandler`] invoked exactly once for every 401 response,
//!   before the error is returned to the caller.
//!
//! Tests substitute both without touching real storage or navigation.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and non-success statuses are classified into
//! [`ApiError`]. Nothing is retried here; callers decide.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

#[cfg(test)]
#[path = "client_helpers_test.rs"]
pub(crate) mod test_helpers;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::fallback::FallbackMode;
use super::types::Envelope;

/// Supplies the bearer token for outgoing requests.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Global reaction to an authorization-denied response.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}

/// The configured HTTP client with its interceptors.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    on_unauthorized: Arc<dyn UnauthorizedHandler>,
    fallback: FallbackMode,
}

/// A request under construction, tagged with method and path for logging.
pub(crate) struct Call {
    method: Method,
    path: String,
    builder: RequestBuilder,
}

impl Call {
    pub(crate) fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Self {
        self.builder = self.builder.query(query);
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.builder = self.builder.json(body);
        self
    }
}

impl ApiClient {
    /// Build the client. `base_url` may carry a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenSource>,
        on_unauthorized: Arc<dyn UnauthorizedHandler>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            tokens,
            on_unauthorized,
            fallback: FallbackMode::Disabled,
        })
    }

    /// Enable or disable the development mock-data fallback.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackMode) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn fallback_mode(&self) -> FallbackMode {
        self.fallback
    }

    /// Start a request. The bearer token is attached here, once per call.
    pub(crate) fn call(&self, method: Method, path: &str) -> Call {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method.clone(), url);
        if let Some(token) = self.tokens.bearer_token().filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }
        Call { method, path: path.to_owned(), builder }
    }

    /// Send and decode a body that is the payload itself (login, pages).
    pub(crate) async fn json<T: DeserializeOwned>(&self, call: Call) -> Result<T, ApiError> {
        let body = self.execute(call).await?;
        decode(&body)
    }

    /// Send and unwrap the canonical `{ data }` envelope.
    pub(crate) async fn data<T: DeserializeOwned>(&self, call: Call) -> Result<T, ApiError> {
        let body = self.execute(call).await?;
        let envelope: Envelope<T> = decode(&body)?;
        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Send and discard any success body.
    pub(crate) async fn empty(&self, call: Call) -> Result<(), ApiError> {
        self.execute(call).await.map(|_| ())
    }

    async fn execute(&self, call: Call) -> Result<String, ApiError> {
        let Call { method, path, builder } = call;
        let response = builder.send().await.map_err(|e| {
            let error = ApiError::from_transport(&e);
            tracing::debug!(%method, %path, error = %error, "request failed before a response");
            error
        })?;

        let status = response.status().as_u16();
        tracing::debug!(%method, %path, status, "response received");
        let body = response.text().await.map_err(|e| ApiError::from_transport(&e))?;

        if (200..300).contains(&status) {
            return Ok(body);
        }

        let error = ApiError::from_status(status, &body);
        if error.is_unauthorized() {
            tracing::warn!(%method, %path, "authorization denied; tearing down session");
            self.on_unauthorized.on_unauthorized();
        }
        Err(error)
    }

    /// Apply the mock-data decorator to a read result.
    pub(crate) fn or_mock<T>(
        &self,
        resource: &'static str,
        result: Result<T, ApiError>,
        mock: impl FnOnce() -> T,
    ) -> Result<T, ApiError> {
        self.fallback.apply(resource, result, mock)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
