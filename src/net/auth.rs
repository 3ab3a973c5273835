//! Auth resource: login, logout and token verification.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store talks to these endpoints through the [`AuthBackend`]
//! seam so its lifecycle can be exercised without a live server.

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{LoginRequest, LoginResponse, User};

/// Remote operations the session lifecycle depends on.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// `POST /auth/login`.
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /auth/verify`, resolving to the user the stored token belongs to.
    async fn verify(&self) -> Result<User, ApiError>;
}

#[async_trait::async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.json(self.call(Method::POST, "/auth/login").json(credentials))
            .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.empty(self.call(Method::POST, "/auth/logout")).await
    }

    async fn verify(&self) -> Result<User, ApiError> {
        self.data(self.call(Method::GET, "/auth/verify")).await
    }
}
