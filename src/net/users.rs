//! Users resource: `/users` CRUD plus activation toggling.

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::mock;
use super::types::{CreateUserRequest, Page, UpdateUserRequest, User, UserQuery};

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    #[must_use]
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }
}

impl UsersApi<'_> {
    /// `GET /users?page&limit&search`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn list(&self, query: &UserQuery) -> Result<Page<User>, ApiError> {
        let result = self
            .client
            .json(self.client.call(Method::GET, "/users").query(query))
            .await;
        self.client.or_mock("users", result, || mock::users_page(query))
    }

    /// `GET /users/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        let result = self
            .client
            .data(self.client.call(Method::GET, &format!("/users/{id}")))
            .await;
        self.client.or_mock("users", result, || mock::user_by_id(id))
    }

    /// `POST /users`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the server refuses the new user.
    pub async fn create(&self, body: &CreateUserRequest) -> Result<User, ApiError> {
        self.client
            .data(self.client.call(Method::POST, "/users").json(body))
            .await
    }

    /// `PUT /users/:id`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn update(&self, id: &str, body: &UpdateUserRequest) -> Result<User, ApiError> {
        self.client
            .data(self.client.call(Method::PUT, &format!("/users/{id}")).json(body))
            .await
    }

    /// `DELETE /users/:id`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .empty(self.client.call(Method::DELETE, &format!("/users/{id}")))
            .await
    }

    /// `PATCH /users/:id/toggle-status`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn toggle_status(&self, id: &str) -> Result<User, ApiError> {
        self.client
            .data(self.client.call(Method::PATCH, &format!("/users/{id}/toggle-status")))
            .await
    }
}
