//! Policies resource: `/policies` CRUD plus status updates.
//!
//! Mutations are proposals; the returned policy is the server's verdict and
//! callers re-fetch rather than patching local copies.

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::mock;
use super::types::{
    CreatePolicyRequest, Page, Policy, PolicyQuery, PolicyStatus, PolicyStatusUpdate, UpdatePolicyRequest,
};

pub struct PoliciesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    #[must_use]
    pub fn policies(&self) -> PoliciesApi<'_> {
        PoliciesApi { client: self }
    }
}

impl PoliciesApi<'_> {
    /// `GET /policies?page&limit&status`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn list(&self, query: &PolicyQuery) -> Result<Page<Policy>, ApiError> {
        let result = self
            .client
            .json(self.client.call(Method::GET, "/policies").query(query))
            .await;
        self.client.or_mock("policies", result, || mock::policies_page(query))
    }

    /// `GET /policies/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &str) -> Result<Policy, ApiError> {
        let result = self
            .client
            .data(self.client.call(Method::GET, &format!("/policies/{id}")))
            .await;
        self.client.or_mock("policies", result, || mock::policy_by_id(id))
    }

    /// `POST /policies`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the server refuses the proposal.
    pub async fn create(&self, body: &CreatePolicyRequest) -> Result<Policy, ApiError> {
        self.client
            .data(self.client.call(Method::POST, "/policies").json(body))
            .await
    }

    /// `PUT /policies/:id`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn update(&self, id: &str, body: &UpdatePolicyRequest) -> Result<Policy, ApiError> {
        self.client
            .data(self.client.call(Method::PUT, &format!("/policies/{id}")).json(body))
            .await
    }

    /// `DELETE /policies/:id`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .empty(self.client.call(Method::DELETE, &format!("/policies/{id}")))
            .await
    }

    /// `PATCH /policies/:id/status`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the policy does not exist, so the
    /// caller can branch on it.
    pub async fn update_status(&self, id: &str, status: PolicyStatus) -> Result<Policy, ApiError> {
        self.client
            .data(
                self.client
                    .call(Method::PATCH, &format!("/policies/{id}/status"))
                    .json(&PolicyStatusUpdate { status }),
            )
            .await
    }
}
