//! Dashboard resource: read-only summary endpoints.

use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use super::mock;
use super::types::{DashboardStats, PolicyStatusSlice, RevenuePoint};

pub struct DashboardApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    #[must_use]
    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi { client: self }
    }
}

impl DashboardApi<'_> {
    /// `GET /dashboard/stats`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let result = self
            .client
            .data(self.client.call(Method::GET, "/dashboard/stats"))
            .await;
        self.client.or_mock("dashboard/stats", result, mock::dashboard_stats)
    }

    /// `GET /dashboard/revenue`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn revenue(&self) -> Result<Vec<RevenuePoint>, ApiError> {
        let result = self
            .client
            .data(self.client.call(Method::GET, "/dashboard/revenue"))
            .await;
        self.client.or_mock("dashboard/revenue", result, mock::revenue)
    }

    /// `GET /dashboard/policy-status`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn policy_status(&self) -> Result<Vec<PolicyStatusSlice>, ApiError> {
        let result = self
            .client
            .data(self.client.call(Method::GET, "/dashboard/policy-status"))
            .await;
        self.client.or_mock("dashboard/policy-status", result, mock::policy_status)
    }
}
