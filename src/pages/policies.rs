//! Policies page: list, search, CRUD proposals and status changes.
//!
//! Every mutation is followed by a re-fetch; local copies are never patched.

#[cfg(test)]
#[path = "policies_test.rs"]
mod policies_test;

use crate::net::types::{
    CreatePolicyRequest, PaymentFrequency, Policy, PolicyQuery, PolicyStatus, Product, UpdatePolicyRequest,
};
use crate::net::{ApiClient, ApiError};

use super::matches_search;

pub const LOAD_FAILED: &str = "Failed to load policies. Please check your connection and try again.";
pub const CREATE_FAILED: &str = "Failed to create policy. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update policy. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete policy. Please try again.";
pub const STATUS_FAILED: &str = "Failed to update policy status. Please try again.";
pub const NOT_FOUND: &str = "Policy not found.";

/// The page fetches everything on one page and filters locally.
const PAGE_LIMIT: u32 = 100;

/// Visual tone of a status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Warning,
    Danger,
    Muted,
}

#[must_use]
pub fn status_tone(status: PolicyStatus) -> BadgeTone {
    match status {
        PolicyStatus::Active => BadgeTone::Success,
        PolicyStatus::Pending => BadgeTone::Warning,
        PolicyStatus::Expired => BadgeTone::Danger,
        PolicyStatus::Cancelled => BadgeTone::Muted,
    }
}

// =============================================================================
// FORM
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct PolicyForm {
    pub product_id: String,
    pub premium_amount: f64,
    pub sum_assured: f64,
    pub payment_frequency: PaymentFrequency,
}

impl Default for PolicyForm {
    fn default() -> Self {
        Self {
            product_id: String::new(),
            premium_amount: 0.0,
            sum_assured: 0.0,
            payment_frequency: PaymentFrequency::Monthly,
        }
    }
}

impl PolicyForm {
    /// Prefill the edit form from an existing policy.
    #[must_use]
    pub fn from_policy(policy: &Policy) -> Self {
        Self {
            product_id: policy.product_id.clone(),
            premium_amount: policy.premium_amount,
            sum_assured: policy.sum_assured,
            payment_frequency: policy.payment_frequency,
        }
    }

    /// # Errors
    ///
    /// Returns the message to show beside the form.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.product_id.trim().is_empty() {
            return Err("Select a product.");
        }
        if self.premium_amount.is_nan() || self.premium_amount <= 0.0 {
            return Err("Premium amount must be greater than zero.");
        }
        if self.sum_assured.is_nan() || self.sum_assured <= 0.0 {
            return Err("Sum assured must be greater than zero.");
        }
        Ok(())
    }

    #[must_use]
    pub fn to_create(&self) -> CreatePolicyRequest {
        CreatePolicyRequest {
            product_id: self.product_id.trim().to_owned(),
            premium_amount: self.premium_amount,
            sum_assured: self.sum_assured,
            payment_frequency: self.payment_frequency,
            beneficiaries: None,
        }
    }

    #[must_use]
    pub fn to_update(&self) -> UpdatePolicyRequest {
        UpdatePolicyRequest {
            product_id: Some(self.product_id.trim().to_owned()),
            premium_amount: Some(self.premium_amount),
            sum_assured: Some(self.sum_assured),
            payment_frequency: Some(self.payment_frequency),
        }
    }
}

// =============================================================================
// PAGE
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoliciesPage {
    pub policies: Vec<Policy>,
    pub products: Vec<Product>,
    pub status_filter: Option<PolicyStatus>,
    pub error: Option<String>,
    pub loading: bool,
}

impl PoliciesPage {
    #[must_use]
    pub fn new(status_filter: Option<PolicyStatus>) -> Self {
        Self { status_filter, ..Self::default() }
    }

    /// Fetch policies and products together. On failure both lists are emptied.
    pub async fn fetch(&mut self, client: &ApiClient) {
        self.loading = true;
        self.error = None;
        let query = PolicyQuery { page: 1, limit: PAGE_LIMIT, status: self.status_filter };
        let policies_api = client.policies();
        let products_api = client.products();
        let (policies, products) = tokio::join!(policies_api.list(&query), products_api.list(None));
        match (policies, products) {
            (Ok(policies), Ok(products)) => {
                self.policies = policies.data;
                self.products = products;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, "failed to fetch policies");
                self.error = Some(LOAD_FAILED.to_owned());
                self.policies.clear();
                self.products.clear();
            }
        }
        self.loading = false;
    }

    /// Change the status filter and re-fetch.
    pub async fn set_status_filter(&mut self, client: &ApiClient, status: Option<PolicyStatus>) {
        self.status_filter = status;
        self.fetch(client).await;
    }

    /// Policies matching `term` on policy number, holder name or product name.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Policy> {
        self.policies
            .iter()
            .filter(|p| {
                matches_search(
                    term,
                    &[
                        Some(p.policy_number.as_str()),
                        p.user.as_ref().map(|u| u.name.as_str()),
                        p.product.as_ref().map(|pr| pr.name.as_str()),
                    ],
                )
            })
            .collect()
    }

    /// Name of the product a policy refers to, from the fetched catalog.
    #[must_use]
    pub fn product_name<'a>(&'a self, policy: &'a Policy) -> Option<&'a str> {
        policy
            .product
            .as_ref()
            .map(|p| p.name.as_str())
            .or_else(|| self.products.iter().find(|p| p.id == policy.product_id).map(|p| p.name.as_str()))
    }

    /// Propose a new policy.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; `self.error` carries the page message.
    pub async fn create(&mut self, client: &ApiClient, form: &PolicyForm) -> Result<(), ApiError> {
        let result = client.policies().create(&form.to_create()).await.map(|_| ());
        self.finish(client, result, CREATE_FAILED).await
    }

    /// Propose edits to an existing policy.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; `self.error` carries the page message.
    pub async fn update(&mut self, client: &ApiClient, id: &str, form: &PolicyForm) -> Result<(), ApiError> {
        let result = client.policies().update(id, &form.to_update()).await.map(|_| ());
        self.finish(client, result, UPDATE_FAILED).await
    }

    /// # Errors
    ///
    /// Returns the gateway failure; `self.error` carries the page message.
    pub async fn delete(&mut self, client: &ApiClient, id: &str) -> Result<(), ApiError> {
        let result = client.policies().delete(id).await;
        self.finish(client, result, DELETE_FAILED).await
    }

    /// # Errors
    ///
    /// Returns the gateway failure. A missing policy yields
    /// [`ApiError::NotFound`] and the distinct [`NOT_FOUND`] message.
    pub async fn update_status(&mut self, client: &ApiClient, id: &str, status: PolicyStatus) -> Result<(), ApiError> {
        let result = client.policies().update_status(id, status).await.map(|_| ());
        self.finish(client, result, STATUS_FAILED).await
    }

    async fn finish(&mut self, client: &ApiClient, result: Result<(), ApiError>, failed: &str) -> Result<(), ApiError> {
        match result {
            Ok(()) => {
                self.fetch(client).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "policy action failed");
                let message = if e.is_not_found() { NOT_FOUND } else { failed };
                self.error = Some(message.to_owned());
                Err(e)
            }
        }
    }
}
