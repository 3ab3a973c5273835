//! Wire DTOs for the ImaraBima admin API.
//!
//! DESIGN
//! ======
//! These types mirror the remote JSON exactly so serde stays lossless. Closed
//! sets (roles, product types, policy statuses, payment frequencies) are enums;
//! an unknown value on the wire is a decode error rather than a silent string.
//!
//! ENVELOPE
//! ========
//! Every endpoint except login answers `{ "data": ..., "message"?, "error"? }`.
//! Paginated lists put the items under `data` too and add `total`, `page`,
//! `limit` and `totalPages` beside it. Login answers `{ message, token, user }`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// USERS
// =============================================================================

/// Role assigned to a platform user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Agent,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }
}

/// A platform user as cached by the admin client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub national_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Body for `POST /users`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub phone_number: String,
    pub national_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
    pub role: Role,
}

/// Body for `PUT /users/:id`. Absent fields are left untouched by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// =============================================================================
// PRODUCTS
// =============================================================================

/// Insurance product family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Funeral,
    BodaBoda,
}

impl ProductType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Funeral => "funeral",
            Self::BodaBoda => "boda_boda",
        }
    }
}

/// Insurance product definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub description: String,
    pub base_premium: f64,
    pub min_sum_assured: f64,
    pub max_sum_assured: f64,
    pub age_limit_min: u32,
    pub age_limit_max: u32,
    pub waiting_period_days: u32,
    pub is_active: bool,
    #[serde(default)]
    pub terms_and_conditions: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body for `POST /products`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub description: String,
    pub base_premium: f64,
    pub min_sum_assured: f64,
    pub max_sum_assured: f64,
    pub age_limit_min: u32,
    pub age_limit_max: u32,
    pub waiting_period_days: u32,
    pub terms_and_conditions: String,
}

/// Body for `PUT /products/:id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_premium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sum_assured: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sum_assured: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_limit_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_limit_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_period_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_and_conditions: Option<String>,
}

// =============================================================================
// POLICIES
// =============================================================================

/// Lifecycle status of a policy. Transitions are decided by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl PolicyStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Active, Self::Expired, Self::Cancelled];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for PolicyStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == raw.trim())
            .ok_or_else(|| format!("unknown policy status: {raw}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    Annually,
}

/// A named beneficiary attached to a policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyBeneficiary {
    pub id: String,
    pub policy_id: String,
    pub name: String,
    pub relationship: String,
    pub phone_number: String,
    pub national_id: String,
    pub percentage: f64,
    pub created_at: String,
}

/// Beneficiary as proposed in a create request; the server assigns ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewBeneficiary {
    pub name: String,
    pub relationship: String,
    pub phone_number: String,
    pub national_id: String,
    pub percentage: f64,
}

/// A policy linking a user to a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub policy_number: String,
    pub premium_amount: f64,
    pub sum_assured: f64,
    pub status: PolicyStatus,
    pub start_date: String,
    pub end_date: String,
    pub payment_frequency: PaymentFrequency,
    pub next_payment_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiaries: Option<Vec<PolicyBeneficiary>>,
}

/// Body for `POST /policies`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatePolicyRequest {
    pub product_id: String,
    pub premium_amount: f64,
    pub sum_assured: f64,
    pub payment_frequency: PaymentFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiaries: Option<Vec<NewBeneficiary>>,
}

/// Body for `PUT /policies/:id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePolicyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum_assured: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_frequency: Option<PaymentFrequency>,
}

/// Body for `PATCH /policies/:id/status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatusUpdate {
    pub status: PolicyStatus,
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

/// Login is the one endpoint that does not use the `data` envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub user: User,
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_policies: u64,
    pub total_products: u64,
    pub total_revenue: f64,
    pub active_policies: u64,
    pub pending_policies: u64,
    pub monthly_revenue: f64,
    pub user_growth: f64,
}

/// One month of the revenue chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: f64,
    pub policies: u64,
}

/// One slice of the policy-status breakdown chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatusSlice {
    pub status: String,
    pub count: u64,
    pub percentage: f64,
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Canonical response envelope for single resources and plain collections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Paginated collection; items live under `data` like every other payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Build a page over an in-memory slice, as the fixture catalog does.
    #[must_use]
    pub fn from_items(items: Vec<T>, page: u32, limit: u32) -> Self {
        let total = items.len() as u64;
        let limit = limit.max(1);
        let total_pages = u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);
        let skip = usize::try_from(page.saturating_sub(1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let data = items.into_iter().skip(skip).take(take).collect();
        Self { data, total, page, limit, total_pages }
    }
}

/// Query parameters for `GET /users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self { page: 1, limit: 10, search: String::new() }
    }
}

/// Query parameters for `GET /policies`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PolicyQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PolicyStatus>,
}

impl Default for PolicyQuery {
    fn default() -> Self {
        Self { page: 1, limit: 10, status: None }
    }
}
