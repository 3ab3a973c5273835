//! Fixture catalog served by the development fallback.

use super::types::{
    DashboardStats, Page, PaymentFrequency, Policy, PolicyQuery, PolicyStatus, PolicyStatusSlice,
    Product, ProductType, RevenuePoint, Role, User, UserQuery,
};

const CREATED: &str = "2024-01-15T08:00:00Z";

fn user(id: &str, name: &str, phone: &str, role: Role) -> User {
    User {
        id: id.to_owned(),
        name: name.to_owned(),
        phone_number: phone.to_owned(),
        national_id: format!("ID-{id}"),
        email: None,
        role,
        is_active: true,
        created_at: CREATED.to_owned(),
        updated_at: CREATED.to_owned(),
    }
}

#[must_use]
pub fn users() -> Vec<User> {
    vec![
        user("1", "Amina Wanjiru", "+254700000001", Role::Admin),
        user("2", "Brian Otieno", "+254700000002", Role::Agent),
        user("3", "Cynthia Mutua", "+254700000003", Role::Customer),
    ]
}

#[must_use]
pub fn users_page(query: &UserQuery) -> Page<User> {
    let needle = query.search.to_lowercase();
    let matching = users()
        .into_iter()
        .filter(|u| needle.is_empty() || u.name.to_lowercase().contains(&needle))
        .collect();
    Page::from_items(matching, query.page, query.limit)
}

#[must_use]
pub fn user_by_id(id: &str) -> User {
    users()
        .into_iter()
        .find(|u| u.id == id)
        .unwrap_or_else(|| user(id, "Unknown User", "+254700000000", Role::Customer))
}

fn product(id: &str, name: &str, product_type: ProductType, base_premium: f64) -> Product {
    Product {
        id: id.to_owned(),
        name: name.to_owned(),
        product_type,
        description: format!("{name} cover"),
        base_premium,
        min_sum_assured: 50_000.0,
        max_sum_assured: 500_000.0,
        age_limit_min: 18,
        age_limit_max: 65,
        waiting_period_days: 30,
        is_active: true,
        terms_and_conditions: String::new(),
        created_at: CREATED.to_owned(),
        updated_at: CREATED.to_owned(),
    }
}

#[must_use]
pub fn products(product_type: Option<ProductType>) -> Vec<Product> {
    vec![
        product("1", "Family Funeral Cover", ProductType::Funeral, 500.0),
        product("2", "Boda Boda Rider Cover", ProductType::BodaBoda, 300.0),
    ]
    .into_iter()
    .filter(|p| product_type.is_none_or(|kind| p.product_type == kind))
    .collect()
}

#[must_use]
pub fn product_by_id(id: &str) -> Product {
    products(None)
        .into_iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| product(id, "Unknown Product", ProductType::Funeral, 0.0))
}

fn policy(id: &str, holder: User, product: Product, status: PolicyStatus) -> Policy {
    Policy {
        id: id.to_owned(),
        user_id: holder.id.clone(),
        product_id: product.id.clone(),
        policy_number: format!("POL-2024-{id:0>4}"),
        premium_amount: product.base_premium,
        sum_assured: 100_000.0,
        status,
        start_date: "2024-02-01".to_owned(),
        end_date: "2025-01-31".to_owned(),
        payment_frequency: PaymentFrequency::Monthly,
        next_payment_date: "2024-03-01".to_owned(),
        agent_id: Some("2".to_owned()),
        created_at: CREATED.to_owned(),
        updated_at: CREATED.to_owned(),
        user: Some(holder),
        product: Some(product),
        beneficiaries: None,
    }
}

#[must_use]
pub fn policies() -> Vec<Policy> {
    let holder = user_by_id("3");
    vec![
        policy("1", holder.clone(), product_by_id("1"), PolicyStatus::Active),
        policy("2", holder, product_by_id("2"), PolicyStatus::Pending),
    ]
}

#[must_use]
pub fn policies_page(query: &PolicyQuery) -> Page<Policy> {
    let matching = policies()
        .into_iter()
        .filter(|p| query.status.is_none_or(|status| p.status == status))
        .collect();
    Page::from_items(matching, query.page, query.limit)
}

#[must_use]
pub fn policy_by_id(id: &str) -> Policy {
    policies()
        .into_iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| policy(id, user_by_id("3"), product_by_id("1"), PolicyStatus::Pending))
}

#[must_use]
pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_users: 1250,
        total_policies: 890,
        total_products: 2,
        total_revenue: 2_450_000.0,
        active_policies: 756,
        pending_policies: 134,
        monthly_revenue: 185_000.0,
        user_growth: 12.5,
    }
}

#[must_use]
pub fn revenue() -> Vec<RevenuePoint> {
    [("Jan", 150_000.0, 45), ("Feb", 165_000.0, 52), ("Mar", 185_000.0, 61)]
        .into_iter()
        .map(|(month, revenue, policies)| RevenuePoint { month: month.to_owned(), revenue, policies })
        .collect()
}

#[must_use]
pub fn policy_status() -> Vec<PolicyStatusSlice> {
    [("active", 756, 84.9), ("pending", 134, 15.1)]
        .into_iter()
        .map(|(status, count, percentage)| PolicyStatusSlice { status: status.to_owned(), count, percentage })
        .collect()
}
