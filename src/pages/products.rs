//! Products page: catalog listing, local search and form checks.

#[cfg(test)]
#[path = "products_test.rs"]
mod products_test;

use crate::net::types::{CreateProductRequest, Product, ProductType};
use crate::net::{ApiClient, ApiError};

use super::{LoadState, matches_search};

pub const LOAD_FAILED: &str = "Failed to load products. Please check your connection and try again.";

pub async fn load(client: &ApiClient, product_type: Option<ProductType>) -> LoadState<Vec<Product>> {
    LoadState::from_result(client.products().list(product_type).await, LOAD_FAILED)
}

/// Products matching `term` on name or description, optionally only active ones.
#[must_use]
pub fn filter<'a>(products: &'a [Product], term: &str, active_only: bool) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| !active_only || p.is_active)
        .filter(|p| matches_search(term, &[Some(p.name.as_str()), Some(p.description.as_str())]))
        .collect()
}

/// # Errors
///
/// Returns the gateway failure.
pub async fn toggle_status(client: &ApiClient, id: &str) -> Result<Product, ApiError> {
    client.products().toggle_status(id).await
}

/// Check a product definition before proposing it.
///
/// # Errors
///
/// Returns the message to show beside the form.
pub fn validate_product(request: &CreateProductRequest) -> Result<(), &'static str> {
    if request.name.trim().is_empty() {
        return Err("Name is required.");
    }
    if request.base_premium.is_nan() || request.base_premium <= 0.0 {
        return Err("Base premium must be greater than zero.");
    }
    if request.min_sum_assured < 0.0 || request.min_sum_assured > request.max_sum_assured {
        return Err("Minimum sum assured cannot exceed the maximum.");
    }
    if request.age_limit_min > request.age_limit_max {
        return Err("Minimum age cannot exceed the maximum age.");
    }
    Ok(())
}
