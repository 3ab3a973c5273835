use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use serde_json::json;

use super::*;
use crate::net::client::test_helpers::{closed_url, spawn, test_client};
use crate::net::mock;

fn page_json() -> serde_json::Value {
    json!({ "data": mock::policies(), "total": 2, "page": 1, "limit": 100, "totalPages": 1 })
}

/// Remote with two policies; policy `42` does not exist.
fn remote(list_calls: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/policies",
            get(move || {
                list_calls.fetch_add(1, Ordering::SeqCst);
                async { Json(page_json()) }
            }),
        )
        .route("/products", get(|| async { Json(json!({ "data": mock::products(None) })) }))
        .route(
            "/policies/{id}/status",
            patch(|Path(id): Path<String>| async move {
                if id == "42" {
                    (StatusCode::NOT_FOUND, Json(json!({ "error": "Policy not found" }))).into_response()
                } else {
                    Json(json!({ "data": mock::policy_by_id(&id) })).into_response()
                }
            }),
        )
        .route(
            "/policies/{id}",
            axum::routing::delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
}

// =============================================================================
// presentation helpers
// =============================================================================

#[test]
fn status_tones() {
    assert_eq!(status_tone(PolicyStatus::Active), BadgeTone::Success);
    assert_eq!(status_tone(PolicyStatus::Pending), BadgeTone::Warning);
    assert_eq!(status_tone(PolicyStatus::Expired), BadgeTone::Danger);
    assert_eq!(status_tone(PolicyStatus::Cancelled), BadgeTone::Muted);
}

#[test]
fn form_requires_product_and_positive_amounts() {
    let mut form = PolicyForm::default();
    assert_eq!(form.payment_frequency, PaymentFrequency::Monthly);
    assert_eq!(form.validate(), Err("Select a product."));

    form.product_id = "1".to_owned();
    assert_eq!(form.validate(), Err("Premium amount must be greater than zero."));

    form.premium_amount = 500.0;
    assert_eq!(form.validate(), Err("Sum assured must be greater than zero."));

    form.sum_assured = 100_000.0;
    assert_eq!(form.validate(), Ok(()));
}

#[test]
fn form_prefills_from_policy() {
    let policy = mock::policy_by_id("2");
    let form = PolicyForm::from_policy(&policy);
    assert_eq!(form.product_id, "2");
    let update = form.to_update();
    assert_eq!(update.product_id.as_deref(), Some("2"));
    assert_eq!(update.premium_amount, Some(policy.premium_amount));
}

#[test]
fn search_matches_number_holder_and_product() {
    let page = PoliciesPage { policies: mock::policies(), ..PoliciesPage::default() };
    assert_eq!(page.search("").len(), 2);
    assert_eq!(page.search("pol-2024-0002").len(), 1);
    assert_eq!(page.search("cynthia").len(), 2);
    assert_eq!(page.search("boda").len(), 1);
    assert!(page.search("zzz").is_empty());
}

// =============================================================================
// fetch and mutations
// =============================================================================

#[tokio::test]
async fn fetch_loads_policies_and_products() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (client, _) = test_client(&spawn(remote(calls.clone())).await, Some("abc123"));
    let mut page = PoliciesPage::new(None);

    page.fetch(&client).await;

    assert_eq!(page.policies.len(), 2);
    assert_eq!(page.products.len(), 2);
    assert_eq!(page.error, None);
    assert!(!page.loading);
    assert_eq!(page.product_name(&page.policies[0]), Some("Family Funeral Cover"));
}

#[tokio::test]
async fn fetch_failure_empties_lists() {
    let (client, _) = test_client(&closed_url().await, Some("abc123"));
    let mut page = PoliciesPage { policies: mock::policies(), ..PoliciesPage::default() };

    page.fetch(&client).await;

    assert!(page.policies.is_empty());
    assert!(page.products.is_empty());
    assert_eq!(page.error.as_deref(), Some(LOAD_FAILED));
}

#[tokio::test]
async fn status_update_refetches_on_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (client, _) = test_client(&spawn(remote(calls.clone())).await, Some("abc123"));
    let mut page = PoliciesPage::new(None);
    page.fetch(&client).await;

    page.update_status(&client, "2", PolicyStatus::Active).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(page.error, None);
}

#[tokio::test]
async fn status_update_on_missing_policy_shows_not_found() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (client, handler) = test_client(&spawn(remote(calls.clone())).await, Some("abc123"));
    let mut page = PoliciesPage::new(Some(PolicyStatus::Pending));

    let error = page.update_status(&client, "42", PolicyStatus::Active).await.unwrap_err();

    assert!(error.is_not_found());
    assert_eq!(page.error.as_deref(), Some(NOT_FOUND));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn failed_delete_keeps_list_and_reports() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (client, _) = test_client(&spawn(remote(calls.clone())).await, Some("abc123"));
    let mut page = PoliciesPage::new(None);
    page.fetch(&client).await;

    assert!(page.delete(&client, "1").await.is_err());

    assert_eq!(page.policies.len(), 2);
    assert_eq!(page.error.as_deref(), Some(DELETE_FAILED));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
