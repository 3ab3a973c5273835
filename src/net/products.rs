//! Products resource: `/products` CRUD plus activation toggling.

use reqwest::Method;
use serde::Serialize;

use super::client::ApiClient;
use super::error::ApiError;
use super::mock;
use super::types::{CreateProductRequest, Product, ProductType, UpdateProductRequest};

#[derive(Serialize)]
struct ProductFilter {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    product_type: Option<ProductType>,
}

pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    #[must_use]
    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { client: self }
    }
}

impl ProductsApi<'_> {
    /// `GET /products?type`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn list(&self, product_type: Option<ProductType>) -> Result<Vec<Product>, ApiError> {
        let filter = ProductFilter { product_type };
        let result = self
            .client
            .data(self.client.call(Method::GET, "/products").query(&filter))
            .await;
        self.client.or_mock("products", result, || mock::products(product_type))
    }

    /// `GET /products/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &str) -> Result<Product, ApiError> {
        let result = self
            .client
            .data(self.client.call(Method::GET, &format!("/products/{id}")))
            .await;
        self.client.or_mock("products", result, || mock::product_by_id(id))
    }

    /// `POST /products`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the server refuses the definition.
    pub async fn create(&self, body: &CreateProductRequest) -> Result<Product, ApiError> {
        self.client
            .data(self.client.call(Method::POST, "/products").json(body))
            .await
    }

    /// `PUT /products/:id`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn update(&self, id: &str, body: &UpdateProductRequest) -> Result<Product, ApiError> {
        self.client
            .data(self.client.call(Method::PUT, &format!("/products/{id}")).json(body))
            .await
    }

    /// `DELETE /products/:id`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .empty(self.client.call(Method::DELETE, &format!("/products/{id}")))
            .await
    }

    /// `PATCH /products/:id/toggle-status`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for transport or status failures.
    pub async fn toggle_status(&self, id: &str) -> Result<Product, ApiError> {
        self.client
            .data(self.client.call(Method::PATCH, &format!("/products/{id}/toggle-status")))
            .await
    }
}
