//! Catalog REST API client.
//!
//! # Architecture
//!
//! - The catalog is the source of truth for products and stock - NO local
//!   sync, direct API calls
//! - Lookups are deliberately uncached: every mutating cart operation
//!   re-fetches the stock snapshot so availability checks are fresh
//!
//! # Endpoints
//!
//! - `GET /products/{id}` - product metadata (id, title, price, image)
//! - `GET /stock/{id}` - available quantity snapshot
//!
//! # Example
//!
//! ```rust,ignore
//! use shoebox_storefront::catalog::{Catalog, CatalogClient};
//!
//! let client = CatalogClient::new(&config.catalog_url);
//! let stock = client.get_stock(ProductId::new(1)).await?;
//! let product = client.get_product(ProductId::new(1)).await?;
//! ```

pub mod types;

pub use types::{Product, StockInfo};

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use shoebox_core::ProductId;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog returned an unexpected status code.
    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetch-by-id capability over the catalog.
///
/// The cart service depends on this seam rather than on the concrete
/// HTTP client, so tests can substitute fixture data.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch product metadata.
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Fetch the current stock snapshot for a product.
    async fn get_stock(&self, id: ProductId) -> Result<StockInfo, CatalogError>;
}

/// Client for the catalog REST API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client for the given base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Execute a GET request and deserialize the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{path}", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %response_text.chars().take(200).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                body = %response_text.chars().take(200).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_json(&format!("products/{id}")).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_stock(&self, id: ProductId) -> Result<StockInfo, CatalogError> {
        self.get_json(&format!("stock/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CatalogClient::new("http://localhost:3333/");
        assert_eq!(client.inner.base_url, "http://localhost:3333");
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::NotFound("products/9".to_string());
        assert_eq!(err.to_string(), "Not found: products/9");

        let err = CatalogError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Unexpected status: 500 Internal Server Error");
    }
}
