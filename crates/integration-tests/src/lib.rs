//! Integration tests for Shoebox.
//!
//! The tests in `tests/` run the real catalog client, file store, and
//! cart service against a stub catalog server. This crate provides the
//! shared plumbing: catalog fixtures, an ephemeral-port stub server, and
//! unique temp directories for file stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::path::PathBuf;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

/// Product and stock fixtures served by the stub catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogFixtures {
    products: HashMap<i32, Value>,
    stock: HashMap<i32, u32>,
}

impl CatalogFixtures {
    /// Add a product with its stock count.
    #[must_use]
    pub fn with_product(mut self, id: i32, title: &str, price: f64, stock: u32) -> Self {
        self.products.insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://cdn.example.com/{id}.jpg"),
            }),
        );
        self.stock.insert(id, stock);
        self
    }
}

async fn get_product(
    State(fixtures): State<CatalogFixtures>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    fixtures
        .products
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_stock(
    State(fixtures): State<CatalogFixtures>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    fixtures
        .stock
        .get(&id)
        .map(|amount| Json(json!({ "id": id, "amount": amount })))
        .ok_or(StatusCode::NOT_FOUND)
}

/// Start a stub catalog server on an ephemeral port.
///
/// Returns the base URL to hand to a `CatalogClient`. The server task
/// lives until the test runtime shuts down.
///
/// # Panics
///
/// Panics if the listener cannot bind to a loopback port.
pub async fn start_stub_catalog(fixtures: CatalogFixtures) -> String {
    let app = Router::new()
        .route("/products/{id}", get(get_product))
        .route("/stock/{id}", get(get_stock))
        .with_state(fixtures);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub catalog listener");
    let addr = listener.local_addr().expect("Stub catalog has no address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Stub catalog server error");
    });

    format!("http://{addr}")
}

/// Unique temporary directory for a file store.
#[must_use]
pub fn temp_storage_dir() -> PathBuf {
    std::env::temp_dir().join(format!("shoebox-it-{}", uuid::Uuid::new_v4()))
}
