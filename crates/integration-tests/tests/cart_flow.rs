//! End-to-end cart flow against a stub catalog server.
//!
//! Exercises the real reqwest-backed catalog client, the file store, and
//! the cart service together, including persistence across service
//! restarts.

#![allow(clippy::unwrap_used)]

use shoebox_core::ProductId;
use shoebox_integration_tests::{CatalogFixtures, start_stub_catalog, temp_storage_dir};
use shoebox_storefront::catalog::CatalogClient;
use shoebox_storefront::notify::TracingNotifier;
use shoebox_storefront::services::{CartError, CartService};
use shoebox_storefront::storage::FileStore;

fn fixtures() -> CatalogFixtures {
    CatalogFixtures::default()
        .with_product(1, "Trail Runner", 179.9, 3)
        .with_product(2, "Canvas Low", 59.9, 2)
}

#[tokio::test]
async fn cart_flow_with_persistence_across_restarts() {
    let base_url = start_stub_catalog(fixtures()).await;
    let storage_dir = temp_storage_dir();

    let service = CartService::new(
        CatalogClient::new(&base_url),
        FileStore::new(storage_dir.clone()),
        TracingNotifier,
    );

    // Build up a cart: two of product 1, two of product 2
    service.add_product(ProductId::new(1)).await.unwrap();
    service.add_product(ProductId::new(1)).await.unwrap();
    service.add_product(ProductId::new(2)).await.unwrap();
    let items = service
        .update_product_amount(ProductId::new(2), 2)
        .await
        .unwrap();

    let amounts: Vec<(i32, u32)> = items
        .iter()
        .map(|item| (item.id.as_i32(), item.amount))
        .collect();
    assert_eq!(amounts, vec![(1, 2), (2, 2)]);

    // Product 2 is now at its stock ceiling
    let err = service.add_product(ProductId::new(2)).await.unwrap_err();
    assert!(matches!(err, CartError::OutOfStock));

    // Requesting more than stock allows never mutates the cart
    let err = service
        .update_product_amount(ProductId::new(1), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::OutOfStock));

    let items = service.remove_product(ProductId::new(1)).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, ProductId::new(2));
    assert_eq!(items[0].title, "Canvas Low");

    // A fresh service over the same store restores the persisted cart
    let restored = CartService::new(
        CatalogClient::new(&base_url),
        FileStore::new(storage_dir),
        TracingNotifier,
    );
    assert_eq!(restored.items().await, items);
}

#[tokio::test]
async fn unknown_product_fails_add_and_cart_stays_empty() {
    let base_url = start_stub_catalog(fixtures()).await;

    let service = CartService::new(
        CatalogClient::new(&base_url),
        FileStore::new(temp_storage_dir()),
        TracingNotifier,
    );

    let err = service.add_product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, CartError::AddFailed(_)));
    assert!(service.items().await.is_empty());
}

#[tokio::test]
async fn unreachable_catalog_fails_update() {
    // Port from the reserved range, nothing listens there
    let service = CartService::new(
        CatalogClient::new("http://127.0.0.1:1"),
        FileStore::new(temp_storage_dir()),
        TracingNotifier,
    );

    let err = service
        .update_product_amount(ProductId::new(1), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::UpdateFailed(_)));
}
