//! Cart service: the single owner of the cart state.
//!
//! Every mutation follows the same shape: validate against a fresh stock
//! snapshot, build the next item list, persist it, and only then replace
//! the in-memory list. A failure at any step leaves the cart exactly as
//! it was and surfaces one user-facing message through the notifier.
//!
//! Operations hold the cart mutex for their full duration, so concurrent
//! mutations (e.g., rapid double-clicks) serialise instead of racing.

use tokio::sync::Mutex;
use tracing::instrument;

use shoebox_core::ProductId;

use crate::catalog::{Catalog, CatalogError};
use crate::models::CartItem;
use crate::models::cart::codec;
use crate::notify::Notifier;
use crate::storage::{CART_KEY, CartStorage, StorageError};

/// User-facing message for a requested quantity above available stock.
pub const MSG_OUT_OF_STOCK: &str = "requested quantity unavailable";
/// User-facing message for a failed add operation.
pub const MSG_ADD_FAILED: &str = "failed to add product";
/// User-facing message for a failed remove operation.
pub const MSG_REMOVE_FAILED: &str = "failed to remove product";
/// User-facing message for a failed quantity change.
pub const MSG_UPDATE_FAILED: &str = "failed to change quantity";

/// Errors raised by cart operations.
///
/// These never escape as a crash: the service reports the user-facing
/// message before returning, and the route layer renders the error as a
/// toast while the cart stays unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Requested quantity exceeds the current stock snapshot.
    #[error("requested quantity exceeds available stock")]
    OutOfStock,

    /// Requested amount is below 1 (items are removed, not zeroed).
    #[error("amount must be at least 1")]
    InvalidAmount,

    /// No cart item exists for this product.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// Catalog lookup failed while adding a product.
    #[error("add lookup failed: {0}")]
    AddFailed(#[source] CatalogError),

    /// Stock lookup failed while changing a quantity.
    #[error("stock lookup failed: {0}")]
    UpdateFailed(#[source] CatalogError),

    /// The new cart snapshot could not be persisted.
    #[error("cart persistence failed: {0}")]
    Storage(#[from] StorageError),
}

/// Shopping cart state manager.
///
/// Generic over the catalog, storage, and notification seams so tests
/// can substitute fixtures for all three collaborators.
pub struct CartService<C, S, N> {
    catalog: C,
    storage: S,
    notifier: N,
    items: Mutex<Vec<CartItem>>,
}

impl<C, S, N> CartService<C, S, N>
where
    C: Catalog,
    S: CartStorage,
    N: Notifier,
{
    /// Create the service, restoring the cart from storage.
    ///
    /// An absent or malformed snapshot yields an empty cart.
    pub fn new(catalog: C, storage: S, notifier: N) -> Self {
        let items = codec::decode(storage.load(CART_KEY).as_deref());
        Self {
            catalog,
            storage,
            notifier,
            items: Mutex::new(items),
        }
    }

    /// Snapshot of the current cart, in insertion order.
    pub async fn items(&self) -> Vec<CartItem> {
        self.items.lock().await.clone()
    }

    /// Add one unit of a product to the cart.
    ///
    /// Fetches the current stock snapshot and the product metadata, then
    /// either increments the existing line (if stock allows) or appends
    /// a new line with amount 1.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if the line is already at the stock ceiling
    /// - [`CartError::AddFailed`] if either lookup fails
    /// - [`CartError::Storage`] if the new snapshot cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Vec<CartItem>, CartError> {
        let mut items = self.items.lock().await;

        let stock = match self.catalog.get_stock(product_id).await {
            Ok(stock) => stock,
            Err(e) => return Err(self.fail(MSG_ADD_FAILED, CartError::AddFailed(e))),
        };
        let product = match self.catalog.get_product(product_id).await {
            Ok(product) => product,
            Err(e) => return Err(self.fail(MSG_ADD_FAILED, CartError::AddFailed(e))),
        };

        let mut next = items.clone();
        if let Some(item) = next.iter_mut().find(|item| item.id == product_id) {
            if item.amount >= stock.amount {
                return Err(self.fail(MSG_OUT_OF_STOCK, CartError::OutOfStock));
            }
            item.amount += 1;
        } else {
            next.push(CartItem::from(product));
        }

        self.commit(&mut items, next, MSG_ADD_FAILED)
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] if no line exists for this product
    /// - [`CartError::Storage`] if the new snapshot cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Vec<CartItem>, CartError> {
        let mut items = self.items.lock().await;

        if !items.iter().any(|item| item.id == product_id) {
            return Err(self.fail(MSG_REMOVE_FAILED, CartError::NotFound(product_id)));
        }

        let next: Vec<CartItem> = items
            .iter()
            .filter(|item| item.id != product_id)
            .cloned()
            .collect();

        self.commit(&mut items, next, MSG_REMOVE_FAILED)
    }

    /// Set a product's quantity to an exact amount.
    ///
    /// The amount must be at least 1 and within the current stock
    /// snapshot; the line must already exist.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidAmount`] if `amount < 1`
    /// - [`CartError::UpdateFailed`] if the stock lookup fails
    /// - [`CartError::OutOfStock`] if `amount` exceeds available stock
    /// - [`CartError::NotFound`] if no line exists for this product
    /// - [`CartError::Storage`] if the new snapshot cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id, amount = amount))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Vec<CartItem>, CartError> {
        if amount < 1 {
            return Err(self.fail(MSG_UPDATE_FAILED, CartError::InvalidAmount));
        }

        let mut items = self.items.lock().await;

        let stock = match self.catalog.get_stock(product_id).await {
            Ok(stock) => stock,
            Err(e) => return Err(self.fail(MSG_UPDATE_FAILED, CartError::UpdateFailed(e))),
        };

        let requested = match u32::try_from(amount) {
            Ok(requested) if requested <= stock.amount => requested,
            _ => return Err(self.fail(MSG_OUT_OF_STOCK, CartError::OutOfStock)),
        };

        let mut next = items.clone();
        let Some(item) = next.iter_mut().find(|item| item.id == product_id) else {
            return Err(self.fail(MSG_UPDATE_FAILED, CartError::NotFound(product_id)));
        };
        item.amount = requested;

        self.commit(&mut items, next, MSG_UPDATE_FAILED)
    }

    /// Report a user-facing message and pass the error through.
    fn fail(&self, message: &'static str, err: CartError) -> CartError {
        self.notifier.report(message);
        err
    }

    /// Persist `next` and make it the current state.
    ///
    /// The in-memory list is only replaced once the snapshot is on disk,
    /// so a storage failure is a no-op on the observable cart.
    fn commit(
        &self,
        items: &mut Vec<CartItem>,
        next: Vec<CartItem>,
        failure_message: &'static str,
    ) -> Result<Vec<CartItem>, CartError> {
        match self.persist(&next) {
            Ok(()) => {
                *items = next;
                Ok(items.clone())
            }
            Err(e) => Err(self.fail(failure_message, CartError::Storage(e))),
        }
    }

    fn persist(&self, items: &[CartItem]) -> Result<(), StorageError> {
        let encoded = codec::encode(items)?;
        self.storage.save(CART_KEY, &encoded)
    }
}
