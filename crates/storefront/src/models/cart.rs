//! Cart line items, the persistence codec, and the total calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shoebox_core::{CurrencyCode, Price, ProductId};

use crate::catalog::Product;

/// A product plus requested quantity in the cart.
///
/// Invariants maintained by the cart service: at most one item per
/// `ProductId`, `amount >= 1`, and `amount` never exceeds the stock
/// snapshot observed by the mutation that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    /// Serialized as a string so persisted snapshots round-trip exactly.
    pub price: Decimal,
    pub image: String,
    pub amount: u32,
}

impl From<Product> for CartItem {
    /// A freshly added product enters the cart with amount 1.
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount: 1,
        }
    }
}

/// Sum of price x amount over all items, as a displayable price.
///
/// Pure function: the same item list always produces the same total.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Price {
    let total = items
        .iter()
        .map(|item| item.price * Decimal::from(item.amount))
        .sum();
    Price::new(total, CurrencyCode::USD)
}

/// Cart snapshot codec.
///
/// Encodes the ordered item list to a JSON string and back. Decoding is
/// forgiving: absent or malformed input yields an empty cart so a broken
/// snapshot never prevents startup.
pub mod codec {
    use super::CartItem;

    /// Encode a cart snapshot for storage.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn encode(items: &[CartItem]) -> Result<String, serde_json::Error> {
        serde_json::to_string(items)
    }

    /// Decode a stored cart snapshot, falling back to an empty cart.
    #[must_use]
    pub fn decode(raw: Option<&str>) -> Vec<CartItem> {
        let Some(raw) = raw else {
            return Vec::new();
        };

        match serde_json::from_str(raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed cart snapshot");
                Vec::new()
            }
        }
    }
}
