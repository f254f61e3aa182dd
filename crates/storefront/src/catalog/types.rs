//! Wire types for the catalog REST API.

use rust_decimal::Decimal;
use serde::Deserialize;

use shoebox_core::ProductId;

/// Product metadata as returned by `GET /products/{id}`.
///
/// Immutable once fetched; the catalog sends `price` as a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
}

/// Available-quantity snapshot as returned by `GET /stock/{id}`.
///
/// Fetched fresh for every mutating cart operation - never cached, so
/// stock checks always see the catalog's current count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StockInfo {
    pub amount: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_numeric_price() {
        let json = r#"{"id":1,"title":"Sneaker","price":179.9,"image":"https://cdn.example.com/1.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.title, "Sneaker");
        assert_eq!(product.price, "179.9".parse().unwrap());
    }

    #[test]
    fn test_stock_info_ignores_extra_fields() {
        // json-server style backends echo the id alongside the amount
        let stock: StockInfo = serde_json::from_str(r#"{"id":1,"amount":5}"#).unwrap();
        assert_eq!(stock.amount, 5);
    }
}
