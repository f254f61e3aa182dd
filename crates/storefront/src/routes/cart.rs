//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page
//! reloads. Failures never escape as error pages: each one becomes a
//! toast fragment carrying the operation's user-facing message while
//! the cart stays as it was.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use shoebox_core::{CurrencyCode, Price, ProductId};

use crate::models::CartItem;
use crate::models::cart::subtotal;
use crate::services::cart::{
    CartError, MSG_ADD_FAILED, MSG_OUT_OF_STOCK, MSG_REMOVE_FAILED, MSG_UPDATE_FAILED,
};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub amount: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let line_total = item.price * Decimal::from(item.amount);
        Self {
            id: item.id.as_i32(),
            title: item.title.clone(),
            amount: item.amount,
            price: Price::new(item.price, CurrencyCode::USD).display(),
            line_price: Price::new(line_total, CurrencyCode::USD).display(),
            image: item.image.clone(),
        }
    }
}

impl CartView {
    /// Build display data from a cart snapshot.
    #[must_use]
    pub fn from_items(items: &[CartItem]) -> Self {
        Self {
            items: items.iter().map(CartItemView::from).collect(),
            total: subtotal(items).display(),
            item_count: items.iter().map(|item| item.amount).sum(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub amount: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Error toast fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub message: &'static str,
}

/// Map a cart error to a response status.
fn status_for(err: &CartError) -> StatusCode {
    match err {
        CartError::OutOfStock => StatusCode::CONFLICT,
        CartError::InvalidAmount => StatusCode::UNPROCESSABLE_ENTITY,
        CartError::NotFound(_) => StatusCode::NOT_FOUND,
        CartError::AddFailed(_) | CartError::UpdateFailed(_) => StatusCode::BAD_GATEWAY,
        CartError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a cart error as a toast fragment.
///
/// Out-of-stock keeps its explicit message; everything else collapses
/// to the operation's generic failure line. The HTMX retarget headers
/// steer the fragment into the toast region instead of the caller's
/// own swap target.
fn error_toast(err: &CartError, fallback: &'static str) -> Response {
    let message = match err {
        CartError::OutOfStock => MSG_OUT_OF_STOCK,
        _ => fallback,
    };
    (
        status_for(err),
        AppendHeaders([("HX-Retarget", "#toast"), ("HX-Reswap", "innerHTML")]),
        ToastTemplate { message },
    )
        .into_response()
}

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartShowTemplate {
    let items = state.cart().items().await;
    CartShowTemplate {
        cart: CartView::from_items(&items),
    }
}

/// Add one unit of a product to the cart (HTMX).
///
/// Returns the cart count badge with an HTMX trigger so other fragments
/// refresh themselves.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    match state.cart().add_product(ProductId::new(form.product_id)).await {
        Ok(items) => {
            let count = items.iter().map(|item| item.amount).sum();
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate { count },
            )
                .into_response()
        }
        Err(err) => error_toast(&err, MSG_ADD_FAILED),
    }
}

/// Set a cart item's quantity (HTMX).
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    match state
        .cart()
        .update_product_amount(ProductId::new(form.product_id), form.amount)
        .await
    {
        Ok(items) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from_items(&items),
            },
        )
            .into_response(),
        Err(err) => error_toast(&err, MSG_UPDATE_FAILED),
    }
}

/// Remove an item from the cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    match state
        .cart()
        .remove_product(ProductId::new(form.product_id))
        .await
    {
        Ok(items) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from_items(&items),
            },
        )
            .into_response(),
        Err(err) => error_toast(&err, MSG_REMOVE_FAILED),
    }
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    let items = state.cart().items().await;
    CartCountTemplate {
        count: items.iter().map(|item| item.amount).sum(),
    }
}
