//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation goes through the shared `CartStore`, which recomputes
//! totals and persists the slot before the fragment is rendered.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use tmi_store_core::types::ProductId;
use tmi_store_core::{CartLineItem, CartState};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::format_price;

/// Orders above this subtotal ship for free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat shipping charge below the free threshold.
const FLAT_SHIPPING: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i64,
    pub title: String,
    pub category: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product.id.as_i64(),
            title: item.product.title.clone(),
            category: item.product.display_category().to_string(),
            image: item.product.image.clone(),
            quantity: item.quantity,
            price: format_price(item.product.price),
            line_total: format_price(item.product.price * Decimal::from(item.quantity)),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        let shipping = if state.is_empty() || state.total_amount > FREE_SHIPPING_THRESHOLD {
            Decimal::ZERO
        } else {
            FLAT_SHIPPING
        };
        Self {
            items: state.items.iter().map(CartItemView::from).collect(),
            item_count: state.total_items,
            subtotal: format_price(state.total_amount),
            shipping: if shipping.is_zero() {
                "FREE".to_string()
            } else {
                format_price(shipping)
            },
            total: format_price(state.total_amount + shipping),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub quantity: u32,
}

/// Single-line cart form data (remove, increment, decrement).
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Checkout summary page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/checkout.html")]
pub struct CheckoutTemplate {
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

fn items_fragment(state: &AppState) -> Response {
    let cart = CartView::from(state.cart().state());
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = CartView::from(state.cart().state());
    CartShowTemplate { cart }
}

/// Add a product to the cart (HTMX).
///
/// Fetches the product from the catalog so the stored line carries the full
/// snapshot, then returns the count badge with a trigger for other fragments.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get_product(ProductId::new(form.product_id))
        .await?;

    let count = {
        let mut cart = state.cart();
        // Adding is one-at-a-time in the store; a larger requested quantity
        // is just repeated adds.
        for _ in 0..form.quantity.unwrap_or(1).max(1) {
            cart.add_item(product.clone());
        }
        cart.state().total_items
    };

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Set a cart line's quantity (HTMX).
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    state
        .cart()
        .set_quantity(ProductId::new(form.product_id), form.quantity);
    items_fragment(&state)
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<CartLineForm>) -> Response {
    state.cart().remove_item(ProductId::new(form.product_id));
    items_fragment(&state)
}

/// Raise a line's quantity by one (HTMX).
#[instrument(skip(state))]
pub async fn increment(State(state): State<AppState>, Form(form): Form<CartLineForm>) -> Response {
    state.cart().increment(ProductId::new(form.product_id));
    items_fragment(&state)
}

/// Lower a line's quantity by one, never below one (HTMX).
#[instrument(skip(state))]
pub async fn decrement(State(state): State<AppState>, Form(form): Form<CartLineForm>) -> Response {
    state.cart().decrement(ProductId::new(form.product_id));
    items_fragment(&state)
}

/// Empty the cart and delete its slot (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Response {
    state.cart().clear();
    items_fragment(&state)
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.cart().state().total_items;
    CartCountTemplate { count }
}

/// Display the checkout summary.
///
/// There is no payment flow; an empty cart bounces back to the cart page.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Response {
    let cart = CartView::from(state.cart().state());
    if cart.items.is_empty() {
        return Redirect::to("/cart").into_response();
    }
    CheckoutTemplate { cart }.into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tmi_store_core::types::{Product, Rating};

    fn line(price: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            product: Product {
                id: ProductId::new(1),
                title: "Gold Ring".to_string(),
                price: price.parse().unwrap(),
                description: String::new(),
                category: "jewelery".to_string(),
                image: "https://example.test/1.jpg".to_string(),
                rating: Rating {
                    rate: 4.5,
                    count: 20,
                },
            },
            quantity,
        }
    }

    fn cart_state(lines: Vec<CartLineItem>) -> CartState {
        let total_items = lines.iter().map(|l| l.quantity).sum();
        let total_amount = lines
            .iter()
            .map(|l| l.product.price * Decimal::from(l.quantity))
            .sum();
        CartState {
            items: lines,
            total_items,
            total_amount,
        }
    }

    #[test]
    fn test_cart_view_free_shipping_above_threshold() {
        let view = CartView::from(&cart_state(vec![line("60.00", 1)]));
        assert_eq!(view.shipping, "FREE");
        assert_eq!(view.subtotal, "$60.00");
        assert_eq!(view.total, "$60.00");
    }

    #[test]
    fn test_cart_view_flat_shipping_below_threshold() {
        let view = CartView::from(&cart_state(vec![line("20.00", 2)]));
        assert_eq!(view.shipping, "$5.99");
        assert_eq!(view.total, "$45.99");
    }

    #[test]
    fn test_cart_view_threshold_is_exclusive() {
        // Exactly $50.00 still pays flat shipping.
        let view = CartView::from(&cart_state(vec![line("50.00", 1)]));
        assert_eq!(view.shipping, "$5.99");
    }

    #[test]
    fn test_cart_view_empty_cart_has_no_shipping() {
        let view = CartView::from(&cart_state(Vec::new()));
        assert_eq!(view.shipping, "FREE");
        assert_eq!(view.total, "$0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_cart_item_view_line_total() {
        let view = CartItemView::from(&line("109.95", 3));
        assert_eq!(view.price, "$109.95");
        assert_eq!(view.line_total, "$329.85");
        assert_eq!(view.category, "jewelry");
    }
}
