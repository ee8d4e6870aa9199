//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (filter + sort)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Set line quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/increment         - Bump quantity by one (returns cart_items fragment)
//! POST /cart/decrement         - Drop quantity by one, floor 1 (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Order summary dead end
//!
//! # Search
//! GET  /search/suggest         - Search suggestions fragment (HTMX)
//!
//! # Pages
//! GET  /about /faq /privacy /terms - Markdown-backed static pages
//! ```

pub mod cart;
pub mod home;
pub mod pages;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use rust_decimal::Decimal;

use crate::error::AppError;
use crate::state::AppState;

/// Format a decimal amount as a display price string.
pub(crate) fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Fallback handler for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("page".to_string())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout summary
        .route("/checkout", get(cart::checkout))
        // Search suggestions (HTMX)
        .route("/search/suggest", get(search::suggest))
        // Static content pages
        .route("/about", get(pages::about))
        .route("/faq", get(pages::faq))
        .route("/privacy", get(pages::privacy))
        .route("/terms", get(pages::terms))
}
