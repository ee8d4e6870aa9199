//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::products::ProductCardView;

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// First products of the catalog, in catalog order.
    pub featured_products: Vec<ProductCardView>,
    /// All category names for the category tiles.
    pub categories: Vec<String>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let (products, categories) =
        tokio::try_join!(state.catalog().get_products(), state.catalog().get_categories())?;

    let featured_products = products
        .iter()
        .take(FEATURED_COUNT)
        .map(ProductCardView::from)
        .collect();

    Ok(HomeTemplate {
        featured_products,
        categories,
    })
}
