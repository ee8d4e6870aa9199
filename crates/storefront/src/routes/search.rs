//! Search suggestion route handler (HTMX).
//!
//! The navbar search box polls this endpoint as the user types. Suggestions
//! tokenize the query and require every token to match, unlike the listing
//! page's whole-substring filter.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use tmi_store_core::search_products;

use crate::state::AppState;

use super::products::ProductCardView;

/// Maximum number of suggestions shown under the search box.
const SUGGESTION_LIMIT: usize = 6;

/// Search suggestion query parameters.
#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

/// Search suggestions fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_suggestions.html")]
pub struct SearchSuggestionsTemplate {
    pub query: String,
    pub results: Vec<ProductCardView>,
}

/// Return suggestion fragments for the navbar search box.
///
/// A catalog outage degrades to an empty suggestion list; the search box is
/// not worth an error page.
#[instrument(skip(state))]
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> impl IntoResponse {
    let results = match state.catalog().get_products().await {
        Ok(products) => search_products(&products, &query.q, SUGGESTION_LIMIT)
            .iter()
            .map(ProductCardView::from)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch products for suggestions");
            Vec::new()
        }
    };

    SearchSuggestionsTemplate {
        query: query.q,
        results,
    }
}
