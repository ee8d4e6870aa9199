//! Product route handlers.
//!
//! The listing page runs the full catalog through the filter and sort
//! pipeline on every request; the product list itself comes from the cached
//! catalog client.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use tmi_store_core::types::{Product, ProductId};
use tmi_store_core::{CategoryFilter, FilterSpec, SortOption, filter_products, sort_products};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::format_price;

/// Product card display data for grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub category: String,
    pub image: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            title: product.title.clone(),
            price: format_price(product.price),
            category: product.display_category().to_string(),
            image: product.image.clone(),
        }
    }
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating_rate: f64,
    pub rating_count: u32,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            title: product.title.clone(),
            price: format_price(product.price),
            description: product.description.clone(),
            category: product.display_category().to_string(),
            image: product.image.clone(),
            rating_rate: product.rating.rate,
            rating_count: product.rating.count,
        }
    }
}

/// A customer review for the product detail page.
#[derive(Clone)]
pub struct ReviewView {
    pub author: String,
    pub rating: u8,
    pub stars: String,
    pub date: String,
    pub title: String,
    pub content: String,
    pub helpful: u32,
    pub verified: bool,
}

/// One row of the rating distribution chart.
#[derive(Clone)]
pub struct RatingBar {
    pub star: u8,
    pub count: usize,
    pub percentage: usize,
}

/// Aggregate figures for the review summary block.
#[derive(Clone)]
pub struct ReviewSummary {
    pub average: String,
    pub stars: String,
    pub count: usize,
    pub distribution: Vec<RatingBar>,
}

fn star_row(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn review(
    author: &str,
    rating: u8,
    date: &str,
    title: &str,
    content: &str,
    helpful: u32,
) -> ReviewView {
    ReviewView {
        author: author.to_string(),
        rating,
        stars: star_row(rating),
        date: date.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        helpful,
        verified: true,
    }
}

/// Static reviews per product (can be replaced with dynamic data later).
fn reviews_for(id: ProductId) -> Vec<ReviewView> {
    match id.as_i64() {
        1 => vec![
            review(
                "Sarah M.",
                5,
                "October 15, 2024",
                "Absolutely love it!",
                "The quality exceeded my expectations. Fits perfectly and looks exactly like the pictures. Will definitely order again!",
                24,
            ),
            review(
                "Michael R.",
                4,
                "October 10, 2024",
                "Great product",
                "Very satisfied with this purchase. Good value for money. Only minor issue was shipping took a bit longer than expected.",
                12,
            ),
            review(
                "Jessica L.",
                5,
                "October 5, 2024",
                "Highly recommend!",
                "This is my third purchase from this store and I'm never disappointed. Quality is consistent and customer service is excellent.",
                18,
            ),
        ],
        _ => vec![
            review(
                "Alex T.",
                5,
                "October 18, 2024",
                "Perfect!",
                "Exactly what I was looking for. Great quality and fast shipping. Would definitely recommend to friends and family.",
                15,
            ),
            review(
                "Emma W.",
                4,
                "October 12, 2024",
                "Very pleased",
                "Good product overall. The quality is solid and it arrived well-packaged. One star off because it's slightly smaller than expected.",
                8,
            ),
        ],
    }
}

fn summarize_reviews(reviews: &[ReviewView]) -> ReviewSummary {
    let count = reviews.len();
    #[allow(clippy::cast_precision_loss)]
    let average = if count == 0 {
        0.0
    } else {
        reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / count as f64
    };
    let distribution = (1..=5u8)
        .rev()
        .map(|star| {
            let star_count = reviews.iter().filter(|r| r.rating == star).count();
            RatingBar {
                star,
                count: star_count,
                percentage: if count == 0 {
                    0
                } else {
                    star_count * 100 / count
                },
            }
        })
        .collect();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = average.round() as u8;

    ReviewSummary {
        average: format!("{average:.1}"),
        stars: star_row(rounded),
        count,
        distribution,
    }
}

/// Listing filter and sort query parameters.
///
/// Everything arrives as optional strings; values that fail to parse fall
/// back to the unrestricted default rather than erroring.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ProductsQuery {
    fn filter_spec(&self) -> FilterSpec {
        let default = FilterSpec::default();
        FilterSpec {
            category: CategoryFilter::from_param(self.category.as_deref()),
            min_price: self
                .min_price
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.min_price),
            max_price: self
                .max_price
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_price),
            search: self.search.clone().unwrap_or_default(),
        }
    }

    fn sort_option(&self) -> SortOption {
        self.sort
            .as_deref()
            .map_or(SortOption::Default, parse_sort)
    }
}

/// Map a sort query value to a `SortOption`, defaulting unknown values.
fn parse_sort(value: &str) -> SortOption {
    match value {
        "price-asc" => SortOption::PriceAsc,
        "price-desc" => SortOption::PriceDesc,
        "name-asc" => SortOption::NameAsc,
        "name-desc" => SortOption::NameDesc,
        _ => SortOption::Default,
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<String>,
    pub selected_category: String,
    pub min_price: String,
    pub max_price: String,
    pub search: String,
    pub sort: String,
    pub result_count: usize,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub related_products: Vec<ProductCardView>,
    pub in_cart: u32,
    pub reviews: Vec<ReviewView>,
    pub review_summary: ReviewSummary,
}

/// Display the product listing page with filters and sorting applied.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<impl IntoResponse> {
    let (products, categories) =
        tokio::try_join!(state.catalog().get_products(), state.catalog().get_categories())?;

    let filtered = filter_products(&products, &query.filter_spec());
    let sorted = sort_products(&filtered, query.sort_option());
    let cards: Vec<ProductCardView> = sorted.iter().map(ProductCardView::from).collect();

    Ok(ProductsIndexTemplate {
        result_count: cards.len(),
        products: cards,
        categories,
        selected_category: query.category.unwrap_or_else(|| "all".to_string()),
        min_price: query.min_price.unwrap_or_default(),
        max_price: query.max_price.unwrap_or_default(),
        search: query.search.unwrap_or_default(),
        sort: query.sort.unwrap_or_default(),
    })
}

/// Display a product detail page.
#[instrument(skip(state), fields(id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let id = ProductId::new(id);
    let product = state.catalog().get_product(id).await?;

    // Related products share the category; losing them degrades the page
    // but never fails it.
    let related_products = match state
        .catalog()
        .get_products_by_category(&product.category)
        .await
    {
        Ok(products) => products
            .iter()
            .filter(|p| p.id != id)
            .take(4)
            .map(ProductCardView::from)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch related products");
            Vec::new()
        }
    };

    let in_cart = state.cart().state().quantity_of(id);
    let reviews = reviews_for(id);
    let review_summary = summarize_reviews(&reviews);

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(&product),
        related_products,
        in_cart,
        reviews,
        review_summary,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_sort_known_values() {
        assert_eq!(parse_sort("price-asc"), SortOption::PriceAsc);
        assert_eq!(parse_sort("price-desc"), SortOption::PriceDesc);
        assert_eq!(parse_sort("name-asc"), SortOption::NameAsc);
        assert_eq!(parse_sort("name-desc"), SortOption::NameDesc);
    }

    #[test]
    fn test_parse_sort_unknown_falls_back_to_default() {
        assert_eq!(parse_sort("rating"), SortOption::Default);
        assert_eq!(parse_sort(""), SortOption::Default);
    }

    #[test]
    fn test_filter_spec_from_query() {
        let query = ProductsQuery {
            category: Some("jewelery".to_string()),
            min_price: Some("10".to_string()),
            max_price: Some("not-a-number".to_string()),
            search: Some("gold".to_string()),
            sort: None,
        };
        let spec = query.filter_spec();
        assert_eq!(spec.category, CategoryFilter::Only("jewelery".to_string()));
        assert_eq!(spec.min_price, Decimal::from(10));
        // Unparseable bounds fall back to unrestricted.
        assert_eq!(spec.max_price, Decimal::MAX);
        assert_eq!(spec.search, "gold");
    }

    #[test]
    fn test_star_row_pads_to_five() {
        assert_eq!(star_row(4), "★★★★☆");
        assert_eq!(star_row(5), "★★★★★");
    }

    #[test]
    fn test_reviews_for_product_one() {
        let reviews = reviews_for(ProductId::new(1));
        assert_eq!(reviews.len(), 3);
        assert_eq!(reviews[0].author, "Sarah M.");
        assert_eq!(reviews[1].author, "Michael R.");
        assert_eq!(reviews[2].author, "Jessica L.");
        assert!(reviews.iter().all(|r| r.verified));
    }

    #[test]
    fn test_reviews_fall_back_to_defaults() {
        let reviews = reviews_for(ProductId::new(999));
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].author, "Alex T.");
        assert_eq!(reviews[1].rating, 4);
    }

    #[test]
    fn test_review_summary_for_product_one() {
        let summary = summarize_reviews(&reviews_for(ProductId::new(1)));
        assert_eq!(summary.average, "4.7");
        assert_eq!(summary.count, 3);
        assert_eq!(summary.stars, "★★★★★");
        let five = &summary.distribution[0];
        assert_eq!((five.star, five.count, five.percentage), (5, 2, 66));
        let four = &summary.distribution[1];
        assert_eq!((four.star, four.count), (4, 1));
        assert!(summary.distribution[2..].iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_products_index_echoes_price_bounds() {
        let template = ProductsIndexTemplate {
            products: Vec::new(),
            categories: Vec::new(),
            selected_category: "all".to_string(),
            min_price: "10".to_string(),
            max_price: "50".to_string(),
            search: String::new(),
            sort: String::new(),
            result_count: 0,
        };
        let html = template.render().unwrap();
        assert!(html.contains(r#"name="min_price" placeholder="Min price" min="0" step="0.01" value="10""#));
        assert!(html.contains(r#"name="max_price" placeholder="Max price" min="0" step="0.01" value="50""#));
    }

    #[test]
    fn test_filter_spec_defaults_when_absent() {
        let query = ProductsQuery {
            category: None,
            min_price: None,
            max_price: None,
            search: None,
            sort: None,
        };
        assert_eq!(query.filter_spec(), FilterSpec::default());
        assert_eq!(query.sort_option(), SortOption::Default);
    }
}
