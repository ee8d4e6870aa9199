//! The catalog query pipeline: pure filter and sort over a fetched list.
//!
//! Nothing here owns state or performs I/O. Callers fetch the full product
//! list once per session, then re-run the pipeline whenever the list or the
//! filter/sort specification changes. The composition contract is filter
//! first, then sort; the two operations are independent and the order only
//! matters for performance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Category selector: everything, or one exact category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No category restriction.
    #[default]
    All,
    /// Exact-equality match on one category string.
    Only(String),
}

impl CategoryFilter {
    /// Build a filter from a user-supplied parameter, where absence or the
    /// literal "all" means no restriction.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("all") => Self::All,
            Some(category) => Self::Only(category.to_string()),
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == category,
        }
    }
}

/// The user-selected criteria narrowing the catalog view.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Category selector.
    pub category: CategoryFilter,
    /// Inclusive minimum price.
    pub min_price: Decimal,
    /// Inclusive maximum price.
    pub max_price: Decimal,
    /// Free-text query, matched case-insensitively as one whole substring
    /// against title, description, and category. Empty means no restriction.
    pub search: String,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            min_price: Decimal::ZERO,
            max_price: Decimal::MAX,
            search: String::new(),
        }
    }
}

impl FilterSpec {
    fn matches(&self, product: &Product) -> bool {
        if !self.category.matches(&product.category) {
            return false;
        }
        if product.price < self.min_price || product.price > self.max_price {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        // The whole query as one substring in any of the three fields. The
        // suggestion search below tokenizes instead; the two entry points
        // intentionally keep their different granularities.
        let query = self.search.to_lowercase();
        product.title.to_lowercase().contains(&query)
            || product.description.to_lowercase().contains(&query)
            || product.category.to_lowercase().contains(&query)
    }
}

/// How the visible product list is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order, unchanged.
    #[default]
    Default,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Title A to Z, case-insensitive.
    NameAsc,
    /// Title Z to A, case-insensitive.
    NameDesc,
}

/// Return the subsequence of `products` satisfying `spec`.
///
/// The filter is stable: surviving products keep their relative order.
#[must_use]
pub fn filter_products(products: &[Product], spec: &FilterSpec) -> Vec<Product> {
    products
        .iter()
        .filter(|product| spec.matches(product))
        .cloned()
        .collect()
}

/// Return a freshly ordered copy of `products`; the input is never mutated.
///
/// Price options compare numerically, name options compare titles folded to
/// lowercase. All sorts are stable, so ties keep input order. `Default`
/// returns the input order in a fresh sequence.
#[must_use]
pub fn sort_products(products: &[Product], option: SortOption) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match option {
        SortOption::Default => {}
        SortOption::PriceAsc => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOption::PriceDesc => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::NameAsc => {
            sorted.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }
        SortOption::NameDesc => {
            sorted.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()));
        }
    }
    sorted
}

/// Suggestion search: every whitespace-separated token must appear somewhere
/// in the product's title, description, or category (case-insensitive).
///
/// This is the navbar/search-box entry point and deliberately matches at a
/// different granularity than [`FilterSpec::matches`]. A blank query yields
/// no suggestions. At most `limit` products are returned, in catalog order.
#[must_use]
pub fn search_products(products: &[Product], query: &str, limit: usize) -> Vec<Product> {
    let tokens: Vec<String> = query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|product| {
            let text = format!(
                "{} {} {}",
                product.title, product.description, product.category
            )
            .to_lowercase();
            tokens.iter().all(|token| text.contains(token))
        })
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{ProductId, Rating};

    fn product(id: i64, title: &str, price: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: price.parse().unwrap(),
            description: format!("{title} description"),
            category: category.to_string(),
            image: format!("https://example.test/{id}.jpg"),
            rating: Rating {
                rate: 4.0,
                count: 10,
            },
        }
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_default_spec_is_identity() {
        let products = vec![
            product(1, "A", "10", "electronics"),
            product(2, "B", "30", "jewelery"),
        ];
        let filtered = filter_products(&products, &FilterSpec::default());
        assert_eq!(filtered, products);
    }

    #[test]
    fn test_price_range_filter() {
        let products = vec![
            product(1, "A", "10", "electronics"),
            product(2, "B", "30", "electronics"),
        ];
        let spec = FilterSpec {
            min_price: "15".parse().unwrap(),
            max_price: "100".parse().unwrap(),
            ..FilterSpec::default()
        };
        let filtered = filter_products(&products, &spec);
        assert_eq!(ids(&filtered), vec![2]);

        // Sorting a single survivor changes nothing.
        let sorted = sort_products(&filtered, SortOption::PriceDesc);
        assert_eq!(ids(&sorted), vec![2]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let products = vec![product(1, "A", "10", "electronics")];
        let spec = FilterSpec {
            min_price: "10".parse().unwrap(),
            max_price: "10".parse().unwrap(),
            ..FilterSpec::default()
        };
        assert_eq!(filter_products(&products, &spec).len(), 1);
    }

    #[test]
    fn test_category_filter_exact_match() {
        let products = vec![
            product(1, "A", "10", "electronics"),
            product(2, "B", "10", "jewelery"),
        ];
        let spec = FilterSpec {
            category: CategoryFilter::Only("jewelery".to_string()),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter_products(&products, &spec)), vec![2]);
    }

    #[test]
    fn test_category_from_param() {
        assert_eq!(CategoryFilter::from_param(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_param(Some("all")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_param(Some("jewelery")),
            CategoryFilter::Only("jewelery".to_string())
        );
    }

    #[test]
    fn test_search_whole_substring() {
        let products = vec![
            product(1, "Gold Ring", "10", "jewelery"),
            product(2, "Silver Ring", "10", "jewelery"),
        ];
        let spec = FilterSpec {
            search: "gold ring".to_string(),
            ..FilterSpec::default()
        };
        // The whole query must appear as one substring; "gold ring" is in
        // product 1's title only.
        assert_eq!(ids(&filter_products(&products, &spec)), vec![1]);

        let spec = FilterSpec {
            search: "ring gold".to_string(),
            ..FilterSpec::default()
        };
        assert!(filter_products(&products, &spec).is_empty());
    }

    #[test]
    fn test_search_matches_category_field() {
        let products = vec![product(1, "Ring", "10", "jewelery")];
        let spec = FilterSpec {
            search: "JEWEL".to_string(),
            ..FilterSpec::default()
        };
        assert_eq!(filter_products(&products, &spec).len(), 1);
    }

    #[test]
    fn test_filter_is_stable() {
        let products = vec![
            product(3, "C", "10", "electronics"),
            product(1, "A", "99", "electronics"),
            product(2, "B", "10", "electronics"),
        ];
        let spec = FilterSpec {
            max_price: "50".parse().unwrap(),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter_products(&products, &spec)), vec![3, 2]);
    }

    #[test]
    fn test_sort_by_price() {
        let products = vec![
            product(1, "A", "30", "x"),
            product(2, "B", "10", "x"),
            product(3, "C", "20", "x"),
        ];
        assert_eq!(
            ids(&sort_products(&products, SortOption::PriceAsc)),
            vec![2, 3, 1]
        );
        assert_eq!(
            ids(&sort_products(&products, SortOption::PriceDesc)),
            vec![1, 3, 2]
        );
    }

    #[test]
    fn test_sort_price_ties_keep_input_order() {
        let products = vec![
            product(1, "A", "10", "x"),
            product(2, "B", "10", "x"),
            product(3, "C", "5", "x"),
        ];
        assert_eq!(
            ids(&sort_products(&products, SortOption::PriceAsc)),
            vec![3, 1, 2]
        );
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let products = vec![
            product(1, "Banana", "1", "x"),
            product(2, "apple", "1", "x"),
        ];
        let sorted = sort_products(&products, SortOption::NameAsc);
        let titles: Vec<&str> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "Banana"]);

        let sorted = sort_products(&products, SortOption::NameDesc);
        let titles: Vec<&str> = sorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Banana", "apple"]);
    }

    #[test]
    fn test_sort_default_returns_fresh_copy_of_input_order() {
        let products = vec![product(2, "B", "9", "x"), product(1, "A", "1", "x")];
        let sorted = sort_products(&products, SortOption::Default);
        assert_eq!(sorted, products);
        // The input is untouched in all cases.
        assert_eq!(ids(&products), vec![2, 1]);
    }

    #[test]
    fn test_sort_option_kebab_case_serde() {
        let option: SortOption = serde_json::from_str("\"price-asc\"").unwrap();
        assert_eq!(option, SortOption::PriceAsc);
        assert_eq!(
            serde_json::to_string(&SortOption::NameDesc).unwrap(),
            "\"name-desc\""
        );
    }

    #[test]
    fn test_search_products_tokenized_and() {
        let products = vec![
            product(1, "Gold Dragon Ring", "10", "jewelery"),
            product(2, "Gold Bracelet", "10", "jewelery"),
        ];
        // Each token may match a different position, unlike the pipeline's
        // whole-substring search.
        assert_eq!(ids(&search_products(&products, "ring gold", 6)), vec![1]);
        assert_eq!(
            ids(&search_products(&products, "gold", 6)),
            vec![1, 2]
        );
        assert!(search_products(&products, "gold silver", 6).is_empty());
    }

    #[test]
    fn test_search_products_limit_and_blank_query() {
        let products: Vec<Product> = (1..=10)
            .map(|id| product(id, "Gadget", "5", "electronics"))
            .collect();
        assert_eq!(search_products(&products, "gadget", 6).len(), 6);
        assert!(search_products(&products, "   ", 6).is_empty());
        assert!(search_products(&products, "", 6).is_empty());
    }
}
