//! Catalog product types.
//!
//! Products are supplied by the external catalog API and are read-only to
//! this crate: nothing here mutates a `Product` after it has been fetched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A product as returned by the catalog API.
///
/// The serde shape matches the catalog's JSON records, so fetched payloads
/// and the persisted cart slot both round-trip through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price in the store currency. Always non-negative.
    pub price: Decimal,
    /// Long-form description.
    pub description: String,
    /// Category name (exact string, e.g. "electronics").
    pub category: String,
    /// Product image URL.
    pub image: String,
    /// Aggregate customer rating.
    pub rating: Rating,
}

/// Aggregate rating for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating, 0.0 to 5.0.
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

impl Product {
    /// The category label shown to customers.
    ///
    /// The upstream catalog spells one category "jewelery"; the storefront
    /// has always displayed it as "jewelry".
    #[must_use]
    pub fn display_category(&self) -> &str {
        if self.category == "jewelery" {
            "jewelry"
        } else {
            &self.category
        }
    }
}
