//! TMI Store Core - Cart state and catalog query logic.
//!
//! This crate provides the two state-bearing and computational pieces shared
//! by every TMI Store component:
//!
//! - [`cart`] - The cart store: line items, derived totals, and the persisted
//!   mirror behind the [`storage::CartStorage`] seam
//! - [`catalog`] - The pure filter/sort pipeline over a fetched product list
//!
//! # Architecture
//!
//! The core crate contains only types and logic - no I/O, no HTTP clients.
//! Persistence is abstracted behind the [`storage::CartStorage`] trait so the
//! crate can be used anywhere; the storefront binary supplies a file-backed
//! implementation.
//!
//! # Modules
//!
//! - [`types`] - `Product`, `Rating`, and newtype IDs
//! - [`cart`] - `CartStore` and its mutation intents
//! - [`catalog`] - `FilterSpec`, `SortOption`, and the query pipeline
//! - [`storage`] - The single key-value slot the cart mirrors into

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod storage;
pub mod types;

pub use cart::{CartLineItem, CartState, CartStore};
pub use catalog::{CategoryFilter, FilterSpec, SortOption, filter_products, search_products, sort_products};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use types::*;
