//! The cart store: line items, derived totals, and the persisted mirror.
//!
//! `CartStore` owns the authoritative in-memory cart and mirrors its line
//! items into a single [`CartStorage`] slot after every mutation. The two
//! derived totals are cache, never source of truth: they are recomputed from
//! the line items before any intent returns.
//!
//! # Failure semantics
//!
//! No intent here fails. Slot read/write problems are logged and swallowed;
//! the in-memory state stays authoritative for the session. Mutating a
//! product that is not in the cart is a silent no-op, never an error.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::CartStorage;
use crate::types::{Product, ProductId};

/// One (product, quantity) pair within the cart.
///
/// The cart holds at most one line item per distinct product id. Quantity is
/// always at least 1; removing a line is a distinct intent, not a
/// quantity-zero update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// The product as fetched from the catalog.
    pub product: Product,
    /// Units of this product in the cart, minimum 1.
    pub quantity: u32,
}

/// The cart: ordered line items plus derived totals.
///
/// Items keep the order in which their products were first added; order is
/// preserved across every mutation except removal. `total_items` and
/// `total_amount` are always exactly recomputable from `items`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    /// Line items in first-added order.
    pub items: Vec<CartLineItem>,
    /// Sum of quantities over all line items.
    pub total_items: u32,
    /// Sum of price x quantity over all line items.
    pub total_amount: Decimal,
}

impl CartState {
    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of the given product in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.product.id == product_id)
            .map_or(0, |item| item.quantity)
    }
}

/// Owns the cart state and its persisted mirror.
///
/// Every mutating intent recomputes the derived totals and then overwrites
/// the slot with the full item list; `clear` deletes the slot instead.
/// Intents return the updated state so callers can render synchronously.
pub struct CartStore {
    state: CartState,
    storage: Arc<dyn CartStorage>,
}

impl CartStore {
    /// Create an empty cart backed by the given slot.
    ///
    /// The slot is not read here; call [`hydrate`](Self::hydrate) once at
    /// startup to restore a previous session.
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        Self {
            state: CartState::default(),
            storage,
        }
    }

    /// The current cart state.
    #[must_use]
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Restore the cart from the persisted slot.
    ///
    /// An absent slot, an unreadable medium, or a malformed payload all
    /// degrade to an empty cart; nothing propagates to the caller. The slot
    /// itself is left untouched - hydrate never writes.
    pub fn hydrate(&mut self) -> &CartState {
        let items = match self.storage.read() {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<CartLineItem>>(&payload) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Malformed cart payload, starting empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read cart slot, starting empty: {e}");
                Vec::new()
            }
        };

        // Restore the minimum-quantity invariant for payloads written by
        // anything that didn't uphold it.
        self.state.items = items
            .into_iter()
            .map(|mut item| {
                item.quantity = item.quantity.max(1);
                item
            })
            .collect();
        self.recompute_totals();
        &self.state
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity goes up by 1;
    /// otherwise a new line item is appended, preserving first-added order.
    pub fn add_item(&mut self, product: Product) -> &CartState {
        if let Some(item) = self.find_mut(product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.state.items.push(CartLineItem {
                product,
                quantity: 1,
            });
        }
        self.finish_mutation()
    }

    /// Remove a product's line item. No-op if the product is not in the cart.
    pub fn remove_item(&mut self, product_id: ProductId) -> &CartState {
        self.state.items.retain(|item| item.product.id != product_id);
        self.finish_mutation()
    }

    /// Set a product's quantity, clamped to a minimum of 1.
    ///
    /// Zero or would-be-negative input never deletes the line item; removal
    /// is its own intent. No-op if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> &CartState {
        if let Some(item) = self.find_mut(product_id) {
            item.quantity = quantity.max(1);
        }
        self.finish_mutation()
    }

    /// Increase a product's quantity by 1. No-op if absent.
    pub fn increment(&mut self, product_id: ProductId) -> &CartState {
        if let Some(item) = self.find_mut(product_id) {
            item.quantity = item.quantity.saturating_add(1);
        }
        self.finish_mutation()
    }

    /// Decrease a product's quantity by 1, refusing to go below 1.
    ///
    /// At quantity 1 this is a no-op; it never removes the line item.
    /// No-op if absent.
    pub fn decrement(&mut self, product_id: ProductId) -> &CartState {
        if let Some(item) = self.find_mut(product_id)
            && item.quantity > 1
        {
            item.quantity -= 1;
        }
        self.finish_mutation()
    }

    /// Empty the cart and delete the persisted slot.
    pub fn clear(&mut self) -> &CartState {
        self.state.items.clear();
        self.recompute_totals();
        if let Err(e) = self.storage.clear() {
            tracing::warn!("Failed to delete cart slot: {e}");
        }
        &self.state
    }

    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut CartLineItem> {
        self.state
            .items
            .iter_mut()
            .find(|item| item.product.id == product_id)
    }

    /// Recompute totals and overwrite the slot; every mutating intent except
    /// `clear` funnels through here.
    fn finish_mutation(&mut self) -> &CartState {
        self.recompute_totals();
        self.persist();
        &self.state
    }

    /// Recompute both derived totals from the line items.
    ///
    /// Prices are read live from each line's product reference at summation
    /// time, never from a cached snapshot.
    fn recompute_totals(&mut self) {
        self.state.total_items = self
            .state
            .items
            .iter()
            .map(|item| item.quantity)
            .sum();
        self.state.total_amount = self
            .state
            .items
            .iter()
            .map(|item| item.product.price * Decimal::from(item.quantity))
            .sum();
    }

    /// Overwrite the slot with the full item list, swallowing failures.
    fn persist(&self) {
        match serde_json::to_string(&self.state.items) {
            Ok(payload) => {
                if let Err(e) = self.storage.write(&payload) {
                    tracing::warn!("Failed to write cart slot: {e}");
                }
            }
            Err(e) => {
                tracing::warn!("Failed to serialize cart items: {e}");
            }
        }
    }
}
