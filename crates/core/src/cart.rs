//! The cart ledger.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s keyed by
//! (product id, size). Adding a pair that is already present increases that
//! line's quantity instead of appending a second line, and insertion order is
//! kept for display.
//!
//! The cart is a plain value. The storefront loads it from its store, applies
//! one operation, and writes it back; nothing here holds shared state. Every
//! operation either succeeds or leaves the cart exactly as it was.

use serde::{Deserialize, Serialize};

use crate::catalog::ProductSnapshot;
use crate::types::{Price, ProductId, Quantity};

/// Errors returned by ledger operations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// The position does not refer to a line in the cart.
    #[error("no cart line at position {index} (cart has {len} lines)")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of lines in the cart.
        len: usize,
    },
}

/// One cart entry: a product in a chosen size, with the name, price, and image
/// captured when it was added.
///
/// Field names follow the stored cart format (`id` is the product id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub size: String,
    pub quantity: Quantity,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    fn is_for(&self, product_id: ProductId, size: &str) -> bool {
        self.product_id == product_id && self.size == size
    }
}

/// Derived cart amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Price,
    /// Shipping is free.
    pub shipping: Price,
    pub total: Price,
}

/// The shopper's cart.
///
/// Serializes as a bare JSON array of lines. Reading a stored array merges
/// lines that share a (product, size) pair, so the invariant holds for carts
/// that were written by something other than this ledger.
///
/// ```
/// use ampkicks_core::{Cart, Price, ProductId, ProductSnapshot, Quantity};
///
/// let snapshot = ProductSnapshot {
///     id: ProductId::new(1),
///     name: "Air Runner".to_string(),
///     price: Price::new(1000),
///     image: "images/air-runner.jpg".to_string(),
/// };
///
/// let mut cart = Cart::new();
/// cart.add_item(snapshot.clone(), "9", Quantity::ONE);
/// cart.add_item(snapshot, "9", Quantity::new(2).unwrap());
///
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.item_count(), 3);
/// assert_eq!(cart.totals().total, Price::new(3000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of a product in `size`.
    ///
    /// If the cart already has a line for this (product, size) pair its
    /// quantity grows; otherwise a new line is appended with the snapshot's
    /// name, price, and image. The size is not checked against the catalog;
    /// callers resolve the product and size before calling this.
    ///
    /// Returns the position of the line that was created or grown.
    pub fn add_item(
        &mut self,
        snapshot: ProductSnapshot,
        size: impl Into<String>,
        quantity: Quantity,
    ) -> usize {
        let size = size.into();
        if let Some(index) = self.position_of(snapshot.id, &size) {
            if let Some(line) = self.lines.get_mut(index) {
                line.quantity = line.quantity.saturating_add(quantity);
            }
            return index;
        }

        self.lines.push(LineItem {
            product_id: snapshot.id,
            name: snapshot.name,
            price: snapshot.price,
            image: snapshot.image,
            size,
            quantity,
        });
        self.lines.len() - 1
    }

    /// Change the quantity of the line at `index` by `delta`.
    ///
    /// The result never drops below one; taking a line out of the cart is
    /// [`Cart::remove_item`]. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::IndexOutOfRange`] if `index` is not a line.
    pub fn update_quantity(&mut self, index: usize, delta: i32) -> Result<Quantity, LedgerError> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        line.quantity = line.quantity.offset(i64::from(delta));
        Ok(line.quantity)
    }

    /// Remove the line at `index`, shifting later lines up. Returns the removed line.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::IndexOutOfRange`] if `index` is not a line.
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, LedgerError> {
        if index >= self.lines.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Subtotal, shipping, and total. All zero for an empty cart.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal: Price = self.lines.iter().map(LineItem::line_total).sum();
        let shipping = Price::ZERO;
        CartTotals {
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
        }
    }

    /// Total units across all lines, shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&LineItem> {
        self.lines.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position_of(&self, product_id: ProductId, size: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.is_for(product_id, size))
    }
}

impl From<Vec<LineItem>> for Cart {
    /// Build a cart from stored lines, merging any that share a (product, size) pair.
    fn from(lines: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            let snapshot = ProductSnapshot {
                id: line.product_id,
                name: line.name,
                price: line.price,
                image: line.image,
            };
            cart.add_item(snapshot, line.size, line.quantity);
        }
        cart
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
