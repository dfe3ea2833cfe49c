//! AmpKicks Core - Catalog, cart ledger, and checkout.
//!
//! This crate provides the domain logic used by every AmpKicks component:
//! - `storefront` - JSON storefront service
//! - `cli` - Command-line tools for catalogs and stores
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! persistence, no HTTP. A cart is a plain value: callers load it, run ledger
//! operations on it, and write it back wherever they keep it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities, emails, and phones
//! - [`catalog`] - Product records and validated catalog loading
//! - [`filter`] - Multi-predicate catalog filtering
//! - [`cart`] - The cart ledger: line items keyed by product and size
//! - [`checkout`] - Customer validation and order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod filter;
pub mod types;

pub use cart::{Cart, CartTotals, LedgerError, LineItem};
pub use catalog::{Catalog, CatalogError, Gender, Product, ProductSnapshot};
pub use checkout::{
    CheckoutError, CheckoutForm, CustomerInfo, Order, PaymentMethod, ValidationError,
};
pub use filter::{FilterCriteria, filter_products};
pub use types::*;
