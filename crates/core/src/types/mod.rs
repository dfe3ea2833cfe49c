//! Core types for AmpKicks.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod quantity;

pub use email::{Email, EmailError};
pub use id::ProductId;
pub use phone::{Phone, PhoneError};
pub use price::Price;
pub use quantity::{Quantity, QuantityError};
