//! Line-item quantities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one; removing a line is a separate operation.
    #[error("quantity must be at least 1")]
    Zero,
}

/// A quantity of at least one unit.
///
/// Deserialization goes through [`Quantity::new`], so a persisted cart with a
/// zero quantity is rejected when it is read rather than surfacing later as a
/// free line.
///
/// ```
/// use ampkicks_core::Quantity;
///
/// assert!(Quantity::new(0).is_err());
///
/// let qty = Quantity::new(2).unwrap();
/// assert_eq!(qty.offset(-5).get(), 1);
/// assert_eq!(qty.offset(3).get(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `n` is zero.
    pub const fn new(n: u32) -> Result<Self, QuantityError> {
        if n == 0 {
            Err(QuantityError::Zero)
        } else {
            Ok(Self(n))
        }
    }

    /// The number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Combined quantity, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Shift the quantity by `delta`, never going below one.
    #[must_use]
    pub fn offset(self, delta: i64) -> Self {
        let shifted = i64::from(self.0)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        Self(u32::try_from(shifted).unwrap_or(u32::MAX))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}
