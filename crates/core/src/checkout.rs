//! Checkout: customer validation and order records.
//!
//! Checkout turns a cart plus the shopper's form input into an immutable
//! [`Order`] and hands back a fresh empty cart. Nothing is persisted here;
//! the caller stores the order and replaces its cart.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, LineItem};
use crate::types::{Email, EmailError, Phone, PhoneError, Price};

/// Prefix of generated order numbers.
pub const ORDER_NUMBER_PREFIX: &str = "AK";

/// A problem with the shopper's checkout input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is blank. Carries the form field name.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

impl ValidationError {
    /// Message suitable for showing to the shopper.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "Please fill in all required fields",
            Self::InvalidEmail(_) => "Please enter a valid email address",
            Self::InvalidPhone(_) => "Please enter a valid phone number",
            Self::UnknownPaymentMethod(_) => "Please choose a payment method",
        }
    }
}

/// Errors that can occur when checking out.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// How the shopper intends to pay. Recorded on the order only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
    #[serde(rename = "gcash")]
    GCash,
    #[serde(rename = "card")]
    Card,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cod",
            Self::GCash => "gcash",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cod" => Ok(Self::CashOnDelivery),
            "gcash" => Ok(Self::GCash),
            "card" => Ok(Self::Card),
            _ => Err(ValidationError::UnknownPaymentMethod(s.to_owned())),
        }
    }
}

/// Raw checkout form input, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub zip_code: String,
    /// Blank selects cash on delivery.
    pub payment_method: String,
}

/// Validated customer details recorded on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
    pub city: String,
    pub province: String,
    pub zip_code: String,
    pub payment_method: PaymentMethod,
}

impl TryFrom<&CheckoutForm> for CustomerInfo {
    type Error = ValidationError;

    /// Required fields are checked first, in form order, then email, phone,
    /// and payment method.
    fn try_from(form: &CheckoutForm) -> Result<Self, Self::Error> {
        let full_name = required("fullName", &form.full_name)?;
        let email = required("email", &form.email)?;
        let phone = required("phone", &form.phone)?;
        let address = required("address", &form.address)?;
        let city = required("city", &form.city)?;
        let province = required("province", &form.province)?;
        let zip_code = required("zipCode", &form.zip_code)?;

        let payment_method = if form.payment_method.trim().is_empty() {
            PaymentMethod::default()
        } else {
            form.payment_method.parse()?
        };

        Ok(Self {
            full_name: full_name.to_owned(),
            email: Email::parse(email)?,
            phone: Phone::parse(phone)?,
            address: address.to_owned(),
            city: city.to_owned(),
            province: province.to_owned(),
            zip_code: zip_code.to_owned(),
            payment_method,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

/// A placed order.
///
/// Stored in camelCase (`orderNumber`, `zipCode`, ...) alongside the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: String,
    /// When the order was placed.
    pub date: DateTime<Utc>,
    pub customer: CustomerInfo,
    pub items: Vec<LineItem>,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

/// Order number for an order placed at `placed_at`: `AK` plus epoch milliseconds.
#[must_use]
pub fn order_number(placed_at: DateTime<Utc>) -> String {
    format!("{ORDER_NUMBER_PREFIX}{}", placed_at.timestamp_millis())
}

impl Cart {
    /// Place an order for everything in the cart, timestamped now.
    ///
    /// # Errors
    ///
    /// See [`Cart::checkout_at`].
    pub fn checkout(&self, form: &CheckoutForm) -> Result<(Order, Self), CheckoutError> {
        self.checkout_at(form, Utc::now())
    }

    /// Place an order for everything in the cart at `placed_at`.
    ///
    /// Returns the order together with the empty cart that replaces this one.
    /// The cart itself is not modified, so on error the caller still holds it
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there are no lines, or
    /// [`CheckoutError::Validation`] if the form is incomplete or malformed.
    pub fn checkout_at(
        &self,
        form: &CheckoutForm,
        placed_at: DateTime<Utc>,
    ) -> Result<(Order, Self), CheckoutError> {
        if self.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let customer = CustomerInfo::try_from(form)?;
        let totals = self.totals();

        let order = Order {
            order_number: order_number(placed_at),
            date: placed_at,
            customer,
            items: self.lines().to_vec(),
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            total: totals.total,
        };

        Ok((order, Self::new()))
    }
}
