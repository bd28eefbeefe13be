//! Catalog product descriptors.
//!
//! The catalog API sends cakes as loosely-typed JSON: the price can be a
//! number or a string, and nothing guarantees an ID is present. A
//! [`ProductDescriptor`] captures that shape as-is, and
//! [`ProductDescriptor::validate`] turns it into a [`ValidProduct`], the only
//! thing the cart accepts.

use bakehouse_core::CakeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest unit price the cart accepts (ten million rupees).
///
/// Keeps `unit_price * quantity` and cart totals far inside `Decimal`'s range
/// for any `u32` quantity.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Errors produced when validating a [`ProductDescriptor`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductError {
    /// The product has no usable ID.
    #[error("product is missing an id")]
    MissingId,

    /// The price could not be read as a decimal number.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// The price is below zero.
    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),

    /// The price is above [`MAX_UNIT_PRICE`].
    #[error("price {0} exceeds the maximum of {max}", max = MAX_UNIT_PRICE)]
    PriceTooHigh(Decimal),
}

/// Check that `amount` is a usable unit price and normalize it.
///
/// # Errors
///
/// Returns [`ProductError::NegativePrice`] below zero and
/// [`ProductError::PriceTooHigh`] above [`MAX_UNIT_PRICE`].
pub fn check_unit_price(amount: Decimal) -> Result<Decimal, ProductError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ProductError::NegativePrice(amount));
    }
    if amount > MAX_UNIT_PRICE {
        return Err(ProductError::PriceTooHigh(amount));
    }
    Ok(amount.normalize())
}

/// A raw price as it arrives from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// A JSON number.
    Number(f64),
    /// A JSON string that should hold a number.
    Text(String),
}

impl PriceInput {
    /// Coerce to a [`Decimal`] between zero and [`MAX_UNIT_PRICE`].
    ///
    /// Strings are trimmed and parsed strictly; anything that is not a plain
    /// decimal (currency symbols, "From 85", empty) is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidPrice`] for unparseable or non-finite
    /// input, otherwise the errors of [`check_unit_price`].
    pub fn to_decimal(&self) -> Result<Decimal, ProductError> {
        let amount = match self {
            Self::Number(n) => Decimal::try_from(*n)
                .map_err(|_| ProductError::InvalidPrice(n.to_string()))?,
            Self::Text(s) => s
                .trim()
                .parse::<Decimal>()
                .map_err(|_| ProductError::InvalidPrice(s.clone()))?,
        };

        check_unit_price(amount)
    }
}

impl From<i32> for PriceInput {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for PriceInput {
    #[allow(clippy::cast_precision_loss)] // Cake prices are nowhere near 2^53
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<f64> for PriceInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PriceInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for PriceInput {
    fn from(value: Decimal) -> Self {
        Self::Text(value.to_string())
    }
}

/// A cake as described by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: PriceInput,
    #[serde(default)]
    pub image: String,
}

impl ProductDescriptor {
    /// Build a descriptor directly (handy for tests and the CLI).
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<PriceInput>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            image: image.into(),
        }
    }

    /// Validate the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::MissingId`] if the ID is blank, or a price
    /// error if the price cannot be coerced (see [`PriceInput::to_decimal`]).
    pub fn validate(&self) -> Result<ValidProduct, ProductError> {
        let id = CakeId::new(self.id.trim());
        if id.is_blank() {
            return Err(ProductError::MissingId);
        }

        let price = self.price.to_decimal()?;

        Ok(ValidProduct {
            id,
            name: self.name.clone(),
            price,
            image: self.image.clone(),
        })
    }
}

/// A product that passed validation and may be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
    id: CakeId,
    name: String,
    price: Decimal,
    image: String,
}

impl ValidProduct {
    #[must_use]
    pub const fn id(&self) -> &CakeId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }
}

impl TryFrom<ProductDescriptor> for ValidProduct {
    type Error = ProductError;

    fn try_from(descriptor: ProductDescriptor) -> Result<Self, Self::Error> {
        descriptor.validate()
    }
}
