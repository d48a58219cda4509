//! Price handling using decimal arithmetic.
//!
//! Prices are plain [`Decimal`] amounts in the store currency (EUR). They are
//! written to JSON as numbers rather than strings so that persisted carts stay
//! readable by any consumer of the storage format.

use rust_decimal::Decimal;

/// Flat shipping fee charged on every non-empty cart (4.99).
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(499, 0, 0, false, 2);

/// Largest accepted unit price (9,999,999,999,999.99).
pub const MAX_PRICE: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Whether `amount` is an acceptable unit price.
///
/// Prices are whole cents between zero and [`MAX_PRICE`]. That keeps every
/// price at 15 significant digits or fewer, which an `f64` carries exactly
/// through [`number`], so a saved price reads back as the same amount. `-0`
/// counts as zero.
#[must_use]
pub fn is_valid_price(amount: Decimal) -> bool {
    let amount = amount.normalize();
    !amount.is_sign_negative() && amount <= MAX_PRICE && amount.scale() <= 2
}

/// Format an amount for display (e.g., "€64.99").
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("€{:.2}", amount.round_dp(2))
}

/// Serde adapter that writes a [`Decimal`] as a JSON number.
///
/// Deserialization accepts numbers as well as numeric strings, so values
/// written by older clients (`"20.00"`) normalize to the same amount.
///
/// ```rust
/// use puppyracer_core::price;
/// use rust_decimal::Decimal;
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Line {
///     #[serde(with = "price::number")]
///     price: Decimal,
/// }
/// ```
pub mod number {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, ser::Error as _};

    /// Serialize a decimal as the `f64` nearest to its decimal text, so
    /// `14.99` is written as `14.99`.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount cannot be represented as an `f64`.
    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let float: f64 = value
            .to_string()
            .parse()
            .map_err(|_| S::Error::custom(format!("price {value} is out of range")))?;
        serializer.serialize_f64(float)
    }

    /// Deserialize a decimal from a number or a numeric string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is neither a number nor a parseable string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer)
    }
}
