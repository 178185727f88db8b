//! Rupee amounts using decimal arithmetic.

use core::fmt;
use core::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount was negative.
    #[error("amount cannot be negative")]
    Negative,
    /// The text was not a decimal number.
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// A non-negative amount in Indian rupees.
///
/// ```
/// use bazaar_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(49950, 2)).unwrap();
/// assert_eq!(price.times(3).display(), "₹1498.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from form input such as `"1299"` or `"1299.50"`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` for non-numeric text and
    /// `PriceError::Negative` for negative amounts.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        let amount = s
            .parse::<Decimal>()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Percentage saved against an MRP, rounded half-up to a whole number.
    ///
    /// Returns zero when the MRP is zero or not above this price.
    #[must_use]
    pub fn discount_percent(&self, mrp: Self) -> Decimal {
        if mrp.0.is_zero() || mrp.0 <= self.0 {
            return Decimal::ZERO;
        }
        ((mrp.0 - self.0) * Decimal::ONE_HUNDRED / mrp.0)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display, e.g. `₹1299.00`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("₹{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rupees(s: &str) -> Price {
        Price::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(rupees("1299").display(), "₹1299.00");
        assert_eq!(rupees(" 49.5 ").display(), "₹49.50");
    }

    #[test]
    fn test_negative_and_garbage_rejected() {
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
        assert!(matches!(Price::parse("ten"), Err(PriceError::Invalid(_))));
        assert!(Price::parse("-0").is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [rupees("199.99").times(2), rupees("50").times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, rupees("449.98"));
        assert_eq!(Vec::<Price>::new().into_iter().sum::<Price>(), Price::ZERO);
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(rupees("750").discount_percent(rupees("1000")), Decimal::from(25));
        assert_eq!(rupees("666").discount_percent(rupees("999")), Decimal::from(33));
        assert_eq!(rupees("100").discount_percent(rupees("0")), Decimal::ZERO);
        assert_eq!(rupees("100").discount_percent(rupees("90")), Decimal::ZERO);
    }
}
