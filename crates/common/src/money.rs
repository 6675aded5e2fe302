//! Monetary amounts.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when text cannot be read as a money amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    /// The text is not a decimal number.
    #[error("'{0}' is not a valid amount")]
    Invalid(String),

    /// The amount does not fit in the cents representation.
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money {
    /// Amount in cents (e.g., 1050 = R$ 10,50)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub const fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Parses a decimal amount as typed into a form.
    ///
    /// Both `10.50` and `10,50` are accepted. Amounts with more than two
    /// decimal places are rounded half away from zero.
    pub fn parse_decimal(text: &str) -> Result<Self, MoneyParseError> {
        let normalized = text.trim().replace(',', ".");
        let decimal = Decimal::from_str(&normalized)
            .map_err(|_| MoneyParseError::Invalid(text.to_string()))?;
        Self::from_decimal(decimal).ok_or_else(|| MoneyParseError::OutOfRange(text.to_string()))
    }

    /// Converts a decimal amount, rounding to whole cents.
    ///
    /// Returns `None` when the amount does not fit in an `i64` of cents.
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        i64::try_from(rounded.mantissa()).ok().map(Self::from_cents)
    }

    /// Returns the amount as an exact decimal.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.cents, 2)
    }

    /// Returns the amount in currency units, for chart-style numeric output.
    pub fn to_f64(&self) -> f64 {
        self.to_decimal().to_f64().unwrap_or_default()
    }

    /// Returns the amount in cents.
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns true if the amount is positive.
    pub const fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Returns true if the amount is negative.
    pub const fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Returns the absolute amount, or `None` if it does not fit.
    pub const fn checked_abs(&self) -> Option<Money> {
        match self.cents.checked_abs() {
            Some(cents) => Some(Money { cents }),
            None => None,
        }
    }

    /// Adds two amounts, or `None` on overflow.
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.cents.checked_add(other.cents) {
            Some(cents) => Some(Money { cents }),
            None => None,
        }
    }

    /// Subtracts `other`, or `None` on overflow.
    pub const fn checked_sub(&self, other: Money) -> Option<Money> {
        match self.cents.checked_sub(other.cents) {
            Some(cents) => Some(Money { cents }),
            None => None,
        }
    }

    /// Multiplies by a quantity, or `None` on overflow.
    pub const fn checked_mul(&self, quantity: u32) -> Option<Money> {
        match self.cents.checked_mul(quantity as i64) {
            Some(cents) => Some(Money { cents }),
            None => None,
        }
    }

    /// Sums amounts, or `None` if the running total overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }
}

/// Formats as Brazilian reais, e.g. `R$ 1.234,56`.
impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let units = (self.cents / 100).unsigned_abs();
        let cents = (self.cents % 100).unsigned_abs();

        let digits = units.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.cents < 0 { "-" } else { "" };
        write!(f, "{sign}R$ {grouped},{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_comma_and_dot() {
        assert_eq!(Money::parse_decimal("2,50").unwrap().cents(), 250);
        assert_eq!(Money::parse_decimal("10.00").unwrap().cents(), 1000);
        assert_eq!(Money::parse_decimal(" 5 ").unwrap().cents(), 500);
        assert_eq!(Money::parse_decimal("-3,2").unwrap().cents(), -320);
    }

    #[test]
    fn test_parse_rounds_to_cents() {
        assert_eq!(Money::parse_decimal("0,005").unwrap().cents(), 1);
        assert_eq!(Money::parse_decimal("1.234").unwrap().cents(), 123);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Money::parse_decimal("abc"),
            Err(MoneyParseError::Invalid(_))
        ));
        assert!(Money::parse_decimal("").is_err());
        // A thousands separator turns into a second decimal point.
        assert!(Money::parse_decimal("1.234,56").is_err());
    }

    #[test]
    fn test_display_brl() {
        assert_eq!(Money::from_cents(2300).to_string(), "R$ 23,00");
        assert_eq!(Money::from_cents(5).to_string(), "R$ 0,05");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "R$ 1.234.567,89");
        assert_eq!(Money::from_cents(-1050).to_string(), "-R$ 10,50");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(550);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1550)));
        assert_eq!(a.checked_sub(b), Some(Money::from_cents(450)));
        assert_eq!(a.checked_mul(2), Some(Money::from_cents(2000)));
        assert_eq!(Money::checked_sum([a, b, b]), Some(Money::from_cents(2100)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
        assert_eq!(
            Money::from_cents(-250).checked_abs(),
            Some(Money::from_cents(250))
        );
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let max = Money::from_cents(i64::MAX);

        assert_eq!(Money::from_cents(i64::MIN).checked_abs(), None);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(999_999_999_999_900).checked_mul(100_000), None);
        assert_eq!(Money::checked_sum([max, max]), None);
    }

    #[test]
    fn test_parse_extreme_negative_fits_but_has_no_abs() {
        let amount = Money::parse_decimal("-92233720368547758,08").unwrap();
        assert_eq!(amount.cents(), i64::MIN);
        assert_eq!(amount.checked_abs(), None);
    }

    #[test]
    fn test_decimal_conversions() {
        let money = Money::from_cents(2350);
        assert_eq!(money.to_decimal().to_string(), "23.50");
        assert!((money.to_f64() - 23.5).abs() < f64::EPSILON);
    }
}
