use common::{Money, MoneyParseError};

/// Reads the discount typed into the sale form.
///
/// Accepts `2,50` as well as `2.50`. Negative amounts count as their
/// absolute value. Text that is not a number, or an amount whose absolute
/// value does not fit, yields zero.
pub fn parse_discount(text: &str) -> Money {
    if text.trim().is_empty() {
        return Money::zero();
    }

    let amount = Money::parse_decimal(text).and_then(|amount| {
        amount
            .checked_abs()
            .ok_or_else(|| MoneyParseError::OutOfRange(text.to_string()))
    });
    match amount {
        Ok(amount) => amount,
        Err(err) => {
            tracing::warn!(discount = text, error = %err, "unreadable discount, using zero");
            Money::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_comma_and_dot() {
        assert_eq!(parse_discount("2,50"), Money::from_cents(250));
        assert_eq!(parse_discount("2.50"), Money::from_cents(250));
        assert_eq!(parse_discount(" 3 "), Money::from_cents(300));
    }

    #[test]
    fn negative_discount_is_made_positive() {
        assert_eq!(parse_discount("-1,25"), Money::from_cents(125));
    }

    #[test]
    fn discount_whose_absolute_value_overflows_is_zero() {
        assert_eq!(parse_discount("-92233720368547758,08"), Money::zero());
        assert_eq!(
            parse_discount("-92233720368547758,07"),
            Money::from_cents(i64::MAX)
        );
        assert_eq!(parse_discount("99999999999999999999"), Money::zero());
    }

    #[test]
    fn blank_or_garbage_is_zero() {
        assert_eq!(parse_discount(""), Money::zero());
        assert_eq!(parse_discount("   "), Money::zero());
        assert_eq!(parse_discount("dez reais"), Money::zero());
    }
}
