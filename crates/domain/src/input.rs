//! Helpers for reading form text into typed values.

use common::Money;

use crate::error::ValidationError;

/// Trims a field and rejects it when nothing is left or it exceeds `max`
/// characters.
pub fn required(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    at_most(field, trimmed, max)
}

/// Trims a field that may be blank, rejecting it beyond `max` characters.
pub fn optional_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    at_most(field, value.trim(), max)
}

/// Rejects `value` when it has more than `max` characters.
pub fn at_most(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_string())
}

/// Parses a whole number, ignoring surrounding whitespace.
pub fn whole_number(field: &'static str, value: &str) -> Result<i64, ValidationError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Parses an optional row id: blank means none.
pub fn optional_id<T: From<i64>>(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<T>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => whole_number(field, text).map(|id| Some(T::from(id))),
    }
}

/// Parses a price that must be strictly positive.
pub fn positive_amount(field: &'static str, value: &str) -> Result<Money, ValidationError> {
    let amount = Money::parse_decimal(value).map_err(|_| ValidationError::InvalidAmount {
        field,
        value: value.to_string(),
    })?;
    if !amount.is_positive() {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(amount)
}

/// Normalizes a national id: trims it and drops punctuation and whitespace.
///
/// `123.456.789-09` becomes `12345678909`.
pub fn normalize_national_id(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_punctuation() && !c.is_whitespace())
        .collect()
}
