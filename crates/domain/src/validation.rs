//! Field validators shared by the catalog input types.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

/// Largest integer part a price may have: `NUMERIC(10, 2)` leaves eight digits.
const MAX_PRICE_INTEGER_DIGITS: u32 = 8;
const MAX_PRICE_SCALE: u32 = 2;

/// Rejects strings that are empty or whitespace only.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Accepts prices greater than zero with at most two decimals and ten digits overall.
pub fn valid_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.is_zero() {
        return Err(ValidationError::new("positive")
            .with_message(Cow::Borrowed("El precio debe ser mayor que cero")));
    }
    if price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(ValidationError::new("scale")
            .with_message(Cow::Borrowed("El precio admite como máximo 2 decimales")));
    }
    if price.trunc() >= Decimal::from(10_i64.pow(MAX_PRICE_INTEGER_DIGITS)) {
        return Err(ValidationError::new("digits")
            .with_message(Cow::Borrowed("El precio admite como máximo 8 dígitos enteros")));
    }
    Ok(())
}

/// Builds a single-field validation failure.
pub fn field_error(
    field: &'static str,
    code: &'static str,
    message: &'static str,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        ValidationError::new(code).with_message(Cow::Borrowed(message)),
    );
    errors
}

/// Unwraps a field the derive already checked with `required`.
pub(crate) fn required<T>(
    value: Option<T>,
    field: &'static str,
    message: &'static str,
) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| field_error(field, "required", message))
}
