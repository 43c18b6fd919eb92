//! Field validators for `validator` derives on money and rate fields.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Exclusive upper bound for amounts and quantities; the widest integer
/// part the `NUMERIC(19, 4)` columns hold.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000_000, 0)
}

/// Amounts and quantities must not be negative and must fit in storage.
pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must be greater than or equal to 0".into());
        return Err(err);
    }
    if *value >= max_amount() {
        let mut err = ValidationError::new("max_amount");
        err.message = Some("must be less than 1000000000000000".into());
        return Err(err);
    }
    Ok(())
}

/// Percentages live in `0..=100`.
pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("percentage");
        err.message = Some("must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}
