//! Integer minor-unit (cent) money primitives.
//!
//! Every monetary amount in the engine is an `i64` number of cents. Fractional
//! values appear only as statutory *rates* ([`Decimal`]), and the single place
//! a rate meets an amount is [`mul_rate`], which rounds half-up exactly once
//! at the cent boundary. No binary floating point is used anywhere.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// A monetary amount in minor units (cents).
///
/// Signed: most fields are non-negative, but net losses and refund-or-owe
/// balances are legitimately negative.
pub type Cents = i64;

/// Errors produced when converting presentation values into cents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The decimal value carries precision below one cent.
    #[error("amount {0} has sub-cent precision")]
    SubCentPrecision(Decimal),

    /// The decimal value does not fit in an `i64` number of cents.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Converts a whole-dollar amount to cents.
///
/// # Examples
///
/// ```
/// use tax_engine::money::from_dollars;
///
/// assert_eq!(from_dollars(50_000), 5_000_000);
/// ```
pub const fn from_dollars(dollars: i64) -> Cents {
    dollars * 100
}

/// Converts cents to a major-unit [`Decimal`] with two decimal places.
///
/// For presentation only; tax math never leaves minor units.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::money::to_decimal;
///
/// assert_eq!(to_decimal(387_150), dec!(3871.50));
/// ```
pub fn to_decimal(amount: Cents) -> Decimal {
    Decimal::new(amount, 2)
}

/// Converts a major-unit decimal to cents, losslessly.
///
/// This is the only dollars-to-cents door in the engine. Values with
/// sub-cent precision are rejected rather than silently rounded, and the
/// amount's unit is never inferred from its magnitude.
///
/// # Errors
///
/// Returns [`MoneyError::SubCentPrecision`] if the value is not a whole
/// number of cents, or [`MoneyError::OutOfRange`] if it does not fit.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::money::{MoneyError, from_decimal};
///
/// assert_eq!(from_decimal(dec!(123.45)), Ok(12_345));
/// assert_eq!(
///     from_decimal(dec!(0.001)),
///     Err(MoneyError::SubCentPrecision(dec!(0.001)))
/// );
/// ```
pub fn from_decimal(amount: Decimal) -> Result<Cents, MoneyError> {
    let scaled = amount * Decimal::ONE_HUNDRED;
    if scaled != scaled.trunc() {
        return Err(MoneyError::SubCentPrecision(amount));
    }
    scaled.to_i64().ok_or(MoneyError::OutOfRange(amount))
}

/// Multiplies an amount by a decimal rate, rounding half-up to the cent.
///
/// The rounding happens exactly once, on the final product. Saturates at
/// `i64::MAX` if the product cannot be represented, which no statutory rate
/// and realistic amount can reach.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::money::mul_rate;
///
/// // $100,000.00 × 22% = $22,000.00
/// assert_eq!(mul_rate(10_000_000, dec!(0.22)), 2_200_000);
/// // Midpoint rounds away from zero: $0.05 × 50% = $0.03
/// assert_eq!(mul_rate(5, dec!(0.50)), 3);
/// ```
pub fn mul_rate(amount: Cents, rate: Decimal) -> Cents {
    (Decimal::from(amount) * rate)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Clamps a signed amount to zero (`max(0, x)`).
pub const fn clamp_zero(amount: i64) -> Cents {
    if amount > 0 { amount } else { 0 }
}

/// Sums a sequence of cent amounts.
pub fn sum<I>(amounts: I) -> Cents
where
    I: IntoIterator<Item = Cents>,
{
    amounts.into_iter().sum()
}
