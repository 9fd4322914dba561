//! Pricing

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// No items were provided, so there is nothing to total.
    #[error("no items provided; cannot calculate a total")]
    NoItems,

    /// The total does not fit in minor units.
    #[error("total price overflowed")]
    Overflow,

    /// Lines are priced in different currencies (line currency, first line currency).
    #[error("currency mismatch: {0} line in a {1} total")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Price of `quantity` units at `price` each.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the result does not fit in minor units.
pub fn line_total<'a>(
    price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, price.currency()))
        .ok_or(TotalPriceError::Overflow)
}

/// Calculates the total price of `(unit price, quantity)` lines.
///
/// # Errors
///
/// - [`TotalPriceError::NoItems`]: No lines were provided.
/// - [`TotalPriceError::Overflow`]: A line total or the sum does not fit in minor units.
/// - [`TotalPriceError::CurrencyMismatch`]: A line is not in the first line's currency.
pub fn total_price<'a, 'b, I>(lines: I) -> Result<Money<'a, Currency>, TotalPriceError>
where
    'a: 'b,
    I: IntoIterator<Item = (&'b Money<'a, Currency>, u32)>,
{
    let mut lines = lines.into_iter().peekable();

    let currency = lines
        .peek()
        .map(|(price, _)| price.currency())
        .ok_or(TotalPriceError::NoItems)?;

    let minor = lines.try_fold(0_i64, |acc, (price, quantity)| {
        if price.currency() != currency {
            return Err(TotalPriceError::CurrencyMismatch(
                price.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        let line = line_total(price, quantity)?;

        acc.checked_add(line.to_minor_units())
            .ok_or(TotalPriceError::Overflow)
    })?;

    Ok(Money::from_minor(minor, currency))
}

/// Plain decimal rendering of an amount at the currency's precision, e.g. `999.99`.
///
/// Used for the order log, where the currency symbol and grouping separators
/// of the display format would not parse back.
pub fn format_amount(money: &Money<'_, Currency>) -> String {
    Decimal::new(money.to_minor_units(), money.currency().exponent).to_string()
}

/// Parse a plain decimal amount (e.g. `19.99` or `19.990000`) into money.
///
/// Returns `None` if the amount is not a decimal or does not fit in minor units.
pub fn parse_amount<'a>(s: &str, currency: &'a Currency) -> Option<Money<'a, Currency>> {
    let amount = s.trim().parse::<Decimal>().ok()?;

    let scale = 10_i64.checked_pow(currency.exponent)?;

    let minor_units = amount
        .checked_mul(Decimal::from(scale))
        .and_then(|value| value.round_dp(0).to_i64())?;

    Some(Money::from_minor(minor_units, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_by_quantity() -> TestResult {
        let price = Money::from_minor(9_999, USD);

        assert_eq!(line_total(&price, 2)?, Money::from_minor(19_998, USD));

        Ok(())
    }

    #[test]
    fn line_total_overflow_errors() {
        let price = Money::from_minor(i64::MAX, USD);

        assert_eq!(line_total(&price, 2), Err(TotalPriceError::Overflow));
    }

    #[test]
    fn total_price_sums_lines() -> TestResult {
        let ten = Money::from_minor(1_000, USD);
        let five = Money::from_minor(500, USD);

        let total = total_price([(&ten, 2), (&five, 3)])?;

        assert_eq!(total, Money::from_minor(3_500, USD));

        Ok(())
    }

    #[test]
    fn total_price_rejects_mixed_currencies() {
        let dollars = Money::from_minor(1_000, USD);
        let pounds = Money::from_minor(1_000, GBP);

        assert_eq!(
            total_price([(&dollars, 1), (&pounds, 1)]),
            Err(TotalPriceError::CurrencyMismatch("GBP", "USD"))
        );
    }

    #[test]
    fn total_price_empty() {
        let lines: [(&Money<'static, Currency>, u32); 0] = [];

        assert_eq!(total_price(lines), Err(TotalPriceError::NoItems));
    }

    #[test]
    fn format_amount_keeps_currency_precision() {
        assert_eq!(format_amount(&Money::from_minor(99_999, USD)), "999.99");
        assert_eq!(format_amount(&Money::from_minor(3_500, GBP)), "35.00");
        assert_eq!(format_amount(&Money::from_minor(5, USD)), "0.05");
    }

    #[test]
    fn parse_amount_accepts_long_fractions() {
        assert_eq!(
            parse_amount("999.990000", USD),
            Some(Money::from_minor(99_999, USD))
        );
        assert_eq!(parse_amount("35", USD), Some(Money::from_minor(3_500, USD)));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("12.5x", USD), None);
        assert_eq!(parse_amount("", USD), None);
    }
}
