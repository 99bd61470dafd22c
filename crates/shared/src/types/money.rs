//! Money boundary helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money. Amounts are
//! `rust_decimal::Decimal` internally and decimal strings at the API
//! boundary (serialize wire amounts with `rust_decimal::serde::str`).

use rust_decimal::Decimal;
use thiserror::Error;

/// Error parsing a decimal amount string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountParseError {
    /// The string is not a valid decimal number.
    #[error("Invalid amount: {0:?}")]
    Invalid(String),
}

/// Parses a decimal string (e.g. `"1500.00"`) into a `Decimal`.
///
/// Leading/trailing whitespace is tolerated; anything that is not a
/// plain decimal number is rejected.
///
/// # Errors
///
/// Returns `AmountParseError::Invalid` if the string cannot be parsed.
pub fn parse_amount(s: &str) -> Result<Decimal, AmountParseError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| AmountParseError::Invalid(s.to_string()))
}

/// Renders an amount as a decimal string with at least two decimal places.
///
/// The scale is widened to 2 when narrower (so `100` renders as
/// `"100.00"`) but never truncated (so `1.375` stays `"1.375"`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut amount = amount;
    if amount.scale() < 2 {
        amount.rescale(2);
    }
    amount.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100.00", dec!(100.00))]
    #[case(" 42.5 ", dec!(42.5))]
    #[case("-13.37", dec!(-13.37))]
    #[case("0", dec!(0))]
    fn test_parse_amount_valid(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("12.3.4")]
    #[case("$100")]
    fn test_parse_amount_invalid(#[case] input: &str) {
        assert!(matches!(
            parse_amount(input),
            Err(AmountParseError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_preserves_scale() {
        assert_eq!(parse_amount("100.00").unwrap().scale(), 2);
        assert_eq!(parse_amount("100.000").unwrap().scale(), 3);
    }

    #[rstest]
    #[case(dec!(100), "100.00")]
    #[case(dec!(100.5), "100.50")]
    #[case(dec!(100.00), "100.00")]
    #[case(dec!(1.375), "1.375")]
    #[case(dec!(-7), "-7.00")]
    #[case(dec!(0), "0.00")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_format_then_parse_roundtrip() {
        let amount = dec!(1234.56);
        assert_eq!(parse_amount(&format_amount(amount)).unwrap(), amount);
    }
}
