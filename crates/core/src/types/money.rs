//! Decimal money amounts: parsing operator input and formatting for display.
//!
//! Amounts are plain [`Decimal`] values. The backend has a single implicit
//! currency, so only the display symbol is configurable.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest price an item may carry: `999,999,999,999.99`.
///
/// Any capped price times any `u32` quantity stays well inside [`Decimal`]'s
/// range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

/// Errors produced when parsing an amount typed by an operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// No amount was entered.
    #[error("Price is required")]
    Empty,
    /// The input is not a decimal number.
    #[error("Price must be a number")]
    Invalid(String),
}

/// Parse an operator-entered amount.
///
/// Surrounding whitespace, a leading currency symbol, and thousands
/// separators are ignored, so `"¥1,200"` and `"1200"` parse the same.
///
/// # Errors
///
/// Returns [`MoneyError::Empty`] for blank input and [`MoneyError::Invalid`]
/// when the remainder is not a decimal number.
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty);
    }

    let digits: String = trimmed
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    Decimal::from_str(&digits).map_err(|_| MoneyError::Invalid(trimmed.to_owned()))
}

/// Format an amount for display, e.g. `¥12,345` or `¥1,000.5`.
///
/// The amount is rounded to two fractional digits and trailing zeros are
/// dropped.
#[must_use]
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp(2).normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = rounded.abs().to_string();
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let mut out = format!("{sign}{symbol}{}", group_thousands(whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Decimal::new(0, 0), "¥0")]
    #[case(Decimal::new(999, 0), "¥999")]
    #[case(Decimal::new(1000, 0), "¥1,000")]
    #[case(Decimal::new(1_234_567, 0), "¥1,234,567")]
    #[case(Decimal::new(100_050, 2), "¥1,000.5")]
    #[case(Decimal::new(19_999, 3), "¥20")]
    #[case(Decimal::new(-3500, 0), "-¥3,500")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount, "¥"), expected);
    }

    #[test]
    fn test_format_amount_uses_given_symbol() {
        assert_eq!(format_amount(Decimal::new(1999, 2), "$"), "$19.99");
    }

    #[rstest]
    #[case("1200", Decimal::new(1200, 0))]
    #[case(" 1,200 ", Decimal::new(1200, 0))]
    #[case("¥1,200", Decimal::new(1200, 0))]
    #[case("19.99", Decimal::new(1999, 2))]
    fn test_parse_amount(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[test]
    fn test_max_amount() {
        assert_eq!(MAX_AMOUNT, parse_amount("999,999,999,999.99").unwrap());
        assert!(MAX_AMOUNT.checked_mul(Decimal::from(u32::MAX)).is_some());
    }

    #[test]
    fn test_parse_amount_errors() {
        assert_eq!(parse_amount("  "), Err(MoneyError::Empty));
        assert_eq!(
            parse_amount("twelve"),
            Err(MoneyError::Invalid("twelve".to_string()))
        );
    }
}
