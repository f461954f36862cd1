//! Money rounding and formatting helpers
//!
//! Every commission figure and every total goes through [`round_money`], so
//! the rounding mode is decided in exactly one place.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a money amount to cents, half away from zero.
///
/// This is the rule a spreadsheet `ROUND(x, 2)` applies, which is what the
/// hand-prepared reference workbooks are reconciled against.
///
/// # Examples
/// ```
/// use ipo_commission::utils::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(0.125)), dec!(0.13));
/// assert_eq!(round_money(dec!(-0.125)), dec!(-0.13));
/// assert_eq!(round_money(dec!(350.1749)), dec!(350.17));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "¥" prefix (Chinese Yuan)
    Cny,
    /// No currency symbol (for table cells)
    None,
}

/// Core formatting function with full control over output.
///
/// Formats a Decimal value with `,` as thousands separator and `.` as
/// decimal separator, always with two decimals.
///
/// # Examples
/// ```
/// use ipo_commission::utils::{format_amount_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_amount_with_width(dec!(1234.56), 0, CurrencySymbol::Cny),
///     "¥1,234.56"
/// );
///
/// assert_eq!(
///     format_amount_with_width(dec!(1234), 12, CurrencySymbol::None),
///     "    1,234.00"
/// );
/// ```
pub fn format_amount_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = round_money(value);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let prefix = match symbol {
        CurrencySymbol::Cny => "¥",
        CurrencySymbol::None => "",
    };

    let result = format!("{}{}{}.{}", sign, prefix, with_separators, decimal_part);

    // chars, not bytes: the yuan sign is multi-byte
    let len = result.chars().count();
    if width > len {
        format!("{}{}", " ".repeat(width - len), result)
    } else {
        result
    }
}

/// Format as yuan with symbol: "¥1,234.56"
///
/// # Examples
/// ```
/// use ipo_commission::utils::format_yuan;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_yuan(dec!(1234.56)), "¥1,234.56");
/// assert_eq!(format_yuan(dec!(-500)), "-¥500.00");
/// ```
pub fn format_yuan(value: Decimal) -> String {
    format_amount_with_width(value, 0, CurrencySymbol::Cny)
}

/// Format number only (no symbol): "1,234.56"
pub fn format_amount(value: Decimal) -> String {
    format_amount_with_width(value, 0, CurrencySymbol::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(2.355)), dec!(2.36));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_money(dec!(2.3449)), dec!(2.34));
        assert_eq!(round_money(dec!(300)), dec!(300));
    }

    #[test]
    fn test_format_yuan_basic() {
        assert_eq!(format_yuan(dec!(1234.56)), "¥1,234.56");
        assert_eq!(format_yuan(dec!(0.99)), "¥0.99");
        assert_eq!(format_yuan(dec!(1000000)), "¥1,000,000.00");
    }

    #[test]
    fn test_format_yuan_small_values() {
        assert_eq!(format_yuan(dec!(0)), "¥0.00");
        assert_eq!(format_yuan(dec!(0.01)), "¥0.01");
        assert_eq!(format_yuan(dec!(123)), "¥123.00");
        assert_eq!(format_yuan(dec!(999.99)), "¥999.99");
    }

    #[test]
    fn test_format_yuan_negative() {
        assert_eq!(format_yuan(dec!(-1234.56)), "-¥1,234.56");
        assert_eq!(format_yuan(dec!(-0.01)), "-¥0.01");
    }

    #[test]
    fn test_format_amount_rounds_instead_of_truncating() {
        assert_eq!(format_amount(dec!(1.235)), "1.24");
        assert_eq!(format_amount(dec!(12345678.9)), "12,345,678.90");
    }

    #[test]
    fn test_format_with_width_counts_chars() {
        let result = format_amount_with_width(dec!(100), 10, CurrencySymbol::Cny);
        assert_eq!(result, "   ¥100.00");
        assert_eq!(result.chars().count(), 10);

        // Already wider than requested: no padding
        assert_eq!(
            format_amount_with_width(dec!(1000000), 5, CurrencySymbol::None),
            "1,000,000.00"
        );
    }
}
