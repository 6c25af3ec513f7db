//! Display formatting. Output strings are presentation sinks and are never
//! parsed back into arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::registry::Variable;

const SMART_DECIMAL_PLACES: u32 = 8;
const PERCENT_DECIMAL_PLACES: u32 = 2;
const CURRENCY_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// 2 decimals, comma-grouped thousands, currency symbol prefix
    Currency,
    /// Up to 8 decimals with trailing zeros stripped
    Decimal,
    /// Value x 100 with up to 2 decimals and a `%` suffix
    Percent,
    /// Whole number
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "₱".to_string()
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatter {
    config: FormatterConfig,
}

impl Formatter {
    pub fn new(config: FormatterConfig) -> Self {
        Formatter { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    pub fn format(&self, value: Decimal, kind: FormatKind) -> String {
        match kind {
            FormatKind::Currency => self.currency(value),
            FormatKind::Decimal => smart_decimal(value, SMART_DECIMAL_PLACES),
            // Ratios too large to scale by 100 are shown unscaled.
            FormatKind::Percent => match value.checked_mul(dec!(100)) {
                Some(scaled) => format!("{}%", smart_decimal(scaled, PERCENT_DECIMAL_PLACES)),
                None => format!("{} × 100%", smart_decimal(value, SMART_DECIMAL_PLACES)),
            },
            FormatKind::Integer => smart_decimal(value, 0),
        }
    }

    /// Format using the variable's own display kind.
    pub fn variable(&self, variable: Variable, value: Decimal) -> String {
        self.format(value, variable.descriptor().format)
    }

    fn currency(&self, value: Decimal) -> String {
        let mut rounded = value
            .abs()
            .round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(CURRENCY_DECIMAL_PLACES);
        let text = rounded.to_string();
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        let sign = if value.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{sign}{}{}.{fraction}",
            self.config.currency_symbol,
            group_thousands(whole)
        )
    }
}

/// Format with the default configuration.
pub fn format(value: Decimal, kind: FormatKind) -> String {
    Formatter::default().format(value, kind)
}

fn smart_decimal(value: Decimal, places: u32) -> String {
    let rounded = value
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        return "0".to_string();
    }
    rounded.to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_groups_thousands() {
        assert_eq!(format(dec!(14859.47395978), FormatKind::Currency), "₱14,859.47");
        assert_eq!(format(dec!(1234567.5), FormatKind::Currency), "₱1,234,567.50");
        assert_eq!(format(dec!(999), FormatKind::Currency), "₱999.00");
        assert_eq!(format(dec!(0), FormatKind::Currency), "₱0.00");
    }

    #[test]
    fn test_currency_negative_and_custom_symbol() {
        let f = Formatter::new(FormatterConfig {
            currency_symbol: "$".into(),
        });
        assert_eq!(f.format(dec!(-1500.005), FormatKind::Currency), "-$1,500.01");
        assert_eq!(f.format(dec!(-0.001), FormatKind::Currency), "$0.00");
    }

    #[test]
    fn test_smart_decimal_strips_zeros() {
        assert_eq!(format(dec!(10.00), FormatKind::Decimal), "10");
        assert_eq!(format(dec!(0.25000000), FormatKind::Decimal), "0.25");
        assert_eq!(format(dec!(0.288333333333), FormatKind::Decimal), "0.28833333");
        assert_eq!(format(dec!(1.234567890), FormatKind::Decimal), "1.23456789");
        assert_eq!(format(dec!(-0.000000001), FormatKind::Decimal), "0");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format(dec!(11) / dec!(65), FormatKind::Percent), "16.92%");
        assert_eq!(format(dec!(0.2), FormatKind::Percent), "20%");
        assert_eq!(format(dec!(0.08), FormatKind::Percent), "8%");
    }

    #[test]
    fn test_percent_out_of_range_is_unscaled() {
        assert_eq!(
            format(dec!(1000000000000000000000000000), FormatKind::Percent),
            "1000000000000000000000000000 × 100%"
        );
    }

    #[test]
    fn test_integer() {
        assert_eq!(format(dec!(20), FormatKind::Integer), "20");
        assert_eq!(format(dec!(333.5), FormatKind::Integer), "334");
        assert_eq!(format(dec!(333.49), FormatKind::Integer), "333");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("100"), "100");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("100000"), "100,000");
    }
}
