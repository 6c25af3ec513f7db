use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use gresa_core::{FormatKind, Formatter};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Kind {
    Currency,
    Decimal,
    Percent,
    Integer,
}

impl From<Kind> for FormatKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Currency => FormatKind::Currency,
            Kind::Decimal => FormatKind::Decimal,
            Kind::Percent => FormatKind::Percent,
            Kind::Integer => FormatKind::Integer,
        }
    }
}

/// Arguments for formatting a single value
#[derive(Args)]
pub struct FormatArgs {
    /// Value to format, e.g. 14859.47395978 or 0.1692
    #[arg(allow_negative_numbers = true)]
    pub value: Decimal,

    #[arg(long, value_enum, default_value = "decimal")]
    pub kind: Kind,
}

pub fn run_format(args: FormatArgs, formatter: &Formatter) -> Result<Value, Box<dyn std::error::Error>> {
    let kind = FormatKind::from(args.kind);
    Ok(json!({
        "value": args.value.to_string(),
        "kind": kind,
        "formatted": formatter.format(args.value, kind),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gresa_core::FormatterConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_with_custom_symbol() {
        let formatter = Formatter::new(FormatterConfig {
            currency_symbol: "$".into(),
        });
        let value = run_format(
            FormatArgs {
                value: dec!(14859.47395978),
                kind: Kind::Currency,
            },
            &formatter,
        )
        .unwrap();
        assert_eq!(value["formatted"], "$14,859.47");
        assert_eq!(value["kind"], "currency");
    }

    #[test]
    fn test_percent() {
        let value = run_format(
            FormatArgs {
                value: dec!(0.1692),
                kind: Kind::Percent,
            },
            &Formatter::default(),
        )
        .unwrap();
        assert_eq!(value["formatted"], "16.92%");
    }
}
