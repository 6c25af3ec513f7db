use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;

use gresa_core::families::stocks::{self, StockQuote, YieldComparisonInput};
use gresa_core::{with_metadata, Formatter};

use crate::input;

/// Arguments for comparing two stocks by yield ratio
#[derive(Args)]
pub struct CompareYieldsArgs {
    /// Path to a JSON or YAML file with `first` and `second` quotes
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "Company A")]
    pub first_name: String,

    /// Dividend per share of the first company
    #[arg(long)]
    pub first_dividend: Option<Decimal>,

    /// Market value per share of the first company
    #[arg(long)]
    pub first_market_value: Option<Decimal>,

    #[arg(long, default_value = "Company B")]
    pub second_name: String,

    #[arg(long)]
    pub second_dividend: Option<Decimal>,

    #[arg(long)]
    pub second_market_value: Option<Decimal>,
}

pub fn run_compare_yields(
    args: CompareYieldsArgs,
    formatter: &Formatter,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input_data: YieldComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = quotes_from_flags(&args)? {
        data
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file>, stdin or the --first-*/--second-* flags required".into());
    };

    let start = Instant::now();
    let comparison = stocks::compare_yields(&input_data, formatter)?;
    let output = with_metadata(
        "Stocks: stock yield ratio = dividend per share / market value per share",
        &json!({ "currency_symbol": formatter.config().currency_symbol }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        comparison,
    );
    Ok(serde_json::to_value(output)?)
}

/// Build the comparison from flags. Returns `None` when no dividend or
/// market value flag was given at all.
fn quotes_from_flags(
    args: &CompareYieldsArgs,
) -> Result<Option<YieldComparisonInput>, Box<dyn std::error::Error>> {
    let values = [
        args.first_dividend,
        args.first_market_value,
        args.second_dividend,
        args.second_market_value,
    ];
    if values.iter().all(Option::is_none) {
        return Ok(None);
    }
    match values {
        [Some(d1), Some(mv1), Some(d2), Some(mv2)] => Ok(Some(YieldComparisonInput {
            first: StockQuote {
                name: args.first_name.clone(),
                dividend_per_share: d1,
                market_value: mv1,
            },
            second: StockQuote {
                name: args.second_name.clone(),
                dividend_per_share: d2,
                market_value: mv2,
            },
        })),
        _ => Err("--first-dividend, --first-market-value, --second-dividend and \
                  --second-market-value must be given together"
            .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args() -> CompareYieldsArgs {
        CompareYieldsArgs {
            input: None,
            first_name: "Corp A".into(),
            first_dividend: Some(dec!(5)),
            first_market_value: Some(dec!(65)),
            second_name: "Corp B".into(),
            second_dividend: Some(dec!(4)),
            second_market_value: Some(dec!(50)),
        }
    }

    #[test]
    fn test_flags_build_quotes() {
        let quotes = quotes_from_flags(&args()).unwrap().unwrap();
        assert_eq!(quotes.first.name, "Corp A");
        assert_eq!(quotes.second.market_value, dec!(50));
    }

    #[test]
    fn test_partial_flags_rejected() {
        let mut partial = args();
        partial.second_market_value = None;
        assert!(quotes_from_flags(&partial).is_err());
    }

    #[test]
    fn test_comparison_envelope() {
        let value = run_compare_yields(args(), &Formatter::default()).unwrap();
        assert_eq!(value["result"]["preferred"], "second");
        assert_eq!(value["result"]["second"]["display"], "8%");
        assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
    }
}
