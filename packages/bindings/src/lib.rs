use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use gresa_core::families::stocks::{self, YieldComparisonInput};
use gresa_core::registry::{self, Family};
use gresa_core::{EvaluationRequest, FormatKind, Formatter, FormatterConfig};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn formatter(currency_symbol: Option<String>) -> Formatter {
    currency_symbol
        .map(|currency_symbol| Formatter::new(FormatterConfig { currency_symbol }))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// `{"formula": "F_compound", "inputs": {"P": 10000, "r": "0.08", ...}}`
#[napi]
pub fn evaluate(request_json: String, currency_symbol: Option<String>) -> NapiResult<String> {
    let request: EvaluationRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = gresa_core::evaluate_with_metadata(&request, &formatter(currency_symbol))
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[napi]
pub fn list_formulas(family: Option<String>) -> NapiResult<String> {
    let specs = match family {
        Some(name) => {
            let family: Family = name.parse().map_err(to_napi_error)?;
            registry::family_formulas(family)
        }
        None => registry::all().collect(),
    };
    serde_json::to_string(&specs).map_err(to_napi_error)
}

#[napi]
pub fn describe_formula(formula: String) -> NapiResult<String> {
    let spec = registry::lookup(&formula).map_err(to_napi_error)?;
    serde_json::to_string(spec).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Stocks
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_stock_yields(input_json: String, currency_symbol: Option<String>) -> NapiResult<String> {
    let input: YieldComparisonInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = stocks::compare_yields(&input, &formatter(currency_symbol)).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `kind` is one of currency, decimal, percent, integer.
#[napi]
pub fn format_value(value: String, kind: String, currency_symbol: Option<String>) -> NapiResult<String> {
    let value: Decimal = value.trim().parse().map_err(to_napi_error)?;
    let kind: FormatKind =
        serde_json::from_value(serde_json::Value::String(kind)).map_err(to_napi_error)?;
    Ok(formatter(currency_symbol).format(value, kind))
}
