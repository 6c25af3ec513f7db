use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GresaError;
use crate::GresaResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.08 = 8%). Never as percentages.
pub type Rate = Decimal;

/// Terms in years
pub type Years = Decimal;

/// A value exactly as the presentation layer supplied it: a JSON number or a
/// decimal string typed by the learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(serde_json::Number),
    Text(String),
}

impl RawValue {
    /// Parse into a Decimal, reporting `field` on failure.
    pub fn parse(&self, field: &str) -> GresaResult<Decimal> {
        let text = match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.trim().to_string(),
        };
        if text.is_empty() {
            return Err(GresaError::invalid(field, "Value is empty"));
        }
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| GresaError::invalid(field, format!("'{text}' is not a number")))
    }
}

impl From<Decimal> for RawValue {
    fn from(value: Decimal) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value.into())
    }
}

/// One user submission: which formula, and the raw values typed into its form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Formula identifier, e.g. `F_compound`
    pub formula: String,
    /// Variable key -> raw value
    #[serde(default)]
    pub inputs: BTreeMap<String, RawValue>,
}

impl EvaluationRequest {
    pub fn new(formula: impl Into<String>) -> Self {
        EvaluationRequest {
            formula: formula.into(),
            inputs: BTreeMap::new(),
        }
    }

    /// Builder-style input setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_text_and_number() {
        assert_eq!(RawValue::from("0.08").parse("r").unwrap(), dec!(0.08));
        assert_eq!(RawValue::from(" 10000 ").parse("P").unwrap(), dec!(10000));
        assert_eq!(RawValue::from(4).parse("m").unwrap(), dec!(4));
    }

    #[test]
    fn test_parse_json_number_fraction() {
        let value: RawValue = serde_json::from_str("0.015").unwrap();
        assert_eq!(value.parse("i").unwrap(), dec!(0.015));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(RawValue::from("1e-3").parse("r").unwrap(), dec!(0.001));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = RawValue::from("ten").parse("P").unwrap_err();
        assert!(matches!(err, GresaError::InvalidInput { ref field, .. } if field == "P"));
        assert!(RawValue::from("   ").parse("P").is_err());
    }
}
