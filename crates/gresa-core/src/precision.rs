//! Precision policy for derived quantities.
//!
//! Textbook solutions for deferred and general annuities round the rate per
//! payment period to 8 decimal places before compounding. Other families keep
//! full precision until display. The mode is a property of the formula family
//! and never of the input values.
//!
//! A [`DerivedValue`] can only be created through [`DerivedValue::settle`],
//! which applies the policy once. Evaluator and trace builder both read the
//! settled value, so they cannot disagree about rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::registry::Variable;

/// Fractional digits kept by [`PrecisionMode::RoundedIntermediate`].
pub const INTERMEDIATE_DECIMAL_PLACES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionMode {
    /// Full precision through every step; rounding happens at display only.
    Continuous,
    /// Derived rates are rounded to 8 decimals before any further use.
    RoundedIntermediate,
}

impl PrecisionMode {
    pub fn round_derived(self, value: Decimal) -> Decimal {
        match self {
            PrecisionMode::Continuous => value,
            PrecisionMode::RoundedIntermediate => value.round_dp_with_strategy(
                INTERMEDIATE_DECIMAL_PLACES,
                RoundingStrategy::MidpointAwayFromZero,
            ),
        }
    }
}

/// Free-function form of [`PrecisionMode::round_derived`].
pub fn round_derived(value: Decimal, mode: PrecisionMode) -> Decimal {
    mode.round_derived(value)
}

/// A derived quantity after the precision policy has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedValue {
    variable: Variable,
    value: Decimal,
    mode: PrecisionMode,
    rounded: bool,
}

impl DerivedValue {
    /// Apply `mode` to the exact value. The exact value is dropped here.
    pub(crate) fn settle(variable: Variable, exact: Decimal, mode: PrecisionMode) -> Self {
        let value = mode.round_derived(exact);
        DerivedValue {
            variable,
            value,
            mode,
            rounded: value != exact,
        }
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn mode(&self) -> PrecisionMode {
        self.mode
    }

    /// Whether rounding changed the exact value.
    pub fn was_rounded(&self) -> bool {
        self.rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_continuous_is_identity() {
        let v = dec!(1) / dec!(3);
        assert_eq!(round_derived(v, PrecisionMode::Continuous), v);
    }

    #[test]
    fn test_rounded_intermediate_keeps_eight_places() {
        let v = dec!(0.08) / dec!(3);
        assert_eq!(
            round_derived(v, PrecisionMode::RoundedIntermediate),
            dec!(0.02666667)
        );
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(
            round_derived(dec!(0.123456785), PrecisionMode::RoundedIntermediate),
            dec!(0.12345679)
        );
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let once = round_derived(dec!(0.0198039027185569660056448218), PrecisionMode::RoundedIntermediate);
        let twice = round_derived(once, PrecisionMode::RoundedIntermediate);
        assert_eq!(once, twice);
        assert_eq!(once, dec!(0.01980390));
    }

    #[test]
    fn test_settle_records_rounding() {
        let exact = DerivedValue::settle(Variable::RatePerPeriod, dec!(0.015), PrecisionMode::RoundedIntermediate);
        assert!(!exact.was_rounded());
        assert_eq!(exact.value(), dec!(0.015));

        let inexact = DerivedValue::settle(
            Variable::RatePerPeriod,
            dec!(0.08) / dec!(3),
            PrecisionMode::RoundedIntermediate,
        );
        assert!(inexact.was_rounded());
        assert_eq!(inexact.mode(), PrecisionMode::RoundedIntermediate);
    }
}
