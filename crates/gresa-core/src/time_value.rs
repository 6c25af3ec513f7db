use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::Serialize;

use crate::error::GresaError;
use crate::types::Rate;
use crate::GresaResult;

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------

/// `numerator / denominator`, rejecting an exactly-zero denominator.
pub fn checked_div(numerator: Decimal, denominator: Decimal, context: &str) -> GresaResult<Decimal> {
    if denominator.is_zero() {
        return Err(GresaError::division_by_zero(context));
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| GresaError::invalid(context, "Result exceeds the decimal range"))
}

pub fn checked_add(lhs: Decimal, rhs: Decimal, context: &str) -> GresaResult<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| GresaError::invalid(context, "Result exceeds the decimal range"))
}

pub fn checked_mul(lhs: Decimal, rhs: Decimal, context: &str) -> GresaResult<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| GresaError::invalid(context, "Result exceeds the decimal range"))
}

/// `base^exponent`. Integer exponents multiply exactly; fractional ones go
/// through exp/ln.
pub fn checked_pow(base: Decimal, exponent: Decimal, context: &str) -> GresaResult<Decimal> {
    if base.is_sign_negative() && !exponent.fract().is_zero() {
        return Err(GresaError::invalid(
            context,
            "Fractional power of a negative base is undefined",
        ));
    }
    base.checked_powd(exponent)
        .ok_or_else(|| GresaError::invalid(context, "Result exceeds the decimal range"))
}

/// Natural logarithm of a strictly positive value.
pub fn natural_log(value: Decimal, context: &str) -> GresaResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(GresaError::invalid(
            context,
            "Logarithm requires a positive argument",
        ));
    }
    Ok(value.ln())
}

// ---------------------------------------------------------------------------
// Derived quantities
// ---------------------------------------------------------------------------

/// i = r / m
pub fn rate_per_period(nominal: Rate, frequency: Decimal) -> GresaResult<Rate> {
    checked_div(nominal, frequency, "rate per period (r/m)")
}

/// Rate per payment period when payments (m1 per year) and compounding
/// (m2 per year) differ: i = (1 + r/m2)^(m2/m1) - 1
pub fn equivalent_rate(
    nominal: Rate,
    payment_frequency: Decimal,
    compounding_frequency: Decimal,
) -> GresaResult<Rate> {
    let per_compounding = checked_div(nominal, compounding_frequency, "equivalent rate (r/m2)")?;
    let exponent = checked_div(compounding_frequency, payment_frequency, "equivalent rate (m2/m1)")?;
    let base = checked_add(Decimal::ONE, per_compounding, "equivalent rate (1 + r/m2)")?;
    let growth = checked_pow(base, exponent, "equivalent rate")?;
    Ok(growth - Decimal::ONE)
}

/// n = m × t
pub fn period_count(frequency: Decimal, years: Decimal) -> GresaResult<Decimal> {
    checked_mul(frequency, years, "number of periods (m × t)")
}

/// (1 + i)^n
pub fn compound_factor(rate: Rate, periods: Decimal) -> GresaResult<Decimal> {
    let base = checked_add(Decimal::ONE, rate, "compound factor (1 + i)")?;
    checked_pow(base, periods, "compound factor (1 + i)^n")
}

/// (1 + i)^-n, raised as (1/(1 + i))^n. Finite for any horizon.
pub fn discount_factor(rate: Rate, periods: Decimal) -> GresaResult<Decimal> {
    let base = checked_add(Decimal::ONE, rate, "discount factor (1 + i)")?;
    let inverse = checked_div(Decimal::ONE, base, "discount factor: 1 + i is zero")?;
    checked_pow(inverse, periods, "discount factor (1 + i)^-n")
}

// ---------------------------------------------------------------------------
// Annuity factors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// [(1 + i)^n - 1] / i
    Accumulation,
    /// [1 - (1 + i)^-n] / i
    Discount,
}

/// An ordinary annuity factor together with the intermediate values a
/// hand-worked solution writes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnuityFactor {
    pub kind: FactorKind,
    pub rate: Rate,
    pub periods: Decimal,
    /// (1 + i)^n for accumulation, (1 + i)^-n for discount
    pub power: Decimal,
    pub numerator: Decimal,
    pub value: Decimal,
}

pub fn annuity_factor(kind: FactorKind, rate: Rate, periods: Decimal) -> GresaResult<AnnuityFactor> {
    if rate.is_zero() {
        return Err(GresaError::division_by_zero(
            "annuity factor: rate per period is zero",
        ));
    }
    let (power, numerator) = match kind {
        FactorKind::Accumulation => {
            let power = compound_factor(rate, periods)?;
            (power, power - Decimal::ONE)
        }
        FactorKind::Discount => {
            let power = discount_factor(rate, periods)?;
            (power, Decimal::ONE - power)
        }
    };
    let value = checked_div(numerator, rate, "annuity factor")?;
    Ok(AnnuityFactor {
        kind,
        rate,
        periods,
        power,
        numerator,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOLERANCE: Decimal = dec!(0.00000001);

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_rate_per_period() {
        assert_eq!(rate_per_period(dec!(0.08), dec!(4)).unwrap(), dec!(0.02));
    }

    #[test]
    fn test_rate_per_period_zero_frequency() {
        let err = rate_per_period(dec!(0.08), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, GresaError::DivisionByZero { .. }));
    }

    #[test]
    fn test_compound_factor_integer_exponent() {
        assert_close(
            compound_factor(dec!(0.02), dec!(20)).unwrap(),
            dec!(1.485947395978),
            dec!(0.000000000001),
        );
    }

    #[test]
    fn test_equivalent_rate_quarterly_to_monthly() {
        // (1.02)^(1/3) - 1
        assert_close(
            equivalent_rate(dec!(0.08), dec!(12), dec!(4)).unwrap(),
            dec!(0.006622709560),
            TOLERANCE,
        );
    }

    #[test]
    fn test_equivalent_rate_matching_frequencies() {
        assert_close(
            equivalent_rate(dec!(0.06), dec!(4), dec!(4)).unwrap(),
            dec!(0.015),
            TOLERANCE,
        );
    }

    #[test]
    fn test_accumulation_factor() {
        let f = annuity_factor(FactorKind::Accumulation, dec!(0.03), dec!(20)).unwrap();
        assert_close(f.value, dec!(26.8703745), dec!(0.0000001));
        assert_eq!(f.numerator, f.power - Decimal::ONE);
    }

    #[test]
    fn test_discount_factor() {
        let f = annuity_factor(FactorKind::Discount, dec!(0.03), dec!(20)).unwrap();
        assert_close(f.value, dec!(14.8774748604555), TOLERANCE);
        assert_eq!(f.numerator, Decimal::ONE - f.power);
    }

    #[test]
    fn test_discount_factor_long_horizon_does_not_overflow() {
        // 1.1^720 is past Decimal::MAX; its reciprocal is simply tiny.
        let f = annuity_factor(FactorKind::Discount, dec!(0.1), dec!(720)).unwrap();
        assert_close(f.value, dec!(10), TOLERANCE);
    }

    #[test]
    fn test_rate_overflow_is_invalid_input() {
        let err = compound_factor(Decimal::MAX, Decimal::ONE).unwrap_err();
        assert!(matches!(err, GresaError::InvalidInput { .. }));
        let err = equivalent_rate(Decimal::MAX, Decimal::ONE, Decimal::ONE).unwrap_err();
        assert!(matches!(err, GresaError::InvalidInput { .. }));
        assert!(checked_add(Decimal::MAX, Decimal::ONE, "sum").is_err());
    }

    #[test]
    fn test_zero_rate_factor_is_division_by_zero() {
        let err = annuity_factor(FactorKind::Discount, Decimal::ZERO, dec!(10)).unwrap_err();
        assert!(matches!(err, GresaError::DivisionByZero { .. }));
    }

    #[test]
    fn test_log_rejects_non_positive() {
        assert!(natural_log(Decimal::ZERO, "F/P").is_err());
        assert!(natural_log(dec!(-2), "F/P").is_err());
        assert_close(natural_log(Decimal::ONE, "F/P").unwrap(), Decimal::ZERO, TOLERANCE);
    }
}
