//! Ordinary annuities: simple, general and deferred.
//!
//! Simple and general annuities share these bodies. They differ only in how
//! the rate per payment period was derived (`r/m` against the equivalent rate
//! `(1 + r/m2)^(m2/m1) - 1`), which happens before any of this runs.

use crate::evaluator::{Operands, Workings};
use crate::registry::Variable;
use crate::time_value::{annuity_factor, checked_add, checked_div, checked_mul, FactorKind};
use crate::GresaResult;

/// F = R × [(1 + i)^n - 1] / i
pub(crate) fn future_value(ops: &Operands) -> GresaResult<Workings> {
    let payment = ops.get(Variable::Payment)?;
    let factor = annuity_factor(
        FactorKind::Accumulation,
        ops.get(Variable::RatePerPeriod)?,
        ops.get(Variable::PeriodCount)?,
    )?;
    let result = checked_mul(payment, factor.value, "annuity future value")?;
    Ok(Workings::AnnuityValue {
        payment,
        factor,
        result,
    })
}

/// P = R × [1 - (1 + i)^-n] / i
pub(crate) fn present_value(ops: &Operands) -> GresaResult<Workings> {
    let payment = ops.get(Variable::Payment)?;
    let factor = annuity_factor(
        FactorKind::Discount,
        ops.get(Variable::RatePerPeriod)?,
        ops.get(Variable::PeriodCount)?,
    )?;
    let result = checked_mul(payment, factor.value, "annuity present value")?;
    Ok(Workings::AnnuityValue {
        payment,
        factor,
        result,
    })
}

/// R = F / {[(1 + i)^n - 1] / i}
pub(crate) fn payment_from_future(ops: &Operands) -> GresaResult<Workings> {
    payment(ops, Variable::FutureValue, FactorKind::Accumulation)
}

/// R = P / {[1 - (1 + i)^-n] / i}
pub(crate) fn payment_from_present(ops: &Operands) -> GresaResult<Workings> {
    payment(ops, Variable::PresentValue, FactorKind::Discount)
}

pub(crate) fn payment(ops: &Operands, amount: Variable, kind: FactorKind) -> GresaResult<Workings> {
    let amount = ops.get(amount)?;
    let factor = annuity_factor(
        kind,
        ops.get(Variable::RatePerPeriod)?,
        ops.get(Variable::PeriodCount)?,
    )?;
    let result = checked_div(amount, factor.value, "regular payment: annuity factor is zero")?;
    Ok(Workings::AnnuityPayment {
        amount,
        factor,
        result,
    })
}

/// Present value of n payments starting after k idle periods:
/// P = R × a(k+n) - R × a(k), where a(x) = [1 - (1 + i)^-x] / i
pub(crate) fn deferred_present_value(ops: &Operands) -> GresaResult<Workings> {
    let payment = ops.get(Variable::Payment)?;
    let rate = ops.get(Variable::RatePerPeriod)?;
    let periods = ops.get(Variable::PeriodCount)?;
    let deferral = ops.get(Variable::DeferralPeriods)?;

    let total_periods = checked_add(deferral, periods, "deferred annuity (k + n)")?;
    let total = annuity_factor(FactorKind::Discount, rate, total_periods)?;
    let deferred = annuity_factor(FactorKind::Discount, rate, deferral)?;
    let total_term = checked_mul(payment, total.value, "deferred annuity")?;
    let deferred_term = checked_mul(payment, deferred.value, "deferred annuity")?;
    Ok(Workings::DeferredPresent {
        payment,
        deferral,
        periods,
        total,
        deferred,
        total_term,
        deferred_term,
        result: total_term - deferred_term,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GresaError;
    use crate::evaluator::operands_for;
    use crate::precision::{DerivedValue, PrecisionMode};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn derived(i: Decimal, n: Decimal) -> Vec<DerivedValue> {
        vec![
            DerivedValue::settle(Variable::RatePerPeriod, i, PrecisionMode::Continuous),
            DerivedValue::settle(Variable::PeriodCount, n, PrecisionMode::Continuous),
        ]
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_present_value_semiannual() {
        let ops = operands_for(&[(Variable::Payment, dec!(5000))], derived(dec!(0.03), dec!(20)));
        assert_close(
            present_value(&ops).unwrap().result(),
            dec!(74387.37430228),
            dec!(0.00001),
        );
    }

    #[test]
    fn test_payment_from_future_inverts_future_value() {
        let forward = future_value(&operands_for(
            &[(Variable::Payment, dec!(2500))],
            derived(dec!(0.01), dec!(36)),
        ))
        .unwrap()
        .result();
        let back = payment_from_future(&operands_for(
            &[(Variable::FutureValue, forward)],
            derived(dec!(0.01), dec!(36)),
        ))
        .unwrap()
        .result();
        assert_close(back, dec!(2500), dec!(0.0000001));
    }

    #[test]
    fn test_payment_from_present_inverts_present_value() {
        let forward = present_value(&operands_for(
            &[(Variable::Payment, dec!(5000))],
            derived(dec!(0.03), dec!(20)),
        ))
        .unwrap()
        .result();
        let back = payment_from_present(&operands_for(
            &[(Variable::PresentValue, forward)],
            derived(dec!(0.03), dec!(20)),
        ))
        .unwrap()
        .result();
        assert_close(back, dec!(5000), dec!(0.0000001));
    }

    #[test]
    fn test_deferred_present_value() {
        let ops = operands_for(
            &[(Variable::Payment, dec!(1500)), (Variable::DeferralPeriods, dec!(12))],
            derived(dec!(0.015), dec!(32)),
        );
        let w = deferred_present_value(&ops).unwrap();
        assert_close(w.result(), dec!(31699.67554147), dec!(0.00001));
    }

    #[test]
    fn test_deferred_without_deferral_is_ordinary() {
        let ops = operands_for(
            &[(Variable::Payment, dec!(5000)), (Variable::DeferralPeriods, Decimal::ZERO)],
            derived(dec!(0.03), dec!(20)),
        );
        let deferred = deferred_present_value(&ops).unwrap().result();
        let ordinary = present_value(&ops).unwrap().result();
        assert_close(deferred, ordinary, dec!(0.0000001));
    }

    #[test]
    fn test_zero_rate_is_division_by_zero() {
        let ops = operands_for(&[(Variable::Payment, dec!(100))], derived(Decimal::ZERO, dec!(12)));
        assert!(matches!(future_value(&ops), Err(GresaError::DivisionByZero { .. })));
        assert!(matches!(present_value(&ops), Err(GresaError::DivisionByZero { .. })));
    }
}
