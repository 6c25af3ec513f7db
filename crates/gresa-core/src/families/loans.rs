use crate::evaluator::{Operands, Workings};
use crate::families::annuity;
use crate::registry::Variable;
use crate::time_value::{checked_mul, FactorKind};
use crate::GresaResult;

/// Amortized payment: R = P / {[1 - (1 + i)^-n] / i}
pub(crate) fn payment(ops: &Operands) -> GresaResult<Workings> {
    annuity::payment(ops, Variable::Principal, FactorKind::Discount)
}

/// I = R × n - P
pub(crate) fn total_interest(ops: &Operands) -> GresaResult<Workings> {
    let payment = ops.get(Variable::Payment)?;
    let periods = ops.get(Variable::PeriodCount)?;
    let principal = ops.get(Variable::Principal)?;
    let paid = checked_mul(payment, periods, "total paid (R × n)")?;
    Ok(Workings::TotalInterest {
        payment,
        periods,
        principal,
        paid,
        result: paid - principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::operands_for;
    use crate::precision::{DerivedValue, PrecisionMode};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_payment() {
        let ops = operands_for(
            &[(Variable::Principal, dec!(100000))],
            vec![
                DerivedValue::settle(Variable::RatePerPeriod, dec!(0.01), PrecisionMode::Continuous),
                DerivedValue::settle(Variable::PeriodCount, dec!(12), PrecisionMode::Continuous),
            ],
        );
        let r = payment(&ops).unwrap().result();
        assert!((r - dec!(8884.87886783)).abs() < dec!(0.00001), "got {r}");
    }

    #[test]
    fn test_total_interest() {
        let ops = operands_for(
            &[(Variable::Payment, dec!(8884.88)), (Variable::Principal, dec!(100000))],
            vec![DerivedValue::settle(Variable::PeriodCount, dec!(12), PrecisionMode::Continuous)],
        );
        let w = total_interest(&ops).unwrap();
        assert_eq!(w.result(), dec!(6618.56));
        match w {
            Workings::TotalInterest { paid, .. } => assert_eq!(paid, dec!(106618.56)),
            other => panic!("unexpected workings {other:?}"),
        }
    }

    #[test]
    fn test_zero_rate_loan() {
        let ops = operands_for(
            &[(Variable::Principal, dec!(1200))],
            vec![
                DerivedValue::settle(Variable::RatePerPeriod, Decimal::ZERO, PrecisionMode::Continuous),
                DerivedValue::settle(Variable::PeriodCount, dec!(12), PrecisionMode::Continuous),
            ],
        );
        assert!(payment(&ops).is_err());
    }
}
