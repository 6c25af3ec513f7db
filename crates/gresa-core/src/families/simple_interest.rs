use rust_decimal::Decimal;

use crate::evaluator::{Operands, Workings};
use crate::registry::Variable;
use crate::time_value::{checked_add, checked_mul};
use crate::GresaResult;

/// Is = P × r × t
pub(crate) fn interest(ops: &Operands) -> GresaResult<Workings> {
    Workings::product(
        vec![
            ops.get(Variable::Principal)?,
            ops.get(Variable::NominalRate)?,
            ops.get(Variable::Time)?,
        ],
        "simple interest",
    )
}

/// F = P + Is
pub(crate) fn maturity_from_interest(ops: &Operands) -> GresaResult<Workings> {
    Workings::sum(
        vec![ops.get(Variable::Principal)?, ops.get(Variable::SimpleInterest)?],
        "maturity value",
    )
}

/// F = P(1 + rt)
pub(crate) fn maturity(ops: &Operands) -> GresaResult<Workings> {
    let principal = ops.get(Variable::Principal)?;
    let rate = ops.get(Variable::NominalRate)?;
    let time = ops.get(Variable::Time)?;
    let rt = checked_mul(rate, time, "maturity value")?;
    let growth = checked_add(Decimal::ONE, rt, "maturity value")?;
    let result = checked_mul(principal, growth, "maturity value")?;
    Ok(Workings::SimpleAccumulation {
        principal,
        rate,
        time,
        growth,
        result,
    })
}

/// P = F - Is
pub(crate) fn principal_from_maturity(ops: &Operands) -> GresaResult<Workings> {
    Workings::difference(
        ops.get(Variable::FutureValue)?,
        ops.get(Variable::SimpleInterest)?,
        "principal",
    )
}

/// P = Is / (r × t)
pub(crate) fn principal(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::SimpleInterest)?],
        vec![ops.get(Variable::NominalRate)?, ops.get(Variable::Time)?],
        "principal (Is / rt)",
    )
}

/// r = Is / (P × t)
pub(crate) fn rate(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::SimpleInterest)?],
        vec![ops.get(Variable::Principal)?, ops.get(Variable::Time)?],
        "interest rate (Is / Pt)",
    )
}

/// t = Is / (P × r)
pub(crate) fn time(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::SimpleInterest)?],
        vec![ops.get(Variable::Principal)?, ops.get(Variable::NominalRate)?],
        "time (Is / Pr)",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GresaError;
    use crate::evaluator::operands_for;
    use rust_decimal_macros::dec;

    fn base() -> Operands {
        operands_for(
            &[
                (Variable::Principal, dec!(10000)),
                (Variable::NominalRate, dec!(0.08)),
                (Variable::Time, dec!(5)),
                (Variable::SimpleInterest, dec!(4000)),
                (Variable::FutureValue, dec!(14000)),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_interest() {
        assert_eq!(interest(&base()).unwrap().result(), dec!(4000));
    }

    #[test]
    fn test_maturity_both_ways_agree() {
        let ops = base();
        assert_eq!(maturity(&ops).unwrap().result(), dec!(14000));
        assert_eq!(maturity_from_interest(&ops).unwrap().result(), dec!(14000));
    }

    #[test]
    fn test_inversions_recover_inputs() {
        let ops = base();
        assert_eq!(principal(&ops).unwrap().result(), dec!(10000));
        assert_eq!(principal_from_maturity(&ops).unwrap().result(), dec!(10000));
        assert_eq!(rate(&ops).unwrap().result(), dec!(0.08));
        assert_eq!(time(&ops).unwrap().result(), dec!(5));
    }

    #[test]
    fn test_maturity_overflow_is_invalid_input() {
        let ops = operands_for(
            &[
                (Variable::Principal, dec!(1)),
                (Variable::NominalRate, Decimal::MAX),
                (Variable::Time, dec!(1)),
            ],
            Vec::new(),
        );
        let err = maturity(&ops).unwrap_err();
        assert!(matches!(err, GresaError::InvalidInput { .. }));
    }

    #[test]
    fn test_zero_time_divisor() {
        let ops = operands_for(
            &[
                (Variable::SimpleInterest, dec!(100)),
                (Variable::Principal, dec!(1000)),
                (Variable::Time, Decimal::ZERO),
            ],
            Vec::new(),
        );
        assert!(matches!(rate(&ops), Err(GresaError::DivisionByZero { .. })));
    }
}
