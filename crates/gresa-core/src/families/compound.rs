use rust_decimal::Decimal;

use crate::error::GresaError;
use crate::evaluator::{Operands, Workings};
use crate::registry::Variable;
use crate::time_value::{
    checked_add, checked_div, checked_mul, checked_pow, compound_factor, natural_log,
};
use crate::GresaResult;

/// F = P(1 + i)^n
pub(crate) fn future_value(ops: &Operands) -> GresaResult<Workings> {
    let principal = ops.get(Variable::Principal)?;
    let rate = ops.get(Variable::RatePerPeriod)?;
    let periods = ops.get(Variable::PeriodCount)?;
    let growth = compound_factor(rate, periods)?;
    let result = checked_mul(principal, growth, "compound amount")?;
    Ok(Workings::CompoundGrowth {
        principal,
        rate,
        periods,
        growth,
        result,
    })
}

/// P = F / (1 + i)^n
pub(crate) fn present_value(ops: &Operands) -> GresaResult<Workings> {
    let future = ops.get(Variable::FutureValue)?;
    let rate = ops.get(Variable::RatePerPeriod)?;
    let periods = ops.get(Variable::PeriodCount)?;
    let growth = compound_factor(rate, periods)?;
    let result = checked_div(future, growth, "present value (F / (1 + i)^n)")?;
    Ok(Workings::CompoundDiscount {
        future,
        rate,
        periods,
        growth,
        result,
    })
}

/// r = m × [(F/P)^(1/n) - 1]
pub(crate) fn nominal_rate(ops: &Operands) -> GresaResult<Workings> {
    let future = ops.get(Variable::FutureValue)?;
    let principal = ops.get(Variable::Principal)?;
    let frequency = ops.get(Variable::Frequency)?;
    let periods = ops.get(Variable::PeriodCount)?;

    let ratio = checked_div(future, principal, "nominal rate (F/P)")?;
    let exponent = checked_div(Decimal::ONE, periods, "nominal rate (1/n)")?;
    let root = checked_pow(ratio, exponent, "nominal rate")?;
    let excess = root - Decimal::ONE;
    let result = checked_mul(frequency, excess, "nominal rate")?;
    Ok(Workings::CompoundRate {
        future,
        principal,
        frequency,
        periods,
        ratio,
        root,
        excess,
        result,
    })
}

/// t = ln(F/P) / (m × ln(1 + i))
pub(crate) fn time(ops: &Operands) -> GresaResult<Workings> {
    let future = ops.get(Variable::FutureValue)?;
    let principal = ops.get(Variable::Principal)?;
    let frequency = ops.get(Variable::Frequency)?;
    let rate = ops.get(Variable::RatePerPeriod)?;
    if rate.is_zero() {
        return Err(GresaError::division_by_zero("time: ln(1 + i) is zero"));
    }

    if future < principal {
        return Err(GresaError::invalid(
            Variable::FutureValue.key(),
            "Must not be less than the principal",
        ));
    }

    let ratio = checked_div(future, principal, "time (F/P)")?;
    let log_ratio = natural_log(ratio, "F/P")?;
    let log_growth = natural_log(checked_add(Decimal::ONE, rate, "1 + i")?, "1 + i")?;
    let denominator = checked_mul(frequency, log_growth, "time")?;
    let result = checked_div(log_ratio, denominator, "time: m × ln(1 + i) is zero")?;
    Ok(Workings::CompoundTime {
        future,
        principal,
        frequency,
        rate,
        log_ratio,
        log_growth,
        denominator,
        result,
    })
}
