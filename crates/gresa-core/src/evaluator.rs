//! Formula evaluation.
//!
//! Raw inputs are parsed and range-checked, derived quantities are computed
//! and settled under the family precision mode, and the formula body produces
//! a [`Workings`] value holding every intermediate quantity exactly once. The
//! step trace and the GRESA presentation are rendered from those same values.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::GresaError;
use crate::families::{annuity, bonds, compound, loans, simple_interest, stocks};
use crate::format::Formatter;
use crate::precision::{DerivedValue, PrecisionMode};
use crate::registry::{self, DerivationRule, Domain, Family, FormulaId, FormulaSpec, Variable};
use crate::time_value::{self, checked_div, checked_mul, AnnuityFactor};
use crate::trace::{self, Presentation, TraceStage};
use crate::types::{with_metadata, ComputationOutput, EvaluationRequest};
use crate::GresaResult;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A parsed, range-checked input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputValue {
    pub variable: Variable,
    pub value: Decimal,
}

/// Outcome of one evaluation. Dropping it is the "reset" action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub formula: FormulaId,
    pub family: Family,
    pub solved_for: Variable,
    pub precision_mode: PrecisionMode,
    pub final_value: Decimal,
    /// `final_value` formatted per the solved-for variable
    pub display_value: String,
    pub inputs: Vec<InputValue>,
    pub derived_values: Vec<DerivedValue>,
    pub step_trace: Vec<TraceStage>,
    pub presentation: Presentation,
}

impl EvaluationResult {
    pub fn derived(&self, variable: Variable) -> Option<&DerivedValue> {
        self.derived_values.iter().find(|d| d.variable() == variable)
    }

    pub fn final_stage(&self) -> Option<&TraceStage> {
        self.step_trace.last()
    }
}

// ---------------------------------------------------------------------------
// Workings
// ---------------------------------------------------------------------------

/// Every intermediate quantity of one formula evaluation, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workings {
    /// a × b × ...
    Product { factors: Vec<Decimal>, result: Decimal },
    /// a + b + ...
    Sum { terms: Vec<Decimal>, result: Decimal },
    /// a - b
    Difference {
        minuend: Decimal,
        subtrahend: Decimal,
        result: Decimal,
    },
    /// (a × b × ...) / (c × d × ...)
    Quotient {
        numerator: Vec<Decimal>,
        denominator: Vec<Decimal>,
        numerator_value: Decimal,
        denominator_value: Decimal,
        result: Decimal,
    },
    /// P(1 + rt)
    SimpleAccumulation {
        principal: Decimal,
        rate: Decimal,
        time: Decimal,
        growth: Decimal,
        result: Decimal,
    },
    /// P(1 + i)^n
    CompoundGrowth {
        principal: Decimal,
        rate: Decimal,
        periods: Decimal,
        growth: Decimal,
        result: Decimal,
    },
    /// F / (1 + i)^n
    CompoundDiscount {
        future: Decimal,
        rate: Decimal,
        periods: Decimal,
        growth: Decimal,
        result: Decimal,
    },
    /// m × [(F/P)^(1/n) - 1]
    CompoundRate {
        future: Decimal,
        principal: Decimal,
        frequency: Decimal,
        periods: Decimal,
        ratio: Decimal,
        root: Decimal,
        excess: Decimal,
        result: Decimal,
    },
    /// ln(F/P) / (m × ln(1 + i))
    CompoundTime {
        future: Decimal,
        principal: Decimal,
        frequency: Decimal,
        rate: Decimal,
        log_ratio: Decimal,
        log_growth: Decimal,
        denominator: Decimal,
        result: Decimal,
    },
    /// R × factor
    AnnuityValue {
        payment: Decimal,
        factor: AnnuityFactor,
        result: Decimal,
    },
    /// amount / factor
    AnnuityPayment {
        amount: Decimal,
        factor: AnnuityFactor,
        result: Decimal,
    },
    /// R × a(k+n) - R × a(k)
    DeferredPresent {
        payment: Decimal,
        deferral: Decimal,
        periods: Decimal,
        total: AnnuityFactor,
        deferred: AnnuityFactor,
        total_term: Decimal,
        deferred_term: Decimal,
        result: Decimal,
    },
    /// R × n - P
    TotalInterest {
        payment: Decimal,
        periods: Decimal,
        principal: Decimal,
        paid: Decimal,
        result: Decimal,
    },
}

impl Workings {
    pub(crate) fn product(factors: Vec<Decimal>, context: &str) -> GresaResult<Self> {
        let result = multiply_all(&factors, context)?;
        Ok(Workings::Product { factors, result })
    }

    pub(crate) fn sum(terms: Vec<Decimal>, context: &str) -> GresaResult<Self> {
        let result = terms.iter().try_fold(Decimal::ZERO, |acc, term| {
            acc.checked_add(*term)
                .ok_or_else(|| GresaError::invalid(context, "Result exceeds the decimal range"))
        })?;
        Ok(Workings::Sum { terms, result })
    }

    pub(crate) fn difference(minuend: Decimal, subtrahend: Decimal, context: &str) -> GresaResult<Self> {
        let result = minuend
            .checked_sub(subtrahend)
            .ok_or_else(|| GresaError::invalid(context, "Result exceeds the decimal range"))?;
        Ok(Workings::Difference {
            minuend,
            subtrahend,
            result,
        })
    }

    pub(crate) fn quotient(
        numerator: Vec<Decimal>,
        denominator: Vec<Decimal>,
        context: &str,
    ) -> GresaResult<Self> {
        let numerator_value = multiply_all(&numerator, context)?;
        let denominator_value = multiply_all(&denominator, context)?;
        let result = checked_div(numerator_value, denominator_value, context)?;
        Ok(Workings::Quotient {
            numerator,
            denominator,
            numerator_value,
            denominator_value,
            result,
        })
    }

    pub fn result(&self) -> Decimal {
        match self {
            Workings::Product { result, .. }
            | Workings::Sum { result, .. }
            | Workings::Difference { result, .. }
            | Workings::Quotient { result, .. }
            | Workings::SimpleAccumulation { result, .. }
            | Workings::CompoundGrowth { result, .. }
            | Workings::CompoundDiscount { result, .. }
            | Workings::CompoundRate { result, .. }
            | Workings::CompoundTime { result, .. }
            | Workings::AnnuityValue { result, .. }
            | Workings::AnnuityPayment { result, .. }
            | Workings::DeferredPresent { result, .. }
            | Workings::TotalInterest { result, .. } => *result,
        }
    }
}

fn multiply_all(factors: &[Decimal], context: &str) -> GresaResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, factor| checked_mul(acc, *factor, context))
}

// ---------------------------------------------------------------------------
// Operands
// ---------------------------------------------------------------------------

/// Inputs and settled derived values available to a formula body.
#[derive(Debug, Clone)]
pub(crate) struct Operands {
    inputs: Vec<InputValue>,
    derived: Vec<DerivedValue>,
}

impl Operands {
    /// Derived values shadow inputs, so a formula always sees the settled
    /// rate rather than anything recomputed.
    pub(crate) fn get(&self, variable: Variable) -> GresaResult<Decimal> {
        self.derived
            .iter()
            .find(|d| d.variable() == variable)
            .map(DerivedValue::value)
            .or_else(|| {
                self.inputs
                    .iter()
                    .find(|input| input.variable == variable)
                    .map(|input| input.value)
            })
            .ok_or_else(|| GresaError::invalid(variable.key(), "Missing required input"))
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate with the default formatter configuration.
pub fn evaluate(request: &EvaluationRequest) -> GresaResult<EvaluationResult> {
    evaluate_with(request, &Formatter::default())
}

/// Evaluate and render display strings with `formatter`.
pub fn evaluate_with(
    request: &EvaluationRequest,
    formatter: &Formatter,
) -> GresaResult<EvaluationResult> {
    let spec = registry::lookup(&request.formula)?;
    let inputs = parse_inputs(spec, request)?;
    let derived = derive(spec, &inputs)?;

    for value in &derived {
        debug!(
            formula = %spec.id,
            variable = %value.variable(),
            value = %value.value(),
            rounded = value.was_rounded(),
            "derived quantity settled"
        );
    }

    let operands = Operands { inputs, derived };
    let workings = solve(spec.id, &operands)?;
    let final_value = workings.result();
    debug!(formula = %spec.id, result = %final_value, "evaluation complete");

    let step_trace = trace::build_trace(spec, &workings, formatter);
    let Operands { inputs, derived } = operands;
    let presentation = trace::present(spec, &inputs, &derived, final_value, formatter);

    Ok(EvaluationResult {
        formula: spec.id,
        family: spec.family,
        solved_for: spec.solved_for,
        precision_mode: spec.precision_mode(),
        final_value,
        display_value: formatter.variable(spec.solved_for, final_value),
        inputs,
        derived_values: derived,
        step_trace,
        presentation,
    })
}

/// Evaluate and wrap the result in the standard output envelope.
pub fn evaluate_with_metadata(
    request: &EvaluationRequest,
    formatter: &Formatter,
) -> GresaResult<ComputationOutput<EvaluationResult>> {
    let start = Instant::now();
    let spec = registry::lookup(&request.formula)?;
    let result = evaluate_with(request, formatter)?;

    let mut warnings: Vec<String> = request
        .inputs
        .keys()
        .filter(|key| spec.required_inputs().all(|v| v.key() != key.as_str()))
        .map(|key| format!("Input '{key}' is not used by {}", spec.id))
        .collect();
    for value in result.derived_values.iter().filter(|d| d.was_rounded()) {
        warnings.push(format!(
            "{} was rounded to {} decimal places before use",
            value.variable().descriptor().name,
            crate::precision::INTERMEDIATE_DECIMAL_PLACES
        ));
    }

    let assumptions = serde_json::json!({
        "formula": spec.id,
        "equation": spec.equation,
        "precision_mode": spec.precision_mode(),
        "currency_symbol": formatter.config().currency_symbol,
    });
    let methodology = format!("{}: {}", spec.family.label(), spec.description);
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(&methodology, &assumptions, warnings, elapsed, result))
}

fn parse_inputs(spec: &FormulaSpec, request: &EvaluationRequest) -> GresaResult<Vec<InputValue>> {
    spec.inputs
        .iter()
        .map(|input| {
            let key = input.variable.key();
            let raw = request.inputs.get(key).ok_or_else(|| {
                warn!(formula = %spec.id, field = key, "missing required input");
                GresaError::invalid(key, "Missing required input")
            })?;
            let value = raw.parse(key).inspect_err(|e| {
                warn!(formula = %spec.id, field = key, error = %e, "non-numeric input");
            })?;
            check_domain(input.domain, key, value).inspect_err(|e| {
                warn!(formula = %spec.id, field = key, error = %e, "input out of range");
            })?;
            Ok(InputValue {
                variable: input.variable,
                value,
            })
        })
        .collect()
}

fn check_domain(domain: Domain, field: &str, value: Decimal) -> GresaResult<()> {
    match domain {
        Domain::Any => Ok(()),
        Domain::NonNegative if value < Decimal::ZERO => {
            Err(GresaError::invalid(field, "Must not be negative"))
        }
        Domain::Positive if value <= Decimal::ZERO => {
            Err(GresaError::invalid(field, "Must be greater than zero"))
        }
        Domain::NonNegative | Domain::Positive => Ok(()),
    }
}

/// Compute derived quantities in declaration order and settle each one.
/// Period counts are exact products and stay continuous in every family.
fn derive(spec: &FormulaSpec, inputs: &[InputValue]) -> GresaResult<Vec<DerivedValue>> {
    let raw = Operands {
        inputs: inputs.to_vec(),
        derived: Vec::new(),
    };
    spec.derived
        .iter()
        .map(|rule| {
            let exact = match rule {
                DerivationRule::RatePerPeriod => time_value::rate_per_period(
                    raw.get(Variable::NominalRate)?,
                    raw.get(Variable::Frequency)?,
                )?,
                DerivationRule::EquivalentRate => time_value::equivalent_rate(
                    raw.get(Variable::NominalRate)?,
                    raw.get(Variable::PaymentFrequency)?,
                    raw.get(Variable::CompoundingFrequency)?,
                )?,
                DerivationRule::PeriodCount => time_value::period_count(
                    raw.get(Variable::Frequency)?,
                    raw.get(Variable::Time)?,
                )?,
                DerivationRule::PaymentCount => time_value::period_count(
                    raw.get(Variable::PaymentFrequency)?,
                    raw.get(Variable::Time)?,
                )?,
            };
            let mode = if rule.is_rate() {
                spec.precision_mode()
            } else {
                PrecisionMode::Continuous
            };
            Ok(DerivedValue::settle(rule.target(), exact, mode))
        })
        .collect()
}

fn solve(id: FormulaId, operands: &Operands) -> GresaResult<Workings> {
    match id {
        FormulaId::IsPrt => simple_interest::interest(operands),
        FormulaId::FPplusIs => simple_interest::maturity_from_interest(operands),
        FormulaId::FPrt => simple_interest::maturity(operands),
        FormulaId::PFminusIs => simple_interest::principal_from_maturity(operands),
        FormulaId::PIsrt => simple_interest::principal(operands),
        FormulaId::RIsPt => simple_interest::rate(operands),
        FormulaId::TIsPr => simple_interest::time(operands),
        FormulaId::FCompound => compound::future_value(operands),
        FormulaId::PCompound => compound::present_value(operands),
        FormulaId::RCompound => compound::nominal_rate(operands),
        FormulaId::TCompound => compound::time(operands),
        FormulaId::FAnnuity | FormulaId::FGeneral => annuity::future_value(operands),
        FormulaId::PAnnuity | FormulaId::PGeneral => annuity::present_value(operands),
        FormulaId::RFromF | FormulaId::RGeneralFromF => annuity::payment_from_future(operands),
        FormulaId::RFromP | FormulaId::RGeneralFromP => annuity::payment_from_present(operands),
        FormulaId::PDeferred => annuity::deferred_present_value(operands),
        FormulaId::RLoan => loans::payment(operands),
        FormulaId::ILoan => loans::total_interest(operands),
        FormulaId::Coupon => bonds::coupon(operands),
        FormulaId::CouponSemiannual => bonds::semiannual_coupon(operands),
        FormulaId::MarketPrice => bonds::market_price(operands),
        FormulaId::TotalInvestment => bonds::total_investment(operands),
        FormulaId::AnnualIncome => bonds::annual_income(operands),
        FormulaId::AmountInvested => bonds::amount_invested(operands),
        FormulaId::BondYield => bonds::current_yield(operands),
        FormulaId::DpsTotal => stocks::dividend_per_share(operands),
        FormulaId::DpsPar => stocks::preferred_dividend_per_share(operands),
        FormulaId::TotalDividend => stocks::total_dividend(operands),
        FormulaId::TotalShares => stocks::share_count(operands),
        FormulaId::StockYield => stocks::stock_yield(operands),
    }
}

#[cfg(test)]
pub(crate) fn operands_for(inputs: &[(Variable, Decimal)], derived: Vec<DerivedValue>) -> Operands {
    Operands {
        inputs: inputs
            .iter()
            .map(|&(variable, value)| InputValue { variable, value })
            .collect(),
        derived,
    }
}
