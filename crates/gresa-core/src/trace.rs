//! Step traces and the GRESA (Given, Required, Equation, Solution, Answer)
//! presentation.
//!
//! Nothing here does arithmetic. Every number in a stage is read from the
//! [`Workings`] the evaluator produced, so the trace shows exactly the values
//! (rounded or not) that the final answer was computed from.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::evaluator::{InputValue, Workings};
use crate::format::{FormatKind, Formatter};
use crate::precision::{DerivedValue, PrecisionMode, INTERMEDIATE_DECIMAL_PLACES};
use crate::registry::{DerivationRule, FormulaSpec, Variable};
use crate::time_value::{AnnuityFactor, FactorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Substitution,
    Simplification,
    Result,
}

/// One rendered line of a worked solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStage {
    pub kind: StageKind,
    pub expression: String,
}

impl TraceStage {
    pub(crate) fn substitution(expression: impl Into<String>) -> Self {
        TraceStage {
            kind: StageKind::Substitution,
            expression: expression.into(),
        }
    }

    pub(crate) fn simplification(expression: impl Into<String>) -> Self {
        TraceStage {
            kind: StageKind::Simplification,
            expression: expression.into(),
        }
    }

    pub(crate) fn result(expression: impl Into<String>) -> Self {
        TraceStage {
            kind: StageKind::Result,
            expression: expression.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Step trace
// ---------------------------------------------------------------------------

struct Renderer<'a> {
    lhs: &'static str,
    formatter: &'a Formatter,
}

impl Renderer<'_> {
    fn num(&self, value: Decimal) -> String {
        self.formatter.format(value, FormatKind::Decimal)
    }

    fn joined(&self, values: &[Decimal], separator: &str) -> String {
        values
            .iter()
            .map(|v| self.num(*v))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn line(&self, rhs: impl AsRef<str>) -> String {
        format!("{} = {}", self.lhs, rhs.as_ref())
    }

    /// (1 + i)^{n} or (1 + i)^{-n}
    fn power(&self, factor: &AnnuityFactor) -> String {
        let sign = match factor.kind {
            FactorKind::Accumulation => "",
            FactorKind::Discount => "-",
        };
        format!("(1 + {})^{{{sign}{}}}", self.num(factor.rate), self.num(factor.periods))
    }

    /// Annuity factor fraction with its numerator given as `numerator`.
    fn fraction(&self, factor: &AnnuityFactor, numerator: String) -> String {
        format!("\\dfrac{{{numerator}}}{{{}}}", self.num(factor.rate))
    }

    /// The annuity factor at each stage of its reduction: symbolic power,
    /// evaluated power, reduced numerator, final value.
    fn factor_stages(&self, factor: &AnnuityFactor) -> [String; 4] {
        let (substituted, powered) = match factor.kind {
            FactorKind::Accumulation => (
                format!("{} - 1", self.power(factor)),
                format!("{} - 1", self.num(factor.power)),
            ),
            FactorKind::Discount => (
                format!("1 - {}", self.power(factor)),
                format!("1 - {}", self.num(factor.power)),
            ),
        };
        [
            self.fraction(factor, substituted),
            self.fraction(factor, powered),
            self.fraction(factor, self.num(factor.numerator)),
            self.num(factor.value),
        ]
    }
}

/// Render the worked solution. The stage count depends only on the formula;
/// the last stage is always the solved-for variable with its display value.
pub fn build_trace(spec: &FormulaSpec, workings: &Workings, formatter: &Formatter) -> Vec<TraceStage> {
    let r = Renderer {
        lhs: spec.solved_for.symbol(),
        formatter,
    };
    let mut stages = match workings {
        Workings::Product { factors, .. } => {
            vec![TraceStage::substitution(r.line(r.joined(factors, " \\times ")))]
        }
        Workings::Sum { terms, .. } => {
            vec![TraceStage::substitution(r.line(r.joined(terms, " + ")))]
        }
        Workings::Difference {
            minuend,
            subtrahend,
            ..
        } => vec![TraceStage::substitution(
            r.line(format!("{} - {}", r.num(*minuend), r.num(*subtrahend))),
        )],
        Workings::Quotient {
            numerator,
            denominator,
            numerator_value,
            denominator_value,
            ..
        } => vec![
            TraceStage::substitution(r.line(format!(
                "\\dfrac{{{}}}{{{}}}",
                r.joined(numerator, " \\times "),
                r.joined(denominator, " \\times ")
            ))),
            TraceStage::simplification(r.line(format!(
                "\\dfrac{{{}}}{{{}}}",
                r.num(*numerator_value),
                r.num(*denominator_value)
            ))),
        ],
        Workings::SimpleAccumulation {
            principal,
            rate,
            time,
            growth,
            ..
        } => vec![
            TraceStage::substitution(r.line(format!(
                "{}(1 + {} \\times {})",
                r.num(*principal),
                r.num(*rate),
                r.num(*time)
            ))),
            TraceStage::simplification(r.line(format!("{}({})", r.num(*principal), r.num(*growth)))),
        ],
        Workings::CompoundGrowth {
            principal,
            rate,
            periods,
            growth,
            ..
        } => vec![
            TraceStage::substitution(r.line(format!(
                "{}(1 + {})^{{{}}}",
                r.num(*principal),
                r.num(*rate),
                r.num(*periods)
            ))),
            TraceStage::simplification(r.line(format!("{}({})", r.num(*principal), r.num(*growth)))),
        ],
        Workings::CompoundDiscount {
            future,
            rate,
            periods,
            growth,
            ..
        } => vec![
            TraceStage::substitution(r.line(format!(
                "\\dfrac{{{}}}{{(1 + {})^{{{}}}}}",
                r.num(*future),
                r.num(*rate),
                r.num(*periods)
            ))),
            TraceStage::simplification(r.line(format!(
                "\\dfrac{{{}}}{{{}}}",
                r.num(*future),
                r.num(*growth)
            ))),
        ],
        Workings::CompoundRate {
            future,
            principal,
            frequency,
            periods,
            ratio,
            root,
            excess,
            ..
        } => {
            let m = r.num(*frequency);
            let n = r.num(*periods);
            vec![
                TraceStage::substitution(r.line(format!(
                    "{m} \\times \\left[\\left(\\dfrac{{{}}}{{{}}}\\right)^{{\\frac{{1}}{{{n}}}}} - 1\\right]",
                    r.num(*future),
                    r.num(*principal)
                ))),
                TraceStage::simplification(r.line(format!(
                    "{m} \\times \\left[({})^{{\\frac{{1}}{{{n}}}}} - 1\\right]",
                    r.num(*ratio)
                ))),
                TraceStage::simplification(r.line(format!("{m} \\times ({} - 1)", r.num(*root)))),
                TraceStage::simplification(r.line(format!("{m} \\times {}", r.num(*excess)))),
            ]
        }
        Workings::CompoundTime {
            future,
            principal,
            frequency,
            rate,
            log_ratio,
            log_growth,
            denominator,
            ..
        } => vec![
            TraceStage::substitution(r.line(format!(
                "\\dfrac{{\\ln({}/{})}}{{{} \\cdot \\ln(1 + {})}}",
                r.num(*future),
                r.num(*principal),
                r.num(*frequency),
                r.num(*rate)
            ))),
            TraceStage::simplification(r.line(format!(
                "\\dfrac{{{}}}{{{} \\cdot {}}}",
                r.num(*log_ratio),
                r.num(*frequency),
                r.num(*log_growth)
            ))),
            TraceStage::simplification(r.line(format!(
                "\\dfrac{{{}}}{{{}}}",
                r.num(*log_ratio),
                r.num(*denominator)
            ))),
        ],
        Workings::AnnuityValue { payment, factor, .. } => {
            let [substituted, powered, reduced, value] = r.factor_stages(factor);
            let payment = r.num(*payment);
            vec![
                TraceStage::substitution(r.line(format!("{payment}\\left({substituted}\\right)"))),
                TraceStage::simplification(r.line(format!("{payment}\\left({powered}\\right)"))),
                TraceStage::simplification(r.line(format!("{payment}\\left({reduced}\\right)"))),
                TraceStage::simplification(r.line(format!("{payment}({value})"))),
            ]
        }
        Workings::AnnuityPayment { amount, factor, .. } => {
            let [substituted, powered, reduced, value] = r.factor_stages(factor);
            let amount = r.num(*amount);
            vec![
                TraceStage::substitution(r.line(format!("\\dfrac{{{amount}}}{{{substituted}}}"))),
                TraceStage::simplification(r.line(format!("\\dfrac{{{amount}}}{{{powered}}}"))),
                TraceStage::simplification(r.line(format!("\\dfrac{{{amount}}}{{{reduced}}}"))),
                TraceStage::simplification(r.line(format!("\\dfrac{{{amount}}}{{{value}}}"))),
            ]
        }
        Workings::DeferredPresent {
            payment,
            deferral,
            periods,
            total,
            deferred,
            total_term,
            deferred_term,
            ..
        } => deferred_stages(&r, *payment, *deferral, *periods, total, deferred, *total_term, *deferred_term),
        Workings::TotalInterest {
            payment,
            periods,
            principal,
            paid,
            ..
        } => vec![
            TraceStage::substitution(r.line(format!(
                "{} \\times {} - {}",
                r.num(*payment),
                r.num(*periods),
                r.num(*principal)
            ))),
            TraceStage::simplification(r.line(format!("{} - {}", r.num(*paid), r.num(*principal)))),
        ],
    };
    stages.push(TraceStage::result(
        r.line(formatter.variable(spec.solved_for, workings.result())),
    ));
    stages
}

#[allow(clippy::too_many_arguments)]
fn deferred_stages(
    r: &Renderer<'_>,
    payment: Decimal,
    deferral: Decimal,
    periods: Decimal,
    total: &AnnuityFactor,
    deferred: &AnnuityFactor,
    total_term: Decimal,
    deferred_term: Decimal,
) -> Vec<TraceStage> {
    let rate = r.num(total.rate);
    let pay = r.num(payment);
    let k = r.num(deferral);
    let term = |numerator: String, factor: &AnnuityFactor| {
        format!("{pay}\\left({}\\right)", r.fraction(factor, numerator))
    };
    vec![
        TraceStage::substitution(r.line(format!(
            "{} - {}",
            term(format!("1 - (1 + {rate})^{{-({k} + {})}}", r.num(periods)), total),
            term(format!("1 - (1 + {rate})^{{-{k}}}"), deferred),
        ))),
        TraceStage::simplification(r.line(format!(
            "{} - {}",
            term(format!("1 - {}", r.power(total)), total),
            term(format!("1 - {}", r.power(deferred)), deferred),
        ))),
        TraceStage::simplification(r.line(format!(
            "{} - {}",
            term(format!("1 - {}", r.num(total.power)), total),
            term(format!("1 - {}", r.num(deferred.power)), deferred),
        ))),
        TraceStage::simplification(r.line(format!(
            "{} - {}",
            term(r.num(total.numerator), total),
            term(r.num(deferred.numerator), deferred),
        ))),
        TraceStage::simplification(r.line(format!(
            "{pay}({}) - {pay}({})",
            r.num(total.value),
            r.num(deferred.value)
        ))),
        TraceStage::simplification(r.line(format!(
            "{} - {}",
            r.num(total_term),
            r.num(deferred_term)
        ))),
    ]
}

// ---------------------------------------------------------------------------
// GRESA presentation
// ---------------------------------------------------------------------------

/// One line of the "Given" stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GivenEntry {
    pub variable: Variable,
    pub name: &'static str,
    pub symbol: &'static str,
    pub value: Decimal,
    pub display: String,
    /// Derivation rule for computed quantities, e.g. `i = r/m`
    pub rule: Option<&'static str>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredEntry {
    pub variable: Variable,
    pub name: &'static str,
    pub symbol: &'static str,
}

/// Given, Required, Equation and Answer. The Solution stage is the step trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub given: Vec<GivenEntry>,
    pub required: RequiredEntry,
    pub equation: &'static str,
    pub answer: String,
}

/// Build the GRESA stages around a finished evaluation.
pub fn present(
    spec: &FormulaSpec,
    inputs: &[InputValue],
    derived: &[DerivedValue],
    final_value: Decimal,
    formatter: &Formatter,
) -> Presentation {
    let given_inputs = inputs.iter().map(|input| {
        let descriptor = input.variable.descriptor();
        GivenEntry {
            variable: input.variable,
            name: descriptor.name,
            symbol: input.variable.symbol(),
            value: input.value,
            display: formatter.variable(input.variable, input.value),
            rule: None,
            note: None,
        }
    });
    let derived_entries = spec
        .derived
        .iter()
        .zip(derived)
        .map(|(rule, value)| given_derived(*rule, value, formatter));

    let descriptor = spec.solved_for.descriptor();
    Presentation {
        given: given_inputs.chain(derived_entries).collect(),
        required: RequiredEntry {
            variable: spec.solved_for,
            name: descriptor.name,
            symbol: spec.solved_for.symbol(),
        },
        equation: spec.equation,
        answer: format!(
            "{} = {}",
            descriptor.name,
            formatter.variable(spec.solved_for, final_value)
        ),
    }
}

fn given_derived(rule: DerivationRule, value: &DerivedValue, formatter: &Formatter) -> GivenEntry {
    let variable = value.variable();
    let note = match value.mode() {
        PrecisionMode::RoundedIntermediate => Some(format!(
            "rounded to {INTERMEDIATE_DECIMAL_PLACES} decimal places"
        )),
        PrecisionMode::Continuous => None,
    };
    GivenEntry {
        variable,
        name: variable.descriptor().name,
        symbol: variable.symbol(),
        value: value.value(),
        display: formatter.variable(variable, value.value()),
        rule: Some(rule.rule_text()),
        note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FormulaId;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_trace() {
        let workings = Workings::product(vec![dec!(10000), dec!(0.08), dec!(5)], "test").unwrap();
        let stages = build_trace(FormulaId::IsPrt.spec(), &workings, &Formatter::default());
        assert_eq!(
            stages,
            vec![
                TraceStage::substitution("I_s = 10000 \\times 0.08 \\times 5"),
                TraceStage::result("I_s = ₱4,000.00"),
            ]
        );
    }

    #[test]
    fn test_quotient_trace() {
        let workings = Workings::quotient(vec![dec!(100000), dec!(0.03)], vec![dec!(2)], "test").unwrap();
        let stages = build_trace(FormulaId::Coupon.spec(), &workings, &Formatter::default());
        assert_eq!(
            stages,
            vec![
                TraceStage::substitution("\\text{Coupon} = \\dfrac{100000 \\times 0.03}{2}"),
                TraceStage::simplification("\\text{Coupon} = \\dfrac{3000}{2}"),
                TraceStage::result("\\text{Coupon} = ₱1,500.00"),
            ]
        );
    }

    #[test]
    fn test_total_interest_trace() {
        let workings = Workings::TotalInterest {
            payment: dec!(8884.88),
            periods: dec!(12),
            principal: dec!(100000),
            paid: dec!(106618.56),
            result: dec!(6618.56),
        };
        let stages = build_trace(FormulaId::ILoan.spec(), &workings, &Formatter::default());
        assert_eq!(stages.len(), 3);
        assert_eq!(stages[1].expression, "I = 106618.56 - 100000");
        assert_eq!(stages[2].expression, "I = ₱6,618.56");
    }

    #[test]
    fn test_rounded_derived_value_is_noted() {
        let value = DerivedValue::settle(
            Variable::RatePerPeriod,
            dec!(0.08) / dec!(3),
            PrecisionMode::RoundedIntermediate,
        );
        let entry = given_derived(DerivationRule::RatePerPeriod, &value, &Formatter::default());
        assert_eq!(entry.display, "0.02666667");
        assert_eq!(entry.rule, Some("i = r/m"));
        assert_eq!(entry.note.as_deref(), Some("rounded to 8 decimal places"));
    }
}
