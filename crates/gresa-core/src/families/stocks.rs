use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GresaError;
use crate::evaluator::{Operands, Workings};
use crate::format::{FormatKind, Formatter};
use crate::registry::Variable;
use crate::time_value::{checked_div, checked_mul};
use crate::trace::TraceStage;
use crate::types::{Money, Rate};
use crate::GresaResult;

// ---------------------------------------------------------------------------
// Formula bodies
// ---------------------------------------------------------------------------

/// Dividend per Share = Total Dividend / Shares
pub(crate) fn dividend_per_share(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::TotalDividend)?],
        vec![ops.get(Variable::TotalShares)?],
        "dividend per share",
    )
}

/// Dividend per Share = Par Value × Dividend % / 100
pub(crate) fn preferred_dividend_per_share(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::ParValue)?, ops.get(Variable::DividendPercent)?],
        vec![dec!(100)],
        "preferred dividend per share",
    )
}

/// Total Dividend = Dividend per Share × Shares
pub(crate) fn total_dividend(ops: &Operands) -> GresaResult<Workings> {
    Workings::product(
        vec![ops.get(Variable::DividendPerShare)?, ops.get(Variable::TotalShares)?],
        "total dividend",
    )
}

/// Shares = Total Dividend / Dividend per Share
pub(crate) fn share_count(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::TotalDividend)?],
        vec![ops.get(Variable::DividendPerShare)?],
        "number of shares",
    )
}

/// Stock Yield Ratio = Dividend per Share / Market Value
pub(crate) fn stock_yield(ops: &Operands) -> GresaResult<Workings> {
    let workings = Workings::quotient(
        vec![ops.get(Variable::DividendPerShare)?],
        vec![ops.get(Variable::MarketValue)?],
        "stock yield ratio",
    )?;
    percent_scale(workings.result())?;
    Ok(workings)
}

/// The ratio must stay representable once shown as a percentage.
fn percent_scale(ratio: Rate) -> GresaResult<Rate> {
    checked_mul(ratio, dec!(100), "stock yield ratio (%)")
}

// ---------------------------------------------------------------------------
// Yield comparison
// ---------------------------------------------------------------------------

/// One company's dividend and share price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub name: String,
    pub dividend_per_share: Money,
    pub market_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldComparisonInput {
    pub first: StockQuote,
    pub second: StockQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    First,
    Second,
    Equal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotedYield {
    pub name: String,
    pub yield_ratio: Rate,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldComparison {
    pub first: QuotedYield,
    pub second: QuotedYield,
    pub preferred: Preference,
    pub recommendation: String,
    pub step_trace: Vec<TraceStage>,
}

impl YieldComparison {
    /// The better investment, or `None` when the yields tie.
    pub fn winner(&self) -> Option<&QuotedYield> {
        match self.preferred {
            Preference::First => Some(&self.first),
            Preference::Second => Some(&self.second),
            Preference::Equal => None,
        }
    }
}

/// Compare the stock yield ratio of two companies. The higher ratio is the
/// better investment.
pub fn compare_yields(
    input: &YieldComparisonInput,
    formatter: &Formatter,
) -> GresaResult<YieldComparison> {
    let mut step_trace = Vec::with_capacity(5);
    let first = quoted_yield(&input.first, "first", formatter, &mut step_trace)?;
    let second = quoted_yield(&input.second, "second", formatter, &mut step_trace)?;

    let preferred = match first.yield_ratio.cmp(&second.yield_ratio) {
        std::cmp::Ordering::Greater => Preference::First,
        std::cmp::Ordering::Less => Preference::Second,
        std::cmp::Ordering::Equal => Preference::Equal,
    };
    let recommendation = match preferred {
        Preference::First => format!(
            "{} has the higher stock yield ratio ({} > {}), so it is the better investment.",
            first.name, first.display, second.display
        ),
        Preference::Second => format!(
            "{} has the higher stock yield ratio ({} > {}), so it is the better investment.",
            second.name, second.display, first.display
        ),
        Preference::Equal => format!(
            "{} and {} have the same stock yield ratio ({}).",
            first.name, second.name, first.display
        ),
    };
    step_trace.push(TraceStage::result(recommendation.clone()));
    debug!(?preferred, first = %first.yield_ratio, second = %second.yield_ratio, "stock yields compared");

    Ok(YieldComparison {
        first,
        second,
        preferred,
        recommendation,
        step_trace,
    })
}

fn quoted_yield(
    quote: &StockQuote,
    position: &str,
    formatter: &Formatter,
    step_trace: &mut Vec<TraceStage>,
) -> GresaResult<QuotedYield> {
    if quote.dividend_per_share < Decimal::ZERO {
        return Err(GresaError::invalid(
            format!("{position}.dividend_per_share"),
            "Must not be negative",
        ));
    }
    if quote.market_value <= Decimal::ZERO {
        return Err(GresaError::invalid(
            format!("{position}.market_value"),
            "Must be greater than zero",
        ));
    }
    let yield_ratio = checked_div(quote.dividend_per_share, quote.market_value, "stock yield ratio")?;
    percent_scale(yield_ratio)?;
    let display = formatter.format(yield_ratio, FormatKind::Percent);
    let lhs = format!("\\text{{Stock Yield Ratio}}_{{\\text{{{}}}}}", quote.name);
    step_trace.push(TraceStage::substitution(format!(
        "{lhs} = \\dfrac{{{}}}{{{}}}",
        formatter.format(quote.dividend_per_share, FormatKind::Decimal),
        formatter.format(quote.market_value, FormatKind::Decimal),
    )));
    step_trace.push(TraceStage::result(format!("{lhs} = {display}")));
    Ok(QuotedYield {
        name: quote.name.clone(),
        yield_ratio,
        display,
    })
}
