use rust_decimal_macros::dec;

use crate::evaluator::{Operands, Workings};
use crate::registry::Variable;
use crate::GresaResult;

/// Coupon = F × r / m1
pub(crate) fn coupon(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::FaceValue)?, ops.get(Variable::CouponRate)?],
        vec![ops.get(Variable::CouponFrequency)?],
        "coupon (F × r / m1)",
    )
}

/// Coupon = F × r / 2
pub(crate) fn semiannual_coupon(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::FaceValue)?, ops.get(Variable::CouponRate)?],
        vec![dec!(2)],
        "semi-annual coupon",
    )
}

/// Market Price = F × Quotation
pub(crate) fn market_price(ops: &Operands) -> GresaResult<Workings> {
    Workings::product(
        vec![ops.get(Variable::FaceValue)?, ops.get(Variable::Quotation)?],
        "market price",
    )
}

/// Total Investment = N × F × Quotation
pub(crate) fn total_investment(ops: &Operands) -> GresaResult<Workings> {
    Workings::product(
        vec![
            ops.get(Variable::NumberOfBonds)?,
            ops.get(Variable::FaceValue)?,
            ops.get(Variable::Quotation)?,
        ],
        "total investment",
    )
}

/// Annual Income = N × F × r × t
pub(crate) fn annual_income(ops: &Operands) -> GresaResult<Workings> {
    Workings::product(
        vec![
            ops.get(Variable::NumberOfBonds)?,
            ops.get(Variable::FaceValue)?,
            ops.get(Variable::NominalRate)?,
            ops.get(Variable::Time)?,
        ],
        "annual income",
    )
}

/// Amount Invested = Market Price + Commission
pub(crate) fn amount_invested(ops: &Operands) -> GresaResult<Workings> {
    Workings::sum(
        vec![ops.get(Variable::MarketPrice)?, ops.get(Variable::Commission)?],
        "amount invested",
    )
}

/// Yield = Annual Income / Amount Invested
pub(crate) fn current_yield(ops: &Operands) -> GresaResult<Workings> {
    Workings::quotient(
        vec![ops.get(Variable::AnnualIncome)?],
        vec![ops.get(Variable::AmountInvested)?],
        "yield: amount invested is zero",
    )
}
