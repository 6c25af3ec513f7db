//! Static catalogue of variables and formulas.
//!
//! Every calculator screen maps onto a [`Family`]; every formula a learner can
//! pick maps onto a [`FormulaId`]. The tables here are `'static` and read-only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::GresaError;
use crate::format::FormatKind;
use crate::precision::PrecisionMode;
use crate::GresaResult;

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// Semantic type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Currency,
    Rate,
    Count,
    Duration,
}

/// Display metadata for a variable. Never consulted by arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableDescriptor {
    pub name: &'static str,
    pub kind: VariableKind,
    pub unit: &'static str,
    pub format: FormatKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Principal,
    PresentValue,
    FutureValue,
    SimpleInterest,
    NominalRate,
    Time,
    Frequency,
    PaymentFrequency,
    CompoundingFrequency,
    RatePerPeriod,
    PeriodCount,
    Payment,
    DeferralPeriods,
    TotalInterest,
    FaceValue,
    CouponRate,
    CouponFrequency,
    Coupon,
    Quotation,
    NumberOfBonds,
    MarketPrice,
    TotalInvestment,
    AnnualIncome,
    Commission,
    AmountInvested,
    BondYield,
    TotalDividend,
    TotalShares,
    DividendPerShare,
    ParValue,
    DividendPercent,
    MarketValue,
    StockYield,
}

const fn describe(
    name: &'static str,
    kind: VariableKind,
    unit: &'static str,
    format: FormatKind,
) -> VariableDescriptor {
    VariableDescriptor {
        name,
        kind,
        unit,
        format,
    }
}

impl Variable {
    /// Key under which the value appears in an [`EvaluationRequest`](crate::types::EvaluationRequest).
    pub fn key(self) -> &'static str {
        use Variable::*;
        match self {
            Principal | PresentValue => "P",
            FutureValue => "F",
            SimpleInterest => "Is",
            NominalRate => "r",
            Time => "t",
            Frequency => "m",
            PaymentFrequency => "m1",
            CompoundingFrequency => "m2",
            RatePerPeriod => "i",
            PeriodCount => "n",
            Payment => "R",
            DeferralPeriods => "k",
            TotalInterest => "I",
            FaceValue => "face_value",
            CouponRate => "coupon_rate",
            CouponFrequency => "payment_interval",
            Coupon => "coupon",
            Quotation => "quotation",
            NumberOfBonds => "num_bonds",
            MarketPrice => "market_price",
            TotalInvestment => "total_investment",
            AnnualIncome => "annual_income",
            Commission => "commission",
            AmountInvested => "amount_invested",
            BondYield => "yield",
            TotalDividend => "total_dividend",
            TotalShares => "total_shares",
            DividendPerShare => "dividend_per_share",
            ParValue => "par_value",
            DividendPercent => "dividend_percent",
            MarketValue => "market_value",
            StockYield => "stock_yield",
        }
    }

    /// LaTeX symbol used in equations and solution steps.
    pub fn symbol(self) -> &'static str {
        use Variable::*;
        match self {
            Principal | PresentValue => "P",
            FutureValue => "F",
            SimpleInterest => "I_s",
            NominalRate => "r",
            Time => "t",
            Frequency => "m",
            PaymentFrequency => "m_1",
            CompoundingFrequency => "m_2",
            RatePerPeriod => "i",
            PeriodCount => "n",
            Payment => "R",
            DeferralPeriods => "k",
            TotalInterest => "I",
            FaceValue => "F",
            CouponRate => "r",
            CouponFrequency => "m_1",
            Coupon => "\\text{Coupon}",
            Quotation => "\\text{Quotation}",
            NumberOfBonds => "N",
            MarketPrice => "\\text{Market Price}",
            TotalInvestment => "\\text{Total Investment}",
            AnnualIncome => "\\text{Annual Income}",
            Commission => "\\text{Commission}",
            AmountInvested => "\\text{Amount Invested}",
            BondYield => "\\text{Yield}",
            TotalDividend => "\\text{Total Dividend}",
            TotalShares => "\\text{Total Number of Shares}",
            DividendPerShare => "\\text{Dividend per Share}",
            ParValue => "\\text{Par Value}",
            DividendPercent => "\\text{Dividend Percentage}",
            MarketValue => "\\text{Market Value}",
            StockYield => "\\text{Stock Yield Ratio}",
        }
    }

    pub fn descriptor(self) -> VariableDescriptor {
        use FormatKind as Fmt;
        use Variable::*;
        use VariableKind as Kind;
        match self {
            Principal => describe("Principal", Kind::Currency, "₱", Fmt::Currency),
            PresentValue => describe("Present Value", Kind::Currency, "₱", Fmt::Currency),
            FutureValue => describe("Future Value", Kind::Currency, "₱", Fmt::Currency),
            SimpleInterest => describe("Simple Interest", Kind::Currency, "₱", Fmt::Currency),
            NominalRate => describe("Nominal Rate", Kind::Rate, "decimal", Fmt::Decimal),
            Time => describe("Time", Kind::Duration, "years", Fmt::Decimal),
            Frequency => describe("Frequency of Conversion", Kind::Count, "times per year", Fmt::Decimal),
            PaymentFrequency => describe("Payment Interval", Kind::Count, "times per year", Fmt::Decimal),
            CompoundingFrequency => describe("Compounding Period", Kind::Count, "times per year", Fmt::Decimal),
            RatePerPeriod => describe("Rate per Period", Kind::Rate, "decimal", Fmt::Decimal),
            PeriodCount => describe("Total Number of Periods", Kind::Count, "periods", Fmt::Decimal),
            Payment => describe("Regular Payment", Kind::Currency, "₱", Fmt::Currency),
            DeferralPeriods => describe("Deferral Periods", Kind::Count, "periods", Fmt::Decimal),
            TotalInterest => describe("Total Amount of Interest", Kind::Currency, "₱", Fmt::Currency),
            FaceValue => describe("Face Value", Kind::Currency, "₱", Fmt::Currency),
            CouponRate => describe("Coupon Rate", Kind::Rate, "decimal", Fmt::Decimal),
            CouponFrequency => describe("Payment Interval", Kind::Count, "times per year", Fmt::Decimal),
            Coupon => describe("Coupon Amount", Kind::Currency, "₱", Fmt::Currency),
            Quotation => describe("Bond Quotation", Kind::Rate, "decimal", Fmt::Decimal),
            NumberOfBonds => describe("Number of Bonds", Kind::Count, "bonds", Fmt::Integer),
            MarketPrice => describe("Market Price", Kind::Currency, "₱", Fmt::Currency),
            TotalInvestment => describe("Total Investment", Kind::Currency, "₱", Fmt::Currency),
            AnnualIncome => describe("Annual Income", Kind::Currency, "₱", Fmt::Currency),
            Commission => describe("Commission", Kind::Currency, "₱", Fmt::Currency),
            AmountInvested => describe("Amount Invested", Kind::Currency, "₱", Fmt::Currency),
            BondYield => describe("Yield", Kind::Rate, "%", Fmt::Percent),
            TotalDividend => describe("Total Dividend", Kind::Currency, "₱", Fmt::Currency),
            TotalShares => describe("Total Number of Shares", Kind::Count, "shares", Fmt::Integer),
            DividendPerShare => describe("Dividend per Share", Kind::Currency, "₱", Fmt::Currency),
            ParValue => describe("Par Value", Kind::Currency, "₱", Fmt::Currency),
            DividendPercent => describe("Dividend Percentage", Kind::Rate, "%", Fmt::Decimal),
            MarketValue => describe("Market Value", Kind::Currency, "₱", Fmt::Currency),
            StockYield => describe("Stock Yield Ratio", Kind::Rate, "%", Fmt::Percent),
        }
    }
}

// Principal and PresentValue share a key, so serialization goes through `key()`.
impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    SimpleInterest,
    CompoundInterest,
    SimpleAnnuity,
    GeneralAnnuity,
    DeferredAnnuity,
    Loan,
    Bond,
    Stock,
}

impl Family {
    pub const ALL: [Family; 8] = [
        Family::SimpleInterest,
        Family::CompoundInterest,
        Family::SimpleAnnuity,
        Family::GeneralAnnuity,
        Family::DeferredAnnuity,
        Family::Loan,
        Family::Bond,
        Family::Stock,
    ];

    /// Precision policy bound to the family.
    pub fn precision_mode(self) -> PrecisionMode {
        match self {
            Family::GeneralAnnuity | Family::DeferredAnnuity => PrecisionMode::RoundedIntermediate,
            Family::SimpleInterest
            | Family::CompoundInterest
            | Family::SimpleAnnuity
            | Family::Loan
            | Family::Bond
            | Family::Stock => PrecisionMode::Continuous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Family::SimpleInterest => "Simple Interest",
            Family::CompoundInterest => "Compound Interest",
            Family::SimpleAnnuity => "Simple Annuity",
            Family::GeneralAnnuity => "General Annuity",
            Family::DeferredAnnuity => "Deferred Annuity",
            Family::Loan => "Loans",
            Family::Bond => "Bonds",
            Family::Stock => "Stocks",
        }
    }
}

impl FromStr for Family {
    type Err = GresaError;

    fn from_str(s: &str) -> GresaResult<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Family::ALL
            .into_iter()
            .find(|f| f.label().to_ascii_lowercase().replace(' ', "_") == wanted || f.key() == wanted)
            .ok_or_else(|| GresaError::invalid("family", format!("'{s}' is not a formula family")))
    }
}

impl Family {
    fn key(self) -> &'static str {
        match self {
            Family::SimpleInterest => "simple_interest",
            Family::CompoundInterest => "compound_interest",
            Family::SimpleAnnuity => "simple_annuity",
            Family::GeneralAnnuity => "general_annuity",
            Family::DeferredAnnuity => "deferred_annuity",
            Family::Loan => "loan",
            Family::Bond => "bond",
            Family::Stock => "stock",
        }
    }
}

// ---------------------------------------------------------------------------
// Derivations and input domains
// ---------------------------------------------------------------------------

/// How a derived quantity is computed from the raw inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationRule {
    /// i = r / m
    RatePerPeriod,
    /// i = (1 + r/m2)^(m2/m1) - 1
    EquivalentRate,
    /// n = m × t
    PeriodCount,
    /// n = m1 × t
    PaymentCount,
}

impl DerivationRule {
    pub fn target(self) -> Variable {
        match self {
            DerivationRule::RatePerPeriod | DerivationRule::EquivalentRate => Variable::RatePerPeriod,
            DerivationRule::PeriodCount | DerivationRule::PaymentCount => Variable::PeriodCount,
        }
    }

    pub fn sources(self) -> &'static [Variable] {
        match self {
            DerivationRule::RatePerPeriod => &[Variable::NominalRate, Variable::Frequency],
            DerivationRule::EquivalentRate => &[
                Variable::NominalRate,
                Variable::PaymentFrequency,
                Variable::CompoundingFrequency,
            ],
            DerivationRule::PeriodCount => &[Variable::Frequency, Variable::Time],
            DerivationRule::PaymentCount => &[Variable::PaymentFrequency, Variable::Time],
        }
    }

    /// Rates are subject to the family precision mode; period counts are exact products.
    pub fn is_rate(self) -> bool {
        self.target() == Variable::RatePerPeriod
    }

    pub fn rule_text(self) -> &'static str {
        match self {
            DerivationRule::RatePerPeriod => "i = r/m",
            DerivationRule::EquivalentRate => "i = (1 + r/m₂)^(m₂/m₁) − 1",
            DerivationRule::PeriodCount => "n = m × t",
            DerivationRule::PaymentCount => "n = m₁ × t",
        }
    }
}

/// Admissible range of an input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Any,
    NonNegative,
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputSpec {
    pub variable: Variable,
    pub domain: Domain,
}

const fn pos(variable: Variable) -> InputSpec {
    InputSpec {
        variable,
        domain: Domain::Positive,
    }
}

const fn nonneg(variable: Variable) -> InputSpec {
    InputSpec {
        variable,
        domain: Domain::NonNegative,
    }
}

const fn any(variable: Variable) -> InputSpec {
    InputSpec {
        variable,
        domain: Domain::Any,
    }
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormulaId {
    #[serde(rename = "Is_Prt")]
    IsPrt,
    #[serde(rename = "F_PplusIs")]
    FPplusIs,
    #[serde(rename = "F_Prt")]
    FPrt,
    #[serde(rename = "P_FminusIs")]
    PFminusIs,
    #[serde(rename = "P_Isrt")]
    PIsrt,
    #[serde(rename = "r_IsPt")]
    RIsPt,
    #[serde(rename = "t_IsPr")]
    TIsPr,
    #[serde(rename = "F_compound")]
    FCompound,
    #[serde(rename = "P_compound")]
    PCompound,
    #[serde(rename = "r_compound")]
    RCompound,
    #[serde(rename = "t_compound")]
    TCompound,
    #[serde(rename = "F_annuity")]
    FAnnuity,
    #[serde(rename = "P_annuity")]
    PAnnuity,
    #[serde(rename = "R_from_F")]
    RFromF,
    #[serde(rename = "R_from_P")]
    RFromP,
    #[serde(rename = "F_general")]
    FGeneral,
    #[serde(rename = "P_general")]
    PGeneral,
    #[serde(rename = "R_general_from_F")]
    RGeneralFromF,
    #[serde(rename = "R_general_from_P")]
    RGeneralFromP,
    #[serde(rename = "P_deferred")]
    PDeferred,
    #[serde(rename = "R_loan")]
    RLoan,
    #[serde(rename = "I_loan")]
    ILoan,
    #[serde(rename = "coupon")]
    Coupon,
    #[serde(rename = "coupon_semiannual")]
    CouponSemiannual,
    #[serde(rename = "market_price")]
    MarketPrice,
    #[serde(rename = "total_investment")]
    TotalInvestment,
    #[serde(rename = "annual_income")]
    AnnualIncome,
    #[serde(rename = "amount_invested")]
    AmountInvested,
    #[serde(rename = "bond_yield")]
    BondYield,
    #[serde(rename = "dps_total")]
    DpsTotal,
    #[serde(rename = "dps_par")]
    DpsPar,
    #[serde(rename = "total_dividend")]
    TotalDividend,
    #[serde(rename = "total_shares")]
    TotalShares,
    #[serde(rename = "stock_yield")]
    StockYield,
}

/// Immutable description of one formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormulaSpec {
    pub id: FormulaId,
    pub family: Family,
    pub solved_for: Variable,
    pub inputs: &'static [InputSpec],
    pub derived: &'static [DerivationRule],
    /// Short plain-text label shown when choosing between formulas
    pub label: &'static str,
    /// Symbolic equation (LaTeX)
    pub equation: &'static str,
    pub description: &'static str,
}

impl FormulaSpec {
    pub fn required_inputs(&self) -> impl Iterator<Item = Variable> + '_ {
        self.inputs.iter().map(|input| input.variable)
    }

    pub fn precision_mode(&self) -> PrecisionMode {
        self.family.precision_mode()
    }
}

macro_rules! formula {
    ($name:ident, $id:ident, $family:ident, $solved:ident, [$($input:expr),* $(,)?], [$($rule:ident),* $(,)?], $label:expr, $equation:expr, $description:expr $(,)?) => {
        static $name: FormulaSpec = FormulaSpec {
            id: FormulaId::$id,
            family: Family::$family,
            solved_for: Variable::$solved,
            inputs: &[$($input),*],
            derived: &[$(DerivationRule::$rule),*],
            label: $label,
            equation: $equation,
            description: $description,
        };
    };
}

use Variable as V;

// --- Simple interest ---
formula!(IS_PRT, IsPrt, SimpleInterest, SimpleInterest,
    [nonneg(V::Principal), nonneg(V::NominalRate), nonneg(V::Time)], [],
    "Iₛ = P × r × t", "I_s = P \\times r \\times t",
    "Finds the simple interest earned or charged on a principal over time.");
formula!(F_PPLUSIS, FPplusIs, SimpleInterest, FutureValue,
    [nonneg(V::Principal), nonneg(V::SimpleInterest)], [],
    "F = P + Iₛ", "F = P + I_s",
    "Computes the maturity value from the principal and the interest.");
formula!(F_PRT, FPrt, SimpleInterest, FutureValue,
    [nonneg(V::Principal), nonneg(V::NominalRate), nonneg(V::Time)], [],
    "F = P(1 + r × t)", "F = P(1 + r t)",
    "Finds the maturity value directly from principal, rate and time.");
formula!(P_FMINUSIS, PFminusIs, SimpleInterest, Principal,
    [nonneg(V::FutureValue), nonneg(V::SimpleInterest)], [],
    "P = F - Iₛ", "P = F - I_s",
    "Finds the principal from the maturity value and the interest.");
formula!(P_ISRT, PIsrt, SimpleInterest, Principal,
    [nonneg(V::SimpleInterest), nonneg(V::NominalRate), nonneg(V::Time)], [],
    "P = Iₛ / (r × t)", "P = \\dfrac{I_s}{r t}",
    "Finds the principal when interest, rate and time are known.");
formula!(R_ISPT, RIsPt, SimpleInterest, NominalRate,
    [nonneg(V::SimpleInterest), nonneg(V::Principal), nonneg(V::Time)], [],
    "r = Iₛ / (P × t)", "r = \\dfrac{I_s}{P t}",
    "Computes the simple interest rate.");
formula!(T_ISPR, TIsPr, SimpleInterest, Time,
    [nonneg(V::SimpleInterest), nonneg(V::Principal), nonneg(V::NominalRate)], [],
    "t = Iₛ / (P × r)", "t = \\dfrac{I_s}{P r}",
    "Computes the time needed to earn or pay a given interest.");

// --- Compound interest ---
formula!(F_COMPOUND, FCompound, CompoundInterest, FutureValue,
    [nonneg(V::Principal), nonneg(V::NominalRate), pos(V::Frequency), nonneg(V::Time)],
    [RatePerPeriod, PeriodCount],
    "F = P(1 + i)ⁿ", "F = P(1 + i)^n",
    "Future value of a principal compounded m times a year.");
formula!(P_COMPOUND, PCompound, CompoundInterest, Principal,
    [nonneg(V::FutureValue), nonneg(V::NominalRate), pos(V::Frequency), nonneg(V::Time)],
    [RatePerPeriod, PeriodCount],
    "P = F / (1 + i)ⁿ", "P = \\dfrac{F}{(1 + i)^n}",
    "Principal needed today to grow into a given future value.");
formula!(R_COMPOUND, RCompound, CompoundInterest, NominalRate,
    [pos(V::FutureValue), pos(V::Principal), pos(V::Frequency), pos(V::Time)],
    [PeriodCount],
    "r = m × ((F/P)^(1/n) - 1)", "r = m \\times \\left[\\left(\\dfrac{F}{P}\\right)^{\\frac{1}{n}} - 1\\right]",
    "Nominal annual rate that grows P into F.");
formula!(T_COMPOUND, TCompound, CompoundInterest, Time,
    [pos(V::FutureValue), pos(V::Principal), nonneg(V::NominalRate), pos(V::Frequency)],
    [RatePerPeriod],
    "t = ln(F/P) / (m × ln(1 + i))", "t = \\dfrac{\\ln(F/P)}{m \\cdot \\ln(1 + i)}",
    "Time in years for P to grow into F.");

// --- Simple annuity ---
formula!(F_ANNUITY, FAnnuity, SimpleAnnuity, FutureValue,
    [nonneg(V::Payment), nonneg(V::NominalRate), pos(V::Frequency), pos(V::Time)],
    [RatePerPeriod, PeriodCount],
    "F = R × [(1+i)ⁿ - 1] / i", "F = R \\left( \\dfrac{(1+i)^n - 1}{i} \\right)",
    "Future value of an ordinary annuity.");
formula!(P_ANNUITY, PAnnuity, SimpleAnnuity, PresentValue,
    [nonneg(V::Payment), nonneg(V::NominalRate), pos(V::Frequency), pos(V::Time)],
    [RatePerPeriod, PeriodCount],
    "P = R × [1 - (1+i)⁻ⁿ] / i", "P = R \\left( \\dfrac{1 - (1+i)^{-n}}{i} \\right)",
    "Present value of an ordinary annuity.");
formula!(R_FROM_F, RFromF, SimpleAnnuity, Payment,
    [nonneg(V::FutureValue), nonneg(V::NominalRate), pos(V::Frequency), pos(V::Time)],
    [RatePerPeriod, PeriodCount],
    "R from Future Value", "R = \\dfrac{F}{\\dfrac{(1+i)^n - 1}{i}}",
    "Regular payment that accumulates to a future value.");
formula!(R_FROM_P, RFromP, SimpleAnnuity, Payment,
    [nonneg(V::PresentValue), nonneg(V::NominalRate), pos(V::Frequency), pos(V::Time)],
    [RatePerPeriod, PeriodCount],
    "R from Present Value", "R = \\dfrac{P}{\\dfrac{1 - (1+i)^{-n}}{i}}",
    "Regular payment that amortizes a present value.");

// --- General annuity ---
formula!(F_GENERAL, FGeneral, GeneralAnnuity, FutureValue,
    [nonneg(V::Payment), nonneg(V::NominalRate), pos(V::PaymentFrequency), pos(V::CompoundingFrequency), pos(V::Time)],
    [EquivalentRate, PaymentCount],
    "F = R × [(1+i)ⁿ - 1] / i", "F = R \\left( \\dfrac{(1+i)^n - 1}{i} \\right)",
    "Future value when payment and compounding intervals differ.");
formula!(P_GENERAL, PGeneral, GeneralAnnuity, PresentValue,
    [nonneg(V::Payment), nonneg(V::NominalRate), pos(V::PaymentFrequency), pos(V::CompoundingFrequency), pos(V::Time)],
    [EquivalentRate, PaymentCount],
    "P = R × [1 - (1+i)⁻ⁿ] / i", "P = R \\left( \\dfrac{1 - (1+i)^{-n}}{i} \\right)",
    "Present value when payment and compounding intervals differ.");
formula!(R_GENERAL_FROM_F, RGeneralFromF, GeneralAnnuity, Payment,
    [nonneg(V::FutureValue), nonneg(V::NominalRate), pos(V::PaymentFrequency), pos(V::CompoundingFrequency), pos(V::Time)],
    [EquivalentRate, PaymentCount],
    "R from Future Value (F)", "R = \\dfrac{F}{\\dfrac{(1+i)^n - 1}{i}}",
    "Regular payment of a general annuity from its future value.");
formula!(R_GENERAL_FROM_P, RGeneralFromP, GeneralAnnuity, Payment,
    [nonneg(V::PresentValue), nonneg(V::NominalRate), pos(V::PaymentFrequency), pos(V::CompoundingFrequency), pos(V::Time)],
    [EquivalentRate, PaymentCount],
    "R from Present Value (P)", "R = \\dfrac{P}{\\dfrac{1 - (1+i)^{-n}}{i}}",
    "Regular payment of a general annuity from its present value.");

// --- Deferred annuity ---
formula!(P_DEFERRED, PDeferred, DeferredAnnuity, PresentValue,
    [nonneg(V::Payment), nonneg(V::NominalRate), pos(V::Frequency), pos(V::Time), nonneg(V::DeferralPeriods)],
    [RatePerPeriod, PeriodCount],
    "P = R × a(k+n) - R × a(k)",
    "P = R \\left(\\dfrac{1 - (1+i)^{-(k+n)}}{i}\\right) - R \\left(\\dfrac{1 - (1+i)^{-k}}{i}\\right)",
    "Present value of an annuity whose first payment is deferred by k periods.");

// --- Loans ---
formula!(R_LOAN, RLoan, Loan, Payment,
    [pos(V::Principal), nonneg(V::NominalRate), pos(V::Frequency), pos(V::Time)],
    [RatePerPeriod, PeriodCount],
    "R = P / [(1 - (1+i)⁻ⁿ) / i]", "R = \\dfrac{P}{\\dfrac{1 - (1 + i)^{-n}}{i}}",
    "Regular payment that amortizes a loan.");
formula!(I_LOAN, ILoan, Loan, TotalInterest,
    [pos(V::Payment), pos(V::Principal), pos(V::Frequency), pos(V::Time)],
    [PeriodCount],
    "I = R × n - P", "I = R \\times n - P",
    "Total interest paid over the life of a loan.");

// --- Bonds ---
formula!(COUPON, Coupon, Bond, Coupon,
    [nonneg(V::FaceValue), nonneg(V::CouponRate), pos(V::CouponFrequency)], [],
    "Coupon = F × r ÷ m₁", "\\text{Coupon} = \\dfrac{F \\times r}{m_1}",
    "Coupon paid each period.");
formula!(COUPON_SEMIANNUAL, CouponSemiannual, Bond, Coupon,
    [nonneg(V::FaceValue), nonneg(V::CouponRate)], [],
    "Coupon = F × r ÷ 2", "\\text{Coupon} = \\dfrac{F \\times r}{2}",
    "Coupon paid every six months.");
formula!(MARKET_PRICE, MarketPrice, Bond, MarketPrice,
    [nonneg(V::FaceValue), nonneg(V::Quotation)], [],
    "Market Price = F × Quotation", "\\text{Market Price} = F \\times \\text{Quotation}",
    "Market price of a bond from its quotation.");
formula!(TOTAL_INVESTMENT, TotalInvestment, Bond, TotalInvestment,
    [nonneg(V::NumberOfBonds), nonneg(V::FaceValue), nonneg(V::Quotation)], [],
    "Total Investment = N × F × Quotation", "\\text{Total Investment} = N \\times F \\times \\text{Quotation}",
    "Cost of buying a number of bonds at a quotation.");
formula!(ANNUAL_INCOME, AnnualIncome, Bond, AnnualIncome,
    [nonneg(V::NumberOfBonds), nonneg(V::FaceValue), nonneg(V::NominalRate), nonneg(V::Time)], [],
    "Annual Income = N × F × r × t", "\\text{Annual Income} = N \\times F \\times r \\times t",
    "Interest income earned from a holding of bonds.");
formula!(AMOUNT_INVESTED, AmountInvested, Bond, AmountInvested,
    [nonneg(V::MarketPrice), nonneg(V::Commission)], [],
    "Amount Invested = Market Price + Commission", "\\text{Amount Invested} = \\text{Market Price} + \\text{Commission}",
    "Total cash paid for a bond including commission.");
formula!(BOND_YIELD, BondYield, Bond, BondYield,
    [any(V::AnnualIncome), pos(V::AmountInvested)], [],
    "Yield = Annual Income ÷ Amount Invested", "\\text{Yield} = \\dfrac{\\text{Annual Income}}{\\text{Amount Invested}}",
    "Current yield of a bond investment.");

// --- Stocks ---
formula!(DPS_TOTAL, DpsTotal, Stock, DividendPerShare,
    [nonneg(V::TotalDividend), pos(V::TotalShares)], [],
    "Dividend per Share = Total Dividend ÷ Shares", "\\text{Dividend per Share} = \\dfrac{\\text{Total Dividend}}{\\text{Total Number of Shares}}",
    "Dividend per share from the total declared dividend.");
formula!(DPS_PAR, DpsPar, Stock, DividendPerShare,
    [nonneg(V::ParValue), nonneg(V::DividendPercent)], [],
    "Dividend per Share = Par Value × Dividend % ÷ 100", "\\text{Dividend per Share} = \\text{Par Value} \\times \\dfrac{\\text{Dividend Percentage}}{100}",
    "Dividend per share of preferred stock from its par value.");
formula!(TOTAL_DIVIDEND, TotalDividend, Stock, TotalDividend,
    [nonneg(V::DividendPerShare), pos(V::TotalShares)], [],
    "Total Dividend = Dividend per Share × Shares", "\\text{Total Dividend} = \\text{Dividend per Share} \\times \\text{Total Number of Shares}",
    "Total dividend paid on a number of shares.");
formula!(TOTAL_SHARES, TotalShares, Stock, TotalShares,
    [nonneg(V::TotalDividend), pos(V::DividendPerShare)], [],
    "Shares = Total Dividend ÷ Dividend per Share", "\\text{Total Number of Shares} = \\dfrac{\\text{Total Dividend}}{\\text{Dividend per Share}}",
    "Number of shares from total and per-share dividends.");
formula!(STOCK_YIELD, StockYield, Stock, StockYield,
    [nonneg(V::DividendPerShare), pos(V::MarketValue)], [],
    "Stock Yield Ratio = Dividend per Share ÷ Market Value", "\\text{Stock Yield Ratio} = \\dfrac{\\text{Dividend per Share}}{\\text{Market Value}}",
    "Dividend yield of a stock at its market value.");

impl FormulaId {
    pub const ALL: [FormulaId; 34] = [
        FormulaId::IsPrt,
        FormulaId::FPplusIs,
        FormulaId::FPrt,
        FormulaId::PFminusIs,
        FormulaId::PIsrt,
        FormulaId::RIsPt,
        FormulaId::TIsPr,
        FormulaId::FCompound,
        FormulaId::PCompound,
        FormulaId::RCompound,
        FormulaId::TCompound,
        FormulaId::FAnnuity,
        FormulaId::PAnnuity,
        FormulaId::RFromF,
        FormulaId::RFromP,
        FormulaId::FGeneral,
        FormulaId::PGeneral,
        FormulaId::RGeneralFromF,
        FormulaId::RGeneralFromP,
        FormulaId::PDeferred,
        FormulaId::RLoan,
        FormulaId::ILoan,
        FormulaId::Coupon,
        FormulaId::CouponSemiannual,
        FormulaId::MarketPrice,
        FormulaId::TotalInvestment,
        FormulaId::AnnualIncome,
        FormulaId::AmountInvested,
        FormulaId::BondYield,
        FormulaId::DpsTotal,
        FormulaId::DpsPar,
        FormulaId::TotalDividend,
        FormulaId::TotalShares,
        FormulaId::StockYield,
    ];

    pub fn spec(self) -> &'static FormulaSpec {
        match self {
            FormulaId::IsPrt => &IS_PRT,
            FormulaId::FPplusIs => &F_PPLUSIS,
            FormulaId::FPrt => &F_PRT,
            FormulaId::PFminusIs => &P_FMINUSIS,
            FormulaId::PIsrt => &P_ISRT,
            FormulaId::RIsPt => &R_ISPT,
            FormulaId::TIsPr => &T_ISPR,
            FormulaId::FCompound => &F_COMPOUND,
            FormulaId::PCompound => &P_COMPOUND,
            FormulaId::RCompound => &R_COMPOUND,
            FormulaId::TCompound => &T_COMPOUND,
            FormulaId::FAnnuity => &F_ANNUITY,
            FormulaId::PAnnuity => &P_ANNUITY,
            FormulaId::RFromF => &R_FROM_F,
            FormulaId::RFromP => &R_FROM_P,
            FormulaId::FGeneral => &F_GENERAL,
            FormulaId::PGeneral => &P_GENERAL,
            FormulaId::RGeneralFromF => &R_GENERAL_FROM_F,
            FormulaId::RGeneralFromP => &R_GENERAL_FROM_P,
            FormulaId::PDeferred => &P_DEFERRED,
            FormulaId::RLoan => &R_LOAN,
            FormulaId::ILoan => &I_LOAN,
            FormulaId::Coupon => &COUPON,
            FormulaId::CouponSemiannual => &COUPON_SEMIANNUAL,
            FormulaId::MarketPrice => &MARKET_PRICE,
            FormulaId::TotalInvestment => &TOTAL_INVESTMENT,
            FormulaId::AnnualIncome => &ANNUAL_INCOME,
            FormulaId::AmountInvested => &AMOUNT_INVESTED,
            FormulaId::BondYield => &BOND_YIELD,
            FormulaId::DpsTotal => &DPS_TOTAL,
            FormulaId::DpsPar => &DPS_PAR,
            FormulaId::TotalDividend => &TOTAL_DIVIDEND,
            FormulaId::TotalShares => &TOTAL_SHARES,
            FormulaId::StockYield => &STOCK_YIELD,
        }
    }

    /// The identifier string used by the presentation layer.
    pub fn as_str(self) -> &'static str {
        match self {
            FormulaId::IsPrt => "Is_Prt",
            FormulaId::FPplusIs => "F_PplusIs",
            FormulaId::FPrt => "F_Prt",
            FormulaId::PFminusIs => "P_FminusIs",
            FormulaId::PIsrt => "P_Isrt",
            FormulaId::RIsPt => "r_IsPt",
            FormulaId::TIsPr => "t_IsPr",
            FormulaId::FCompound => "F_compound",
            FormulaId::PCompound => "P_compound",
            FormulaId::RCompound => "r_compound",
            FormulaId::TCompound => "t_compound",
            FormulaId::FAnnuity => "F_annuity",
            FormulaId::PAnnuity => "P_annuity",
            FormulaId::RFromF => "R_from_F",
            FormulaId::RFromP => "R_from_P",
            FormulaId::FGeneral => "F_general",
            FormulaId::PGeneral => "P_general",
            FormulaId::RGeneralFromF => "R_general_from_F",
            FormulaId::RGeneralFromP => "R_general_from_P",
            FormulaId::PDeferred => "P_deferred",
            FormulaId::RLoan => "R_loan",
            FormulaId::ILoan => "I_loan",
            FormulaId::Coupon => "coupon",
            FormulaId::CouponSemiannual => "coupon_semiannual",
            FormulaId::MarketPrice => "market_price",
            FormulaId::TotalInvestment => "total_investment",
            FormulaId::AnnualIncome => "annual_income",
            FormulaId::AmountInvested => "amount_invested",
            FormulaId::BondYield => "bond_yield",
            FormulaId::DpsTotal => "dps_total",
            FormulaId::DpsPar => "dps_par",
            FormulaId::TotalDividend => "total_dividend",
            FormulaId::TotalShares => "total_shares",
            FormulaId::StockYield => "stock_yield",
        }
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormulaId {
    type Err = GresaError;

    fn from_str(s: &str) -> GresaResult<Self> {
        FormulaId::ALL
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| GresaError::UnknownFormula(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Every formula in catalogue order.
pub fn all() -> impl Iterator<Item = &'static FormulaSpec> {
    FormulaId::ALL.into_iter().map(FormulaId::spec)
}

/// Look up a formula by its identifier string.
pub fn lookup(id: &str) -> GresaResult<&'static FormulaSpec> {
    id.parse::<FormulaId>().map(FormulaId::spec)
}

pub fn family_formulas(family: Family) -> Vec<&'static FormulaSpec> {
    all().filter(|spec| spec.family == family).collect()
}

/// Formulas of a family that solve for `variable` (the "choose a formula" step
/// when more than one applies).
pub fn formulas_solving_for(family: Family, variable: Variable) -> Vec<&'static FormulaSpec> {
    all()
        .filter(|spec| spec.family == family && spec.solved_for == variable)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_spec_ids_match() {
        for id in FormulaId::ALL {
            assert_eq!(id.spec().id, id, "spec table out of order for {id}");
        }
    }

    #[test]
    fn test_ids_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for id in FormulaId::ALL {
            assert!(seen.insert(id.as_str()), "duplicate id {id}");
            assert_eq!(id.as_str().parse::<FormulaId>().unwrap(), id);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_solved_for_is_not_an_input() {
        for spec in all() {
            assert!(
                spec.required_inputs().all(|v| v != spec.solved_for),
                "{} lists its own result as an input",
                spec.id
            );
        }
    }

    #[test]
    fn test_derivation_sources_are_inputs() {
        for spec in all() {
            let inputs: HashSet<Variable> = spec.required_inputs().collect();
            for rule in spec.derived {
                for source in rule.sources() {
                    assert!(inputs.contains(source), "{}: {:?} needs {source}", spec.id, rule);
                }
                assert!(!inputs.contains(&rule.target()));
            }
        }
    }

    #[test]
    fn test_input_keys_are_unique_per_formula() {
        for spec in all() {
            let keys: HashSet<&str> = spec.required_inputs().map(Variable::key).collect();
            assert_eq!(keys.len(), spec.inputs.len(), "{} has clashing keys", spec.id);
        }
    }

    #[test]
    fn test_precision_mode_by_family() {
        assert_eq!(FormulaId::PDeferred.spec().precision_mode(), PrecisionMode::RoundedIntermediate);
        assert_eq!(FormulaId::FGeneral.spec().precision_mode(), PrecisionMode::RoundedIntermediate);
        assert_eq!(FormulaId::FCompound.spec().precision_mode(), PrecisionMode::Continuous);
        assert_eq!(FormulaId::PAnnuity.spec().precision_mode(), PrecisionMode::Continuous);
        assert_eq!(FormulaId::Coupon.spec().precision_mode(), PrecisionMode::Continuous);
    }

    #[test]
    fn test_unknown_formula() {
        let err = lookup("F_magic").unwrap_err();
        assert_eq!(err, GresaError::UnknownFormula("F_magic".into()));
    }

    #[test]
    fn test_formulas_solving_for_payment() {
        let ids: Vec<FormulaId> = formulas_solving_for(Family::SimpleAnnuity, Variable::Payment)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![FormulaId::RFromF, FormulaId::RFromP]);
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("general-annuity".parse::<Family>().unwrap(), Family::GeneralAnnuity);
        assert_eq!("Compound Interest".parse::<Family>().unwrap(), Family::CompoundInterest);
        assert_eq!("loan".parse::<Family>().unwrap(), Family::Loan);
        assert!("lottery".parse::<Family>().is_err());
    }
}
