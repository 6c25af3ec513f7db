use gresa_core::families::stocks::{compare_yields, Preference, StockQuote, YieldComparisonInput};
use gresa_core::{
    evaluate, evaluate_with, EvaluationRequest, EvaluationResult, Formatter, FormatterConfig,
    GresaError, PrecisionMode, Variable,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn run(formula: &str, inputs: &[(&str, Decimal)]) -> EvaluationResult {
    let request = inputs
        .iter()
        .fold(EvaluationRequest::new(formula), |req, (k, v)| req.with(*k, *v));
    evaluate(&request).unwrap()
}

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_compound_interest_quarterly() {
    // P = 10000, r = 8% compounded quarterly for 5 years
    // i = 0.02, n = 20, F = 10000 × 1.02^20
    let result = run(
        "F_compound",
        &[("P", dec!(10000)), ("r", dec!(0.08)), ("m", dec!(4)), ("t", dec!(5))],
    );
    assert_eq!(result.derived(Variable::RatePerPeriod).unwrap().value(), dec!(0.02));
    assert_eq!(result.derived(Variable::PeriodCount).unwrap().value(), dec!(20));
    assert_close(result.final_value, dec!(14859.47395978), dec!(0.00000001));
    assert_eq!(result.display_value, "₱14,859.47");
    assert_eq!(result.precision_mode, PrecisionMode::Continuous);
}

#[test]
fn test_simple_annuity_present_value() {
    // R = 5000 semi-annually at 6% for 10 years
    let result = run(
        "P_annuity",
        &[("R", dec!(5000)), ("r", dec!(0.06)), ("m", dec!(2)), ("t", dec!(10))],
    );
    assert_eq!(result.derived(Variable::RatePerPeriod).unwrap().value(), dec!(0.03));
    assert_close(result.final_value, dec!(74387.3743022775), dec!(0.000001));
    assert_eq!(result.display_value, "₱74,387.37");
}

#[test]
fn test_deferred_annuity_textbook_answer() {
    // R = 1500 quarterly at 6% for 8 years, first payment deferred 12 quarters
    let result = run(
        "P_deferred",
        &[
            ("R", dec!(1500)),
            ("r", dec!(0.06)),
            ("m", dec!(4)),
            ("t", dec!(8)),
            ("k", dec!(12)),
        ],
    );
    let i = result.derived(Variable::RatePerPeriod).unwrap();
    assert_eq!(i.value(), dec!(0.015));
    assert_eq!(i.mode(), PrecisionMode::RoundedIntermediate);
    assert!(!i.was_rounded());
    assert_close(result.final_value, dec!(31699.67554148), dec!(0.00001));
    assert_eq!(result.display_value, "₱31,699.68");
}

#[test]
fn test_stock_yield_comparison() {
    let input = YieldComparisonInput {
        first: StockQuote {
            name: "Corp A".into(),
            dividend_per_share: dec!(11),
            market_value: dec!(65),
        },
        second: StockQuote {
            name: "Corp B".into(),
            dividend_per_share: dec!(15),
            market_value: dec!(75),
        },
    };
    let cmp = compare_yields(&input, &Formatter::default()).unwrap();
    assert_close(cmp.first.yield_ratio, dec!(0.16923076923), dec!(0.00000000001));
    assert_eq!(cmp.first.display, "16.92%");
    assert_eq!(cmp.second.yield_ratio, dec!(0.2));
    assert_eq!(cmp.second.display, "20%");
    assert_eq!(cmp.preferred, Preference::Second);
}

#[test]
fn test_stock_yield_formula() {
    let result = run("stock_yield", &[("dividend_per_share", dec!(11)), ("market_value", dec!(65))]);
    assert_eq!(result.display_value, "16.92%");
}

#[test]
fn test_bond_coupon_semiannual() {
    let result = run(
        "coupon",
        &[("face_value", dec!(100000)), ("coupon_rate", dec!(0.03)), ("payment_interval", dec!(2))],
    );
    assert_eq!(result.final_value, dec!(1500));
    assert_eq!(result.display_value, "₱1,500.00");

    let semiannual = run(
        "coupon_semiannual",
        &[("face_value", dec!(100000)), ("coupon_rate", dec!(0.03))],
    );
    assert_eq!(semiannual.final_value, result.final_value);
}

#[test]
fn test_loan_payment_and_interest() {
    let payment = run(
        "R_loan",
        &[("P", dec!(100000)), ("r", dec!(0.12)), ("m", dec!(12)), ("t", dec!(1))],
    );
    assert_close(payment.final_value, dec!(8884.87886783), dec!(0.00001));

    let interest = run(
        "I_loan",
        &[
            ("R", payment.final_value),
            ("P", dec!(100000)),
            ("m", dec!(12)),
            ("t", dec!(1)),
        ],
    );
    assert_close(interest.final_value, dec!(6618.54641401), dec!(0.00001));
}

#[test]
fn test_simple_interest_chain() {
    let interest = run("Is_Prt", &[("P", dec!(25000)), ("r", dec!(0.05)), ("t", dec!(3))]);
    assert_eq!(interest.final_value, dec!(3750));
    let maturity = run("F_PplusIs", &[("P", dec!(25000)), ("Is", interest.final_value)]);
    assert_eq!(maturity.final_value, dec!(28750));
    assert_eq!(maturity.display_value, "₱28,750.00");
}

#[test]
fn test_custom_currency_symbol() {
    let formatter = Formatter::new(FormatterConfig {
        currency_symbol: "$".into(),
    });
    let request = EvaluationRequest::new("F_compound")
        .with("P", "10000")
        .with("r", "0.08")
        .with("m", "4")
        .with("t", "5");
    let result = evaluate_with(&request, &formatter).unwrap();
    assert_eq!(result.display_value, "$14,859.47");
}

// ===========================================================================
// Inverse round trips
// ===========================================================================

#[test]
fn test_compound_round_trips() {
    let forward = run(
        "F_compound",
        &[("P", dec!(10000)), ("r", dec!(0.08)), ("m", dec!(4)), ("t", dec!(5))],
    );
    let f = forward.final_value;

    let principal = run(
        "P_compound",
        &[("F", f), ("r", dec!(0.08)), ("m", dec!(4)), ("t", dec!(5))],
    );
    assert_close(principal.final_value, dec!(10000), dec!(0.0000000001));

    let rate = run(
        "r_compound",
        &[("F", f), ("P", dec!(10000)), ("m", dec!(4)), ("t", dec!(5))],
    );
    assert_close(rate.final_value, dec!(0.08), dec!(0.00000001));

    let time = run(
        "t_compound",
        &[("F", f), ("P", dec!(10000)), ("r", dec!(0.08)), ("m", dec!(4))],
    );
    assert_close(time.final_value, dec!(5), dec!(0.00000001));
}

#[test]
fn test_simple_annuity_round_trip() {
    let future = run(
        "F_annuity",
        &[("R", dec!(2000)), ("r", dec!(0.09)), ("m", dec!(12)), ("t", dec!(4))],
    );
    let payment = run(
        "R_from_F",
        &[("F", future.final_value), ("r", dec!(0.09)), ("m", dec!(12)), ("t", dec!(4))],
    );
    assert_close(payment.final_value, dec!(2000), dec!(0.0000001));
}

#[test]
fn test_general_annuity_round_trip() {
    let present = run(
        "P_general",
        &[
            ("R", dec!(3000)),
            ("r", dec!(0.08)),
            ("m1", dec!(12)),
            ("m2", dec!(4)),
            ("t", dec!(3)),
        ],
    );
    let payment = run(
        "R_general_from_P",
        &[
            ("P", present.final_value),
            ("r", dec!(0.08)),
            ("m1", dec!(12)),
            ("m2", dec!(4)),
            ("t", dec!(3)),
        ],
    );
    assert_close(payment.final_value, dec!(3000), dec!(0.00000001));
}

#[test]
fn test_loan_payment_amortizes_principal() {
    let payment = run(
        "R_loan",
        &[("P", dec!(50000)), ("r", dec!(0.1)), ("m", dec!(4)), ("t", dec!(3))],
    );
    let present = run(
        "P_annuity",
        &[("R", payment.final_value), ("r", dec!(0.1)), ("m", dec!(4)), ("t", dec!(3))],
    );
    assert_close(present.final_value, dec!(50000), dec!(0.0000001));
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn test_zero_rate_annuity_is_division_by_zero() {
    for formula in ["F_annuity", "P_annuity", "P_deferred"] {
        let request = EvaluationRequest::new(formula)
            .with("R", "1000")
            .with("r", "0")
            .with("m", "12")
            .with("t", "2")
            .with("k", "3");
        let err = evaluate(&request).unwrap_err();
        assert!(
            matches!(err, GresaError::DivisionByZero { .. }),
            "{formula}: expected DivisionByZero, got {err:?}"
        );
    }

    let general = EvaluationRequest::new("F_general")
        .with("R", "1000")
        .with("r", "0")
        .with("m1", "12")
        .with("m2", "4")
        .with("t", "2");
    assert!(matches!(evaluate(&general), Err(GresaError::DivisionByZero { .. })));
}

#[test]
fn test_non_positive_annuity_time_rejected() {
    let request = EvaluationRequest::new("P_annuity")
        .with("R", "1000")
        .with("r", "0.06")
        .with("m", "12")
        .with("t", "0");
    let err = evaluate(&request).unwrap_err();
    assert_eq!(
        err,
        GresaError::InvalidInput {
            field: "t".into(),
            reason: "Must be greater than zero".into(),
        }
    );
}

#[test]
fn test_bond_yield_requires_positive_amount_invested() {
    let request = EvaluationRequest::new("bond_yield")
        .with("annual_income", "800")
        .with("amount_invested", "0");
    let err = evaluate(&request).unwrap_err();
    assert!(matches!(err, GresaError::InvalidInput { ref field, .. } if field == "amount_invested"));
}

#[test]
fn test_unknown_formula() {
    let err = evaluate(&EvaluationRequest::new("F_perpetuity")).unwrap_err();
    assert_eq!(err, GresaError::UnknownFormula("F_perpetuity".into()));
    assert_eq!(err.to_string(), "Unknown formula: F_perpetuity");
}

#[test]
fn test_decimal_overflow_is_invalid_input() {
    let cases: [(&str, &[(&str, Decimal)]); 3] = [
        (
            "F_compound",
            &[("P", dec!(1)), ("r", Decimal::MAX), ("m", dec!(1)), ("t", dec!(1))],
        ),
        (
            "P_deferred",
            &[
                ("R", dec!(1500)),
                ("r", dec!(0.06)),
                ("m", dec!(4)),
                ("t", dec!(8)),
                ("k", Decimal::MAX),
            ],
        ),
        ("F_Prt", &[("P", dec!(1)), ("r", Decimal::MAX), ("t", dec!(1))]),
    ];
    for (formula, inputs) in cases {
        let request = inputs
            .iter()
            .fold(EvaluationRequest::new(formula), |req, (k, v)| req.with(*k, *v));
        let err = evaluate(&request).unwrap_err();
        assert!(
            matches!(err, GresaError::InvalidInput { .. }),
            "{formula}: expected InvalidInput, got {err:?}"
        );
    }
}

#[test]
fn test_compound_time_rejects_future_below_principal() {
    let request = EvaluationRequest::new("t_compound")
        .with("F", "5000")
        .with("P", "10000")
        .with("r", "0.08")
        .with("m", "4");
    let err = evaluate(&request).unwrap_err();
    assert!(matches!(err, GresaError::InvalidInput { ref field, .. } if field == "F"));
}

#[test]
fn test_long_horizon_present_value() {
    // i = 0.1 over 720 periods: (1.1)^720 is past the decimal range but its
    // reciprocal is negligible, so P = R / i.
    let result = run(
        "P_annuity",
        &[("R", dec!(100)), ("r", dec!(1.2)), ("m", dec!(12)), ("t", dec!(60))],
    );
    assert_close(result.final_value, dec!(1000), dec!(0.000001));
}

// ===========================================================================
// Wire format
// ===========================================================================

#[test]
fn test_request_from_json_with_mixed_values() {
    let request: EvaluationRequest = serde_json::from_str(
        r#"{"formula": "F_compound", "inputs": {"P": 10000, "r": "0.08", "m": 4, "t": "5"}}"#,
    )
    .unwrap();
    let result = evaluate(&request).unwrap();
    assert_eq!(result.display_value, "₱14,859.47");

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["formula"], "F_compound");
    assert_eq!(json["solved_for"], "F");
    assert_eq!(json["precision_mode"], "continuous");
    assert_eq!(json["derived_values"][0]["variable"], "i");
}
