use clap::Args;
use serde_json::{json, Value};

use gresa_core::registry::{self, Family, FormulaSpec};

/// Arguments for listing formulas
#[derive(Args)]
pub struct FormulasArgs {
    /// Only formulas of this family (e.g. compound-interest, general-annuity, bond)
    #[arg(long)]
    pub family: Option<String>,

    /// Only formulas solving for this variable key (e.g. F, R, coupon)
    #[arg(long)]
    pub solves: Option<String>,
}

pub fn run_formulas(args: FormulasArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let family: Option<Family> = args.family.as_deref().map(str::parse).transpose()?;
    let rows: Vec<Value> = registry::all()
        .filter(|spec| family.is_none_or(|f| spec.family == f))
        .filter(|spec| {
            args.solves
                .as_deref()
                .is_none_or(|key| spec.solved_for.key() == key)
        })
        .map(summary)
        .collect();
    if rows.is_empty() {
        return Err("no formula matches the given filters".into());
    }
    Ok(Value::Array(rows))
}

/// Arguments for describing one formula
#[derive(Args)]
pub struct DescribeArgs {
    /// Formula identifier, e.g. P_deferred
    pub formula: String,
}

pub fn run_describe(args: DescribeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let spec = registry::lookup(&args.formula)?;
    let inputs: Vec<Value> = spec
        .inputs
        .iter()
        .map(|input| {
            let descriptor = input.variable.descriptor();
            json!({
                "key": input.variable.key(),
                "name": descriptor.name,
                "kind": descriptor.kind,
                "unit": descriptor.unit,
                "domain": input.domain,
            })
        })
        .collect();
    let derived: Vec<Value> = spec
        .derived
        .iter()
        .map(|rule| json!({ "key": rule.target().key(), "rule": rule.rule_text() }))
        .collect();
    let solved = spec.solved_for.descriptor();

    Ok(json!({
        "id": spec.id,
        "family": spec.family.label(),
        "solves": {
            "key": spec.solved_for.key(),
            "name": solved.name,
            "format": solved.format,
        },
        "label": spec.label,
        "equation": spec.equation,
        "description": spec.description,
        "precision_mode": spec.precision_mode(),
        "inputs": inputs,
        "derived": derived,
    }))
}

fn summary(spec: &FormulaSpec) -> Value {
    let inputs: Vec<&str> = spec.required_inputs().map(|v| v.key()).collect();
    let derived: Vec<&str> = spec.derived.iter().map(|rule| rule.rule_text()).collect();
    json!({
        "id": spec.id,
        "family": spec.family.label(),
        "solves": spec.solved_for.key(),
        "label": spec.label,
        "inputs": inputs.join(" "),
        "derived": derived.join("; "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_family_and_variable() {
        let value = run_formulas(FormulasArgs {
            family: Some("general-annuity".into()),
            solves: Some("R".into()),
        })
        .unwrap();
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["R_general_from_F", "R_general_from_P"]);
    }

    #[test]
    fn test_unknown_family() {
        assert!(run_formulas(FormulasArgs {
            family: Some("lottery".into()),
            solves: None,
        })
        .is_err());
    }

    #[test]
    fn test_describe_deferred() {
        let value = run_describe(DescribeArgs {
            formula: "P_deferred".into(),
        })
        .unwrap();
        assert_eq!(value["precision_mode"], "rounded_intermediate");
        assert_eq!(value["inputs"].as_array().unwrap().len(), 5);
        assert_eq!(value["derived"][0]["rule"], "i = r/m");
    }
}
