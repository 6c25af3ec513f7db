use clap::Args;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use gresa_core::{evaluate_with_metadata, EvaluationRequest, Formatter, RawValue};

use crate::input;

/// Arguments for formula evaluation
#[derive(Args)]
pub struct EvaluateArgs {
    /// Formula identifier, e.g. F_compound (overrides the one in --input)
    pub formula: Option<String>,

    /// Input value as KEY=VALUE, repeatable (overrides values from --input)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Path to a JSON or YAML request file
    #[arg(long)]
    pub input: Option<String>,
}

/// Request as read from a file or stdin. The formula may come from the
/// command line instead.
#[derive(Debug, Default, Deserialize)]
struct RequestDocument {
    formula: Option<String>,
    #[serde(default)]
    inputs: BTreeMap<String, RawValue>,
}

pub fn run_evaluate(args: EvaluateArgs, formatter: &Formatter) -> Result<Value, Box<dyn std::error::Error>> {
    let document: RequestDocument = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        RequestDocument::default()
    };

    let request = build_request(document, args.formula, &args.set)?;
    debug!(formula = %request.formula, inputs = request.inputs.len(), "evaluating request");
    let output = evaluate_with_metadata(&request, formatter)?;
    Ok(serde_json::to_value(output)?)
}

fn build_request(
    document: RequestDocument,
    formula: Option<String>,
    assignments: &[String],
) -> Result<EvaluationRequest, Box<dyn std::error::Error>> {
    let formula = formula
        .or(document.formula)
        .ok_or("a formula id is required (positional argument, --input <file> or stdin)")?;
    let mut request = EvaluationRequest {
        formula,
        inputs: document.inputs,
    };
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        request.inputs.insert(key, RawValue::from(value));
    }
    Ok(request)
}

fn parse_assignment(assignment: &str) -> Result<(String, String), Box<dyn std::error::Error>> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{assignment}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{assignment}'").into());
    }
    Ok((key.to_string(), value.trim().to_string()))
}
