use colored::Colorize;
use serde_json::Value;

use super::cell;

/// Print a worked solution as Given, Required, Equation, Solution and Answer.
/// Outputs without a presentation (catalogue, comparison) fall back to their
/// trace or to JSON.
pub fn print_gresa(value: &Value) {
    let result = value.get("result").unwrap_or(value);
    for line in render(result) {
        println!("{line}");
    }
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings.iter().filter_map(Value::as_str) {
            println!("{} {w}", "warning:".yellow());
        }
    }
}

fn render(result: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    let heading = |title: &str| format!("{}", title.bold().cyan());

    if let Some(presentation) = result.get("presentation") {
        lines.push(heading("Given"));
        for entry in presentation["given"].as_array().into_iter().flatten() {
            let mut line = format!("  {} = {}", cell(&entry["symbol"]), cell(&entry["display"]));
            if let Some(rule) = entry["rule"].as_str() {
                line.push_str(&format!("    ({rule})").dimmed().to_string());
            }
            if let Some(note) = entry["note"].as_str() {
                line.push_str(&format!("    [{note}]").dimmed().to_string());
            }
            lines.push(line);
        }

        let required = &presentation["required"];
        lines.push(heading("Required"));
        lines.push(format!(
            "  {} ({})",
            cell(&required["name"]),
            cell(&required["symbol"])
        ));

        lines.push(heading("Equation"));
        lines.push(format!("  {}", cell(&presentation["equation"])));

        lines.push(heading("Solution"));
        lines.extend(stages(result));

        lines.push(heading("Answer"));
        lines.push(format!("  {}", cell(&presentation["answer"]).green().bold()));
    } else if result.get("step_trace").is_some() {
        lines.push(heading("Solution"));
        lines.extend(stages(result));
        if let Some(recommendation) = result["recommendation"].as_str() {
            lines.push(heading("Answer"));
            lines.push(format!("  {}", recommendation.green().bold()));
        }
    } else {
        lines.push(serde_json::to_string_pretty(result).unwrap_or_default());
    }
    lines
}

fn stages(result: &Value) -> Vec<String> {
    result["step_trace"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|stage| stage["expression"].as_str())
        .map(|expr| format!("  {expr}"))
        .collect()
}
