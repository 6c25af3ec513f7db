use serde_json::Value;

use super::cell;

/// Fields that carry the answer, in priority order.
const PRIORITY_KEYS: [&str; 4] = ["display_value", "recommendation", "formatted", "answer"];

/// Print just the answer.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", cell(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{key}: {}", cell(val));
            return;
        }
    }

    println!("{}", cell(result_obj));
}
