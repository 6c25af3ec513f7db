use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Piped request document. YAML is a superset of JSON, so one parser
/// accepts both. `None` when stdin is a terminal or the pipe is blank.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document<T: DeserializeOwned>(text: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let document = serde_yaml::from_str(text)
        .map_err(|e| format!("Failed to parse stdin: {e}"))?;
    Ok(Some(document))
}
