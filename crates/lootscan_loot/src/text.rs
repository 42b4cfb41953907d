//! Plain-text extraction from text components.
//!
//! Components show up as JSON objects, as JSON (or SNBT) encoded strings, or as
//! arrays whose first element carries the text.

use serde_json::Value;

/// Extracts the `text` of a component in any of its encodings.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim_start();
            if trimmed.starts_with(['{', '[', '"', '\'']) {
                match lootscan_snbt::from_str(s) {
                    Ok(Value::String(inner)) => Some(inner),
                    Ok(parsed) => text_of(&parsed),
                    Err(_) => Some(s.clone()),
                }
            } else {
                Some(s.clone())
            }
        }
        Value::Object(map) => map.get("text").and_then(Value::as_str).map(str::to_owned),
        Value::Array(items) => items.first().and_then(text_of),
        _ => None,
    }
}

/// Decodes lore lines. Lines may be given as an array of components or as a
/// single string holding a comma separated run of encoded components.
pub fn lore_lines(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(lines) => Some(lines.iter().map(line_text).collect()),
        Value::String(s) => match lootscan_snbt::from_str(&format!("[{s}]")) {
            Ok(Value::Array(lines)) => Some(lines.iter().map(line_text).collect()),
            _ => None,
        },
        _ => None,
    }
}

fn line_text(line: &Value) -> String {
    text_of(line).unwrap_or_default()
}
