//! Compact prompt dumps for debug logging.

use serde::Serialize;
use serde_json::Value;

const PREVIEW_CHARS: usize = 40;

/// Pretty JSON of `value` with every string cut to 40 characters.
///
/// Base64 image payloads would otherwise flood the log.
pub fn preview<T: Serialize + ?Sized>(value: &T) -> String {
    let value = serde_json::to_value(value).unwrap_or(Value::Null);
    let truncated = truncate_strings(value);
    serde_json::to_string_pretty(&truncated).unwrap_or_default()
}

/// Recursively shorten strings, appending `... (N chars)` where anything was cut.
pub fn truncate_strings(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let len = s.chars().count();
            if len > PREVIEW_CHARS {
                let head: String = s.chars().take(PREVIEW_CHARS).collect();
                Value::String(format!("{}... ({} chars)", head, len))
            } else {
                Value::String(s)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(truncate_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, truncate_strings(v)))
                .collect(),
        ),
        other => other,
    }
}
