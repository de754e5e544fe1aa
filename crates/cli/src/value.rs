//! String → Value parsing rules.
//!
//! User input is parsed as JSON when it is valid JSON (`42`, `true`, `null`,
//! `"quoted"`, `{...}`, `[...]`); anything else is taken as a bare string.

use jstore::Value;

/// Auto-detect a value from a user-supplied string.
pub fn parse_value(s: &str) -> Value {
    serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string()))
}

/// Split a `FIELD=VALUE` filter into its field and parsed value.
pub fn parse_where(s: &str) -> Result<(String, Value), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), parse_value(value)))
        }
        _ => Err(format!("Invalid filter '{}': expected FIELD=VALUE", s)),
    }
}
