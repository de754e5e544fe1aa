//! Output → human/json/raw string formatting.
//!
//! Three modes:
//! - **Human** (default): Redis-style, e.g. `"value"`, `(integer) 42`, `(nil)`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`
//! - **Raw** (`--raw`): compact JSON, bare strings, no type prefixes

use jstore::{Error, Value};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Raw,
}

/// Result of one CLI action.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The operation completed with nothing to show
    Unit,
    /// A document value
    Value(Value),
    /// `exists`
    Bool(bool),
    /// A status line (e.g. from `init`)
    Text(String),
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Raw => format_raw(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    format_message_error(&err.to_string(), mode)
}

/// Format an error that did not come from the store (bad arguments, I/O).
pub fn format_message_error(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": message
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", message)),
        OutputMode::Raw => message.to_string(),
        OutputMode::Human => format!("(error) {}", message),
    }
}

// =========================================================================
// JSON mode
// =========================================================================

fn format_json(output: &Output) -> String {
    let value = match output {
        Output::Unit => serde_json::json!({"ok": true}),
        Output::Value(v) => v.clone(),
        Output::Bool(b) => Value::Bool(*b),
        Output::Text(s) => serde_json::json!({"message": s}),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

// =========================================================================
// Raw mode
// =========================================================================

fn format_raw(output: &Output) -> String {
    match output {
        Output::Unit => String::new(),
        Output::Value(v) => format_value_raw(v),
        Output::Bool(b) => {
            if *b {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        Output::Text(s) => s.clone(),
    }
}

fn format_value_raw(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =========================================================================
// Human mode
// =========================================================================

fn format_human(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Value(v) => format_value_human(v),
        Output::Bool(b) => format!("(boolean) {}", b),
        Output::Text(s) => s.clone(),
    }
}

fn format_value_human(v: &Value) -> String {
    match v {
        Value::Array(arr) => {
            if arr.is_empty() {
                "(empty array)".to_string()
            } else {
                arr.iter()
                    .enumerate()
                    .map(|(i, v)| format!("{}) {}", i + 1, format_scalar_human(v)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Value::Object(obj) => {
            if obj.is_empty() {
                "(empty object)".to_string()
            } else {
                obj.iter()
                    .map(|(k, v)| format!("{}: {}", k, format_scalar_human(v)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        scalar => format_scalar_human(scalar),
    }
}

/// Single-line rendering; nested containers print as compact JSON.
fn format_scalar_human(v: &Value) -> String {
    match v {
        Value::Null => "(nil)".to_string(),
        Value::Bool(b) => format!("(boolean) {}", b),
        Value::Number(n) if n.is_f64() => format!("(float) {}", n),
        Value::Number(n) => format!("(integer) {}", n),
        Value::String(s) => format!("\"{}\"", s),
        container => container.to_string(),
    }
}
