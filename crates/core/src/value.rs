//! Value helpers with script-runtime semantics
//!
//! Documents are plain `serde_json::Value` trees. The store's read shaping and
//! hook short-circuiting follow the loose semantics of the runtime the document
//! format comes from, so this module provides:
//! - `values_of`: mapping/sequence enumeration (integer-like keys first)
//! - `is_truthy`: falsy check used to decide hook short-circuits
//! - `loose_gt` / `loose_lt`: relational comparison with implicit coercion
//! - `property`: single-step member access on either container kind

use serde_json::Value;
use std::cmp::Ordering;

/// Largest valid array index plus one (`2^32 - 1`)
const MAX_ARRAY_INDEX: u64 = u32::MAX as u64;

/// Human-readable type name for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a canonical array index: `0` or a decimal without leading zeros.
///
/// Keys like `"01"`, `"+1"` or `"1.0"` are ordinary property names, never
/// indices.
pub fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u64 = key.parse().ok()?;
    if n >= MAX_ARRAY_INDEX {
        return None;
    }
    usize::try_from(n).ok()
}

/// Enumerate the values of a container.
///
/// Mappings yield integer-like keys first in ascending numeric order, then the
/// remaining keys in insertion order. Sequences yield their elements in order.
/// Scalars yield nothing.
pub fn values_of(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => {
            let mut indexed: Vec<(usize, &Value)> = Vec::new();
            let mut named: Vec<&Value> = Vec::new();
            for (key, v) in map {
                match array_index(key) {
                    Some(i) => indexed.push((i, v)),
                    None => named.push(v),
                }
            }
            indexed.sort_by_key(|(i, _)| *i);
            indexed
                .into_iter()
                .map(|(_, v)| v.clone())
                .chain(named.into_iter().cloned())
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Falsy values are `null`, `false`, numeric zero and the empty string.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Member access on a mapping key or sequence index
pub fn property<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => array_index(key).and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Numeric coercion for primitives. Containers do not coerce.
fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Relational comparison with implicit coercion.
///
/// `None` operands stand for an absent property. Returns `None` whenever the
/// runtime comparison would be false in both directions (absent operands,
/// containers, NaN).
pub fn loose_cmp(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    let (a, b) = (a?, b?);
    if let (Value::String(x), Value::String(y)) = (a, b) {
        return Some(x.as_str().cmp(y.as_str()));
    }
    let x = to_number(a)?;
    let y = to_number(b)?;
    x.partial_cmp(&y)
}

/// `a > b`
pub fn loose_gt(a: Option<&Value>, b: Option<&Value>) -> bool {
    loose_cmp(a, b) == Some(Ordering::Greater)
}

/// `a < b`
pub fn loose_lt(a: Option<&Value>, b: Option<&Value>) -> bool {
    loose_cmp(a, b) == Some(Ordering::Less)
}
